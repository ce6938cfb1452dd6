#![allow(dead_code)]

pub mod mocks;

pub use mocks::{FlakySource, MockSink};

use batch_csv::{
    CsvResult,
    record::{CsvRecord, FieldDescriptor},
};
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Routes `log` output through the test harness, once per test binary.
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Two fields, no column mapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Person {
    pub name: String,
    pub age: u32,
}

impl Person {
    pub fn new(name: &str, age: u32) -> Self {
        Self {
            name: name.to_string(),
            age,
        }
    }
}

impl CsvRecord for Person {
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
        Ok(vec![
            FieldDescriptor::new("Name", |p: &Person| &p.name, |p: &mut Person, v| p.name = v),
            FieldDescriptor::new("Age", |p: &Person| &p.age, |p: &mut Person, v| p.age = v),
        ])
    }
}

/// Primitive fields, some of them mapped to other column names.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub quantity: u32,
    pub available: bool,
    pub discount: Option<i16>,
    pub grade: char,
}

impl CsvRecord for Product {
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
        Ok(vec![
            FieldDescriptor::new("id", |p: &Product| &p.id, |p: &mut Product, v| p.id = v)
                .column("Product ID")?,
            FieldDescriptor::new("name", |p: &Product| &p.name, |p: &mut Product, v| p.name = v),
            FieldDescriptor::new("price", |p: &Product| &p.price, |p: &mut Product, v| {
                p.price = v
            }),
            FieldDescriptor::new("quantity", |p: &Product| &p.quantity, |p: &mut Product, v| {
                p.quantity = v
            })
            .column("Qty")?,
            FieldDescriptor::new("available", |p: &Product| &p.available, |p: &mut Product, v| {
                p.available = v
            }),
            FieldDescriptor::new("discount", |p: &Product| &p.discount, |p: &mut Product, v| {
                p.discount = v
            }),
            FieldDescriptor::new("grade", |p: &Product| &p.grade, |p: &mut Product, v| {
                p.grade = v
            }),
        ])
    }
}

pub fn products() -> Vec<Product> {
    vec![
        Product {
            id: "P001".to_string(),
            name: "Wireless Headphones".to_string(),
            price: 79.99,
            quantity: 12,
            available: true,
            discount: Some(-5),
            grade: 'A',
        },
        Product {
            id: "P002".to_string(),
            name: "USB-C Cable".to_string(),
            price: 12.5,
            quantity: 0,
            available: false,
            discount: None,
            grade: 'C',
        },
        Product {
            id: "P003".to_string(),
            name: "Smart Watch".to_string(),
            price: 149.0,
            quantity: 3,
            available: true,
            discount: Some(10),
            grade: 'B',
        },
    ]
}

/// Dates and identifiers, available with the `chrono` and `uuid` features.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Event {
    pub id: Uuid,
    pub day: NaiveDate,
    pub at: DateTime<Utc>,
}

impl CsvRecord for Event {
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
        Ok(vec![
            FieldDescriptor::new("id", |e: &Event| &e.id, |e: &mut Event, v| e.id = v),
            FieldDescriptor::new("day", |e: &Event| &e.day, |e: &mut Event, v| e.day = v),
            FieldDescriptor::new("at", |e: &Event| &e.at, |e: &mut Event, v| e.at = v),
        ])
    }
}

/// A record type whose descriptor attaches an empty column name.
#[derive(Debug, Default)]
pub struct Broken {
    pub code: String,
}

impl CsvRecord for Broken {
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
        Ok(vec![
            FieldDescriptor::new("code", |b: &Broken| &b.code, |b: &mut Broken, v| b.code = v)
                .column("")?,
        ])
    }
}

/// `Name;Age` text with `count` data lines.
pub fn people_csv(count: usize) -> String {
    let mut text = String::from("Name;Age\n");
    for index in 0..count {
        text.push_str(&format!("person-{index};{}\n", index % 90));
    }
    text
}
