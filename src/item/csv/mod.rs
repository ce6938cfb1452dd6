//! CSV support for reading and writing delimited text.
//!
//! # Module Architecture
//!
//! The CSV module is split into an I/O-free core and thin I/O drivers:
//!
//! 1. **RecordFormat** ([`format`]): maps the cells of a line to an item and
//!    back. [`format::TypedFormat`] works on a [`CsvRecord`](crate::record::CsvRecord)
//!    type through its cached header, [`format::RowFormat`] on generic
//!    [`Row`](crate::record::Row)s.
//!
//! 2. **ReadState** ([`read_state`]): the batching state machine
//!    `Start -> HeaderRead -> {fill, emit}* -> Done`.
//!
//! 3. **WriteState** ([`write_state`]): header settlement and line joining.
//!
//! 4. **Drivers**: [`csv_reader::CsvItemReader`] and [`csv_writer::CsvItemWriter`]
//!    over `std::io`, [`async_reader::AsyncCsvItemReader`] and
//!    [`async_writer::AsyncCsvItemWriter`] over `tokio::io`.
//!
//! # Limitations
//!
//! Lines are split on the literal delimiter: there is no quoting or escaping,
//! in either direction. A value containing the delimiter or a line break
//! produces misaligned output.
//!
//! Lines end with `\n` or `\r\n`. A source using lone `\r` terminators (classic
//! Mac OS) is read as a single header line and yields no records. Invalid UTF-8
//! is replaced with U+FFFD and logged at warn level.
//!
//! # Examples
//!
//! ## Reading typed records
//!
//! ```
//! use batch_csv::{CsvEngineBuilder, CsvResult};
//! use batch_csv::record::{CsvRecord, FieldDescriptor};
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: u8,
//! }
//!
//! impl CsvRecord for Person {
//!     fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
//!         Ok(vec![
//!             FieldDescriptor::new("Name", |p: &Person| &p.name, |p: &mut Person, v| p.name = v),
//!             FieldDescriptor::new("Age", |p: &Person| &p.age, |p: &mut Person, v| p.age = v),
//!         ])
//!     }
//! }
//!
//! let engine = CsvEngineBuilder::new().delimiter(";").build().unwrap();
//! let people: Vec<Person> = engine.read_str("Name;Age\nJohn;30\nJane;25\n").unwrap();
//!
//! assert_eq!(people.len(), 2);
//! assert_eq!(people[1], Person { name: "Jane".to_string(), age: 25 });
//!
//! let text = engine.write_string(&people).unwrap();
//! assert_eq!(text, "Name;Age\nJohn;30\nJane;25\n");
//! ```

/// Async reader over `tokio::io`.
pub mod async_reader;

/// Async writer over `tokio::io`.
pub mod async_writer;

/// A module providing facilities for reading CSV data records.
pub mod csv_reader;

/// A module providing facilities for writing CSV data records.
pub mod csv_writer;

pub mod format;

pub mod read_state;

pub mod write_state;
