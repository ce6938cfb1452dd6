//! Typed record description: field descriptors, column mappings and the
//! per-type header cache.
//!
//! A record type opts in by implementing [`CsvRecord`], which lists its fields
//! in declaration order. Each [`FieldDescriptor`] carries a typed getter and
//! setter plus an optional [`ColumnMapping`] overriding the field name as the
//! column identity.
//!
//! # Examples
//!
//! ```
//! use batch_csv::record::{CsvRecord, FieldDescriptor};
//! use batch_csv::CsvResult;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct City {
//!     name: String,
//!     population: u64,
//! }
//!
//! impl CsvRecord for City {
//!     fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
//!         Ok(vec![
//!             FieldDescriptor::new("name", |c: &City| &c.name, |c: &mut City, v| c.name = v),
//!             FieldDescriptor::new("population", |c: &City| &c.population, |c: &mut City, v| {
//!                 c.population = v
//!             })
//!             .column("pop")?,
//!         ])
//!     }
//! }
//!
//! let fields = City::fields().unwrap();
//! assert_eq!(fields[1].name(), "population");
//! assert_eq!(fields[1].column_source().declared_name(), Some("pop"));
//! ```
mod coerce;
mod header;
mod row;

use std::{fmt, sync::Arc};

pub use coerce::{CsvField, ScalarKind};
pub use header::{HeaderCache, ResolvedHeader};
pub use row::Row;

use crate::error::{CsvError, CsvResult};

/// Explicit association between a field and a header name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    declared_name: String,
    lower_case_name: String,
}

impl ColumnMapping {
    /// Creates a mapping for `field`, rejecting an empty `name`.
    pub fn new(field: &str, name: &str) -> CsvResult<Self> {
        if name.is_empty() {
            return Err(CsvError::EmptyColumnMapping {
                field: field.to_owned(),
            });
        }

        Ok(Self {
            declared_name: name.to_owned(),
            lower_case_name: name.to_lowercase(),
        })
    }

    pub fn declared_name(&self) -> &str {
        &self.declared_name
    }

    pub fn lower_case_name(&self) -> &str {
        &self.lower_case_name
    }
}

/// Where a field takes its column name from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSource {
    Declared(ColumnMapping),
    FieldName,
}

impl ColumnSource {
    pub fn declared_name(&self) -> Option<&str> {
        match self {
            ColumnSource::Declared(mapping) => Some(mapping.declared_name()),
            ColumnSource::FieldName => None,
        }
    }
}

type Assign<T> = dyn Fn(&mut T, &str) -> Result<(), String> + Send + Sync;
type Render<T> = dyn Fn(&T) -> String + Send + Sync;

/// Accessors and metadata of one field of a record type `T`.
pub struct FieldDescriptor<T> {
    name: String,
    kind: ScalarKind,
    column: ColumnSource,
    assign: Arc<Assign<T>>,
    render: Arc<Render<T>>,
}

impl<T: 'static> FieldDescriptor<T> {
    /// Describes the field `name` of type `F` through a getter and a setter.
    pub fn new<F: CsvField>(name: &str, get: fn(&T) -> &F, set: fn(&mut T, F)) -> Self {
        Self {
            name: name.to_owned(),
            kind: F::KIND,
            column: ColumnSource::FieldName,
            assign: Arc::new(move |record: &mut T, raw: &str| {
                set(record, F::coerce(raw)?);
                Ok(())
            }),
            render: Arc::new(move |record: &T| get(record).stringify()),
        }
    }

    /// Attaches an explicit column name to this field.
    ///
    /// # Errors
    ///
    /// `CsvError::EmptyColumnMapping` when `name` is empty.
    pub fn column(mut self, name: &str) -> CsvResult<Self> {
        self.column = ColumnSource::Declared(ColumnMapping::new(&self.name, name)?);
        Ok(self)
    }
}

impl<T> FieldDescriptor<T> {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    pub fn column_source(&self) -> &ColumnSource {
        &self.column
    }

    /// Column identity of this field under the given casing rule.
    pub fn column_name(&self, lower_case: bool) -> String {
        match (&self.column, lower_case) {
            (ColumnSource::Declared(mapping), true) => mapping.lower_case_name().to_owned(),
            (ColumnSource::Declared(mapping), false) => mapping.declared_name().to_owned(),
            (ColumnSource::FieldName, true) => self.name.to_lowercase(),
            (ColumnSource::FieldName, false) => self.name.clone(),
        }
    }

    /// Coerces `raw` and stores it into `record`.
    pub fn assign(&self, record: &mut T, raw: &str, column: &str) -> CsvResult<()> {
        (self.assign)(record, raw).map_err(|message| CsvError::Conversion {
            column: column.to_owned(),
            value: raw.to_owned(),
            kind: self.kind,
            message,
        })
    }

    /// Stringified value of this field in `record`.
    pub fn render(&self, record: &T) -> String {
        (self.render)(record)
    }
}

impl<T> Clone for FieldDescriptor<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            column: self.column.clone(),
            assign: Arc::clone(&self.assign),
            render: Arc::clone(&self.render),
        }
    }
}

impl<T> fmt::Debug for FieldDescriptor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("column", &self.column)
            .finish()
    }
}

/// A record type the engine can read into and write from.
///
/// `Default` is the constructor used for every data line: fields whose column
/// is missing keep their default value.
pub trait CsvRecord: Default + Send + 'static {
    /// Fields in declaration order. This order drives the written column order.
    fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>>;
}
