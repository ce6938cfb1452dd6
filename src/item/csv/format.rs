use std::sync::Arc;

use log::{debug, error};

use crate::{
    error::CsvResult,
    record::{CsvRecord, ResolvedHeader, Row},
};

/// How one line maps to an item and back.
///
/// Readers and writers are generic over this trait so that typed records and
/// generic rows share the same batching and line handling.
pub trait RecordFormat {
    type Item;

    /// Receives the header read from the source, once, before any `parse`.
    fn bind(&mut self, header: &[String]);

    /// Builds an item from the cells of one data line.
    fn parse(&self, header: &[String], cells: &[&str]) -> CsvResult<Self::Item>;

    /// Column names to write before `first`. `None` when they cannot be
    /// known yet.
    fn header(&self, first: Option<&Self::Item>) -> Option<Vec<String>>;

    /// Column names to write when a writer is closed without any item.
    /// `None` writes nothing at all.
    fn empty_header(&self) -> Option<Vec<String>> {
        None
    }

    /// Stringified cells of `item`, in column order.
    fn cells(&self, item: &Self::Item) -> Vec<String>;
}

/// Format of a record type `T` described by its cached [`ResolvedHeader`].
pub struct TypedFormat<T> {
    header: Arc<ResolvedHeader<T>>,
    log_errors: bool,
    positions: Vec<Option<usize>>,
}

impl<T> TypedFormat<T> {
    pub fn new(header: Arc<ResolvedHeader<T>>, log_errors: bool) -> Self {
        Self {
            header,
            log_errors,
            positions: Vec::new(),
        }
    }

    pub fn resolved_header(&self) -> &ResolvedHeader<T> {
        &self.header
    }
}

impl<T: CsvRecord> RecordFormat for TypedFormat<T> {
    type Item = T;

    fn bind(&mut self, header: &[String]) {
        self.positions = self
            .header
            .columns()
            .iter()
            .map(|column| header.iter().position(|name| name == column))
            .collect();
    }

    fn parse(&self, _header: &[String], cells: &[&str]) -> CsvResult<T> {
        let mut record = T::default();

        for ((field, column), position) in self.header.iter().zip(&self.positions) {
            // Absent column or short line: the field keeps its default.
            let Some(raw) = position.and_then(|index| cells.get(index)) else {
                continue;
            };

            if let Err(err) = field.assign(&mut record, raw, column) {
                if self.log_errors {
                    error!("Error occurred during field conversion: {}", err);
                    return Err(err);
                }
                debug!("Skipping remaining fields of record: {}", err);
                break;
            }
        }

        Ok(record)
    }

    fn header(&self, first: Option<&T>) -> Option<Vec<String>> {
        first.map(|_| self.header.columns().to_vec())
    }

    // No item to reflect: the header line is written, but empty.
    fn empty_header(&self) -> Option<Vec<String>> {
        Some(Vec::new())
    }

    fn cells(&self, item: &T) -> Vec<String> {
        self.header
            .fields()
            .iter()
            .map(|field| field.render(item))
            .collect()
    }
}

/// Format of generic [`Row`]s keyed by the header names.
#[derive(Debug, Default, Clone, Copy)]
pub struct RowFormat;

impl RecordFormat for RowFormat {
    type Item = Row;

    fn bind(&mut self, _header: &[String]) {}

    fn parse(&self, header: &[String], cells: &[&str]) -> CsvResult<Row> {
        let mut row = Row::with_capacity(header.len());

        for (index, name) in header.iter().enumerate() {
            let value = cells
                .get(index)
                .filter(|cell| !cell.is_empty())
                .map(|cell| cell.to_string());
            row.insert(name.as_str(), value);
        }

        Ok(row)
    }

    fn header(&self, first: Option<&Row>) -> Option<Vec<String>> {
        first.map(|row| row.keys().map(str::to_owned).collect())
    }

    fn cells(&self, item: &Row) -> Vec<String> {
        item.values()
            .map(|value| value.unwrap_or_default().to_owned())
            .collect()
    }
}

/// Splits a line on the literal delimiter. No quoting is recognized.
pub fn split_line<'a>(line: &'a str, delimiter: &str) -> Vec<&'a str> {
    line.split(delimiter).collect()
}
