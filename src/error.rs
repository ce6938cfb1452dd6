use thiserror::Error;

use crate::record::ScalarKind;

#[derive(Error, Debug)]
/// Csv error
pub enum CsvError {
    /// A column mapping was attached with an empty name.
    #[error("Column mapping for field `{field}` must not be empty")]
    EmptyColumnMapping { field: String },

    /// A cell could not be converted to the declared type of its field.
    #[error("Cannot convert `{value}` from column `{column}` to {kind}: {message}")]
    Conversion {
        column: String,
        value: String,
        kind: ScalarKind,
        message: String,
    },

    /// An async read observed a cancellation request at a batch boundary.
    #[error("Read cancelled")]
    Cancelled,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type used across the crate.
pub type CsvResult<T> = Result<T, CsvError>;

impl From<serde_json::Error> for CsvError {
    fn from(error: serde_json::Error) -> Self {
        CsvError::Config(error.to_string())
    }
}
