use serde::{Deserialize, Serialize};

use crate::error::{CsvError, CsvResult};

/// Terminator appended to every written line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTerminator {
    #[default]
    Lf,
    CrLf,
}

impl LineTerminator {
    pub fn as_str(&self) -> &'static str {
        match self {
            LineTerminator::Lf => "\n",
            LineTerminator::CrLf => "\r\n",
        }
    }
}

/// Options shared by readers and writers of one engine.
///
/// Deserializable from JSON with either snake_case or camelCase keys; missing
/// keys take their default.
///
/// # Examples
///
/// ```
/// use batch_csv::core::config::CsvOptions;
///
/// let options = CsvOptions::from_json(r#"{ "columnDelimiter": ";", "batchSize": 2 }"#).unwrap();
/// assert_eq!(options.column_delimiter, ";");
/// assert_eq!(options.batch_size, 2);
/// assert!(options.include_header);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvOptions {
    /// Separator used both to split and to join cells.
    #[serde(alias = "columnDelimiter")]
    pub column_delimiter: String,
    /// Whether writers emit a header line.
    #[serde(alias = "includeHeader")]
    pub include_header: bool,
    /// Lower-cases resolved column names, for reading and writing.
    #[serde(alias = "useLowerCaseHeaders")]
    pub use_lower_case_headers: bool,
    /// Maximum number of items buffered per read pass.
    #[serde(alias = "batchSize")]
    pub batch_size: usize,
    /// Pre-sizing hint for whole-collection reads.
    #[serde(alias = "initialCapacity")]
    pub initial_capacity: usize,
    /// Propagate conversion failures instead of skipping the rest of the record.
    #[serde(alias = "logErrors")]
    pub log_errors: bool,
    #[serde(alias = "lineTerminator")]
    pub line_terminator: LineTerminator,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self {
            column_delimiter: ",".to_string(),
            include_header: true,
            use_lower_case_headers: false,
            batch_size: 1000,
            initial_capacity: 100,
            log_errors: false,
            line_terminator: LineTerminator::Lf,
        }
    }
}

impl CsvOptions {
    /// Parses and validates options from a JSON document.
    pub fn from_json(json: &str) -> CsvResult<Self> {
        let options: CsvOptions = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn validate(&self) -> CsvResult<()> {
        if self.column_delimiter.is_empty() {
            return Err(CsvError::Config("column delimiter must not be empty".to_string()));
        }
        if self.batch_size == 0 {
            return Err(CsvError::Config("batch size must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvOptions, LineTerminator};
    use crate::error::CsvError;

    #[test]
    fn defaults_should_match_documented_values() {
        let options = CsvOptions::default();

        assert_eq!(options.column_delimiter, ",");
        assert!(options.include_header);
        assert!(!options.use_lower_case_headers);
        assert!(!options.log_errors);
        assert_eq!(options.line_terminator, LineTerminator::Lf);
        assert!(options.validate().is_ok());
    }

    #[test]
    fn snake_case_keys_should_be_accepted() -> Result<(), CsvError> {
        let options = CsvOptions::from_json(
            r#"{ "include_header": false, "log_errors": true, "line_terminator": "crlf" }"#,
        )?;

        assert!(!options.include_header);
        assert!(options.log_errors);
        assert_eq!(options.line_terminator.as_str(), "\r\n");

        Ok(())
    }

    #[test]
    fn invalid_options_should_be_rejected() {
        assert!(matches!(
            CsvOptions::from_json(r#"{ "columnDelimiter": "" }"#),
            Err(CsvError::Config(_))
        ));
        assert!(matches!(
            CsvOptions::from_json(r#"{ "batchSize": 0 }"#),
            Err(CsvError::Config(_))
        ));
        assert!(matches!(
            CsvOptions::from_json("not json"),
            Err(CsvError::Config(_))
        ));
    }
}
