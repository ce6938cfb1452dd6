use std::fmt;

/// Scalar type family a field is declared with.
///
/// Only used for reporting: the actual conversion is carried by the
/// [`CsvField`] implementation of the field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Bool,
    Char,
    Integer,
    Unsigned,
    Float,
    Text,
    Date,
    DateTime,
    Uuid,
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScalarKind::Bool => "bool",
            ScalarKind::Char => "char",
            ScalarKind::Integer => "integer",
            ScalarKind::Unsigned => "unsigned integer",
            ScalarKind::Float => "float",
            ScalarKind::Text => "text",
            ScalarKind::Date => "date",
            ScalarKind::DateTime => "date-time",
            ScalarKind::Uuid => "uuid",
        };
        f.write_str(name)
    }
}

/// A scalar type that can live in a CSV cell.
///
/// `coerce` turns the raw cell text into a value and `stringify` is its
/// inverse for writing. Implementations exist for the primitive types,
/// `String`, `Option<F>` and, behind features, `chrono` dates and `uuid::Uuid`.
///
/// # Examples
///
/// ```
/// use batch_csv::record::CsvField;
///
/// assert_eq!(<u32 as CsvField>::coerce(" 42 ").unwrap(), 42);
/// assert!(<u32 as CsvField>::coerce("forty-two").is_err());
/// assert_eq!(<Option<u32> as CsvField>::coerce("").unwrap(), None);
/// assert_eq!(None::<u32>.stringify(), "");
/// ```
pub trait CsvField: Sized + Send + Sync + 'static {
    const KIND: ScalarKind;

    /// Parses the raw cell text. The error is a human readable reason.
    fn coerce(raw: &str) -> Result<Self, String>;

    /// Canonical text of the value.
    fn stringify(&self) -> String;
}

macro_rules! numeric_field {
    ($kind:expr => $($ty:ty),+) => {
        $(
            impl CsvField for $ty {
                const KIND: ScalarKind = $kind;

                fn coerce(raw: &str) -> Result<Self, String> {
                    raw.trim().parse::<$ty>().map_err(|error| error.to_string())
                }

                fn stringify(&self) -> String {
                    self.to_string()
                }
            }
        )+
    };
}

numeric_field!(ScalarKind::Integer => i8, i16, i32, i64, i128, isize);
numeric_field!(ScalarKind::Unsigned => u8, u16, u32, u64, u128, usize);
numeric_field!(ScalarKind::Float => f32, f64);

impl CsvField for bool {
    const KIND: ScalarKind = ScalarKind::Bool;

    fn coerce(raw: &str) -> Result<Self, String> {
        let raw = raw.trim();
        if raw.eq_ignore_ascii_case("true") {
            Ok(true)
        } else if raw.eq_ignore_ascii_case("false") {
            Ok(false)
        } else {
            Err(format!("`{raw}` is neither true nor false"))
        }
    }

    fn stringify(&self) -> String {
        self.to_string()
    }
}

impl CsvField for char {
    const KIND: ScalarKind = ScalarKind::Char;

    fn coerce(raw: &str) -> Result<Self, String> {
        let mut chars = raw.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Ok(c),
            _ => Err(format!("expected exactly one character, got {}", raw.chars().count())),
        }
    }

    fn stringify(&self) -> String {
        self.to_string()
    }
}

impl CsvField for String {
    const KIND: ScalarKind = ScalarKind::Text;

    fn coerce(raw: &str) -> Result<Self, String> {
        Ok(raw.to_owned())
    }

    fn stringify(&self) -> String {
        self.clone()
    }
}

/// An empty cell is `None`, anything else must coerce to `F`.
impl<F: CsvField> CsvField for Option<F> {
    const KIND: ScalarKind = F::KIND;

    fn coerce(raw: &str) -> Result<Self, String> {
        if raw.is_empty() {
            Ok(None)
        } else {
            F::coerce(raw).map(Some)
        }
    }

    fn stringify(&self) -> String {
        match self {
            Some(value) => value.stringify(),
            None => String::new(),
        }
    }
}

#[cfg(feature = "chrono")]
mod dates {
    use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

    use super::{CsvField, ScalarKind};

    const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

    impl CsvField for NaiveDate {
        const KIND: ScalarKind = ScalarKind::Date;

        fn coerce(raw: &str) -> Result<Self, String> {
            NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|error| error.to_string())
        }

        fn stringify(&self) -> String {
            self.format("%Y-%m-%d").to_string()
        }
    }

    impl CsvField for NaiveDateTime {
        const KIND: ScalarKind = ScalarKind::DateTime;

        fn coerce(raw: &str) -> Result<Self, String> {
            let raw = raw.trim();
            let mut last_error = String::new();
            for format in DATE_TIME_FORMATS {
                match NaiveDateTime::parse_from_str(raw, format) {
                    Ok(value) => return Ok(value),
                    Err(error) => last_error = error.to_string(),
                }
            }
            Err(last_error)
        }

        fn stringify(&self) -> String {
            self.format(DATE_TIME_FORMATS[0]).to_string()
        }
    }

    impl CsvField for DateTime<Utc> {
        const KIND: ScalarKind = ScalarKind::DateTime;

        fn coerce(raw: &str) -> Result<Self, String> {
            DateTime::parse_from_rfc3339(raw.trim())
                .map(|value| value.with_timezone(&Utc))
                .map_err(|error| error.to_string())
        }

        fn stringify(&self) -> String {
            self.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        }
    }
}

#[cfg(feature = "uuid")]
impl CsvField for uuid::Uuid {
    const KIND: ScalarKind = ScalarKind::Uuid;

    fn coerce(raw: &str) -> Result<Self, String> {
        uuid::Uuid::parse_str(raw.trim()).map_err(|error| error.to_string())
    }

    fn stringify(&self) -> String {
        self.hyphenated().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::{CsvField, ScalarKind};

    #[test]
    fn numbers_should_be_trimmed_before_parsing() {
        assert_eq!(i32::coerce(" -12 "), Ok(-12));
        assert_eq!(u8::coerce("255"), Ok(255));
        assert!(u8::coerce("256").is_err());
        assert!(u32::coerce("-1").is_err());
        assert_eq!(f64::coerce("1.5"), Ok(1.5));
    }

    #[test]
    fn empty_cell_is_not_a_number() {
        assert!(i64::coerce("").is_err());
        assert_eq!(Option::<i64>::coerce(""), Ok(None));
        assert_eq!(Option::<i64>::coerce("7"), Ok(Some(7)));
    }

    #[test]
    fn booleans_ignore_case() {
        assert_eq!(bool::coerce("True"), Ok(true));
        assert_eq!(bool::coerce("FALSE"), Ok(false));
        assert!(bool::coerce("yes").is_err());
        assert_eq!(true.stringify(), "true");
    }

    #[test]
    fn strings_are_kept_verbatim() {
        assert_eq!(String::coerce("  padded "), Ok("  padded ".to_string()));
        assert_eq!(String::coerce(""), Ok(String::new()));
    }

    #[test]
    fn char_requires_a_single_character() {
        assert_eq!(char::coerce("é"), Ok('é'));
        assert!(char::coerce("ab").is_err());
        assert!(char::coerce("").is_err());
    }

    #[test]
    fn option_reports_inner_kind() {
        assert_eq!(<Option<f32> as CsvField>::KIND, ScalarKind::Float);
        assert_eq!(Some(2.5f32).stringify(), "2.5");
    }

    #[cfg(feature = "chrono")]
    #[test]
    fn dates_should_round_trip() {
        use chrono::{NaiveDate, NaiveDateTime};

        let date = NaiveDate::coerce("2024-02-29").unwrap();
        assert_eq!(date.stringify(), "2024-02-29");
        assert!(NaiveDate::coerce("2023-02-29").is_err());

        let spaced = NaiveDateTime::coerce("2024-01-02 03:04:05").unwrap();
        let iso = NaiveDateTime::coerce(&spaced.stringify()).unwrap();
        assert_eq!(spaced, iso);
    }

    #[cfg(feature = "uuid")]
    #[test]
    fn uuid_should_round_trip() {
        let id = uuid::Uuid::new_v4();
        assert_eq!(uuid::Uuid::coerce(&id.stringify()), Ok(id));
    }
}
