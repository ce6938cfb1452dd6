use indexmap::IndexMap;
use serde::Serialize;

/// One CSV line without a record type: column name to optional value, in
/// header order. Keys are unique; inserting an existing key replaces its value
/// in place.
///
/// Two rows are equal when they hold the same entries in the same order.
///
/// # Examples
///
/// ```
/// use batch_csv::record::Row;
///
/// let mut row = Row::new();
/// row.insert("id", Some("1"));
/// row.insert("name", None::<String>);
///
/// assert_eq!(row.get("id"), Some("1"));
/// assert_eq!(row.get("name"), None);
/// assert!(row.contains_key("name"));
/// assert_eq!(row.keys().collect::<Vec<_>>(), ["id", "name"]);
/// ```
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Row {
    entries: IndexMap<String, Option<String>>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    /// Sets `key` to `value`, returning the previous value if the key existed.
    pub fn insert<K, V>(&mut self, key: K, value: Option<V>) -> Option<Option<String>>
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.insert(key.into(), value.map(Into::into))
    }

    /// Value of `key`; `None` both for an absent key and an absent value.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).and_then(|value| value.as_deref())
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn values(&self) -> impl Iterator<Item = Option<&str>> {
        self.entries.values().map(|value| value.as_deref())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&str>)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_deref()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl PartialEq for Row {
    fn eq(&self, other: &Self) -> bool {
        self.entries.iter().eq(other.entries.iter())
    }
}

impl Eq for Row {}

impl<K, V> FromIterator<(K, Option<V>)> for Row
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, Option<V>)>>(iter: I) -> Self {
        let mut row = Row::new();
        for (key, value) in iter {
            row.insert(key, value);
        }
        row
    }
}
