use std::{
    any::{Any, TypeId, type_name},
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use log::debug;

use super::{CsvRecord, FieldDescriptor};
use crate::error::CsvResult;

/// Fields of a record type paired with their column names, in declaration order.
#[derive(Debug)]
pub struct ResolvedHeader<T> {
    fields: Vec<FieldDescriptor<T>>,
    columns: Vec<String>,
}

impl<T: CsvRecord> ResolvedHeader<T> {
    /// Reflects the fields of `T` and computes their column names.
    pub fn resolve(lower_case: bool) -> CsvResult<Self> {
        let fields = T::fields()?;
        let columns = fields
            .iter()
            .map(|field| field.column_name(lower_case))
            .collect();

        Ok(Self { fields, columns })
    }
}

impl<T> ResolvedHeader<T> {
    pub fn fields(&self) -> &[FieldDescriptor<T>] {
        &self.fields
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Iterates over `(field, column name)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&FieldDescriptor<T>, &str)> {
        self.fields
            .iter()
            .zip(self.columns.iter().map(String::as_str))
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

/// Memoized header resolution keyed by record type.
///
/// Entries are immutable once stored. Two threads resolving the same type at
/// the same time both compute it; the first insert wins and both get an equal
/// result. [`HeaderCache::clear`] drops everything at once.
///
/// # Examples
///
/// ```
/// use batch_csv::record::{CsvRecord, FieldDescriptor, HeaderCache};
/// use batch_csv::CsvResult;
///
/// #[derive(Default)]
/// struct Point {
///     x: i32,
///     y: i32,
/// }
///
/// impl CsvRecord for Point {
///     fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
///         Ok(vec![
///             FieldDescriptor::new("X", |p: &Point| &p.x, |p: &mut Point, v| p.x = v),
///             FieldDescriptor::new("Y", |p: &Point| &p.y, |p: &mut Point, v| p.y = v),
///         ])
///     }
/// }
///
/// let cache = HeaderCache::new(true);
/// let header = cache.resolve::<Point>().unwrap();
/// assert_eq!(header.columns(), ["x", "y"]);
/// assert_eq!(cache.len(), 1);
///
/// cache.clear();
/// assert!(cache.is_empty());
/// ```
#[derive(Default)]
pub struct HeaderCache {
    lower_case: bool,
    entries: RwLock<HashMap<TypeId, Entry>>,
}

impl HeaderCache {
    pub fn new(lower_case: bool) -> Self {
        Self {
            lower_case,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached header of `T`, computing and storing it on first use.
    pub fn resolve<T: CsvRecord>(&self) -> CsvResult<Arc<ResolvedHeader<T>>> {
        let key = TypeId::of::<T>();

        let cached = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&key)
            .cloned();
        if let Some(header) = cached.and_then(|entry| entry.downcast::<ResolvedHeader<T>>().ok()) {
            return Ok(header);
        }

        debug!("Resolving header of {}", type_name::<T>());
        let computed: Entry = Arc::new(ResolvedHeader::<T>::resolve(self.lower_case)?);

        let stored = Arc::clone(
            self.entries
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .entry(key)
                .or_insert(computed),
        );

        match stored.downcast::<ResolvedHeader<T>>() {
            Ok(header) => Ok(header),
            // TypeId keys make a foreign entry impossible; recompute rather than fail.
            Err(_) => Ok(Arc::new(ResolvedHeader::resolve(self.lower_case)?)),
        }
    }

    /// Drops every cached entry.
    pub fn clear(&self) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        debug!("Clearing {} cached header(s)", entries.len());
        entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
