use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
    sync::Arc,
};

use log::debug;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::{
    core::config::{CsvOptions, LineTerminator},
    error::CsvResult,
    item::csv::{
        async_reader::AsyncCsvItemReader,
        async_writer::AsyncCsvItemWriter,
        csv_reader::CsvItemReader,
        csv_writer::CsvItemWriter,
        format::{RowFormat, TypedFormat},
    },
    record::{CsvRecord, HeaderCache, ResolvedHeader, Row},
};

/// Blocking reader of typed records.
pub type RecordReader<R, T> = CsvItemReader<R, TypedFormat<T>>;
/// Blocking reader of generic rows.
pub type RowReader<R> = CsvItemReader<R, RowFormat>;
/// Blocking writer of typed records.
pub type RecordWriter<W, T> = CsvItemWriter<W, TypedFormat<T>>;
/// Blocking writer of generic rows.
pub type RowWriter<W> = CsvItemWriter<W, RowFormat>;
/// Async reader of typed records.
pub type AsyncRecordReader<R, T> = AsyncCsvItemReader<R, TypedFormat<T>>;
/// Async reader of generic rows.
pub type AsyncRowReader<R> = AsyncCsvItemReader<R, RowFormat>;
/// Async writer of typed records.
pub type AsyncRecordWriter<W, T> = AsyncCsvItemWriter<W, TypedFormat<T>>;
/// Async writer of generic rows.
pub type AsyncRowWriter<W> = AsyncCsvItemWriter<W, RowFormat>;

/// Configured entry point for reading and writing.
///
/// Holds the options and the header cache. Clones share the same cache, so
/// a record type is reflected once per engine, whichever clone or thread
/// first needs it.
///
/// # Examples
///
/// ```
/// use batch_csv::{CsvEngineBuilder, record::Row};
///
/// let engine = CsvEngineBuilder::new().delimiter(";").build().unwrap();
///
/// let rows: Vec<Row> = engine.read_rows_str("id;name\n1;\n").unwrap();
/// assert_eq!(rows[0].get("id"), Some("1"));
/// assert_eq!(rows[0].get("name"), None);
///
/// assert_eq!(engine.write_rows_string(&rows).unwrap(), "id;name\n1;\n");
/// ```
#[derive(Clone)]
pub struct CsvEngine {
    options: Arc<CsvOptions>,
    cache: Arc<HeaderCache>,
}

impl CsvEngine {
    /// Creates an engine after validating `options`.
    pub fn new(options: CsvOptions) -> CsvResult<Self> {
        options.validate()?;
        let cache = HeaderCache::new(options.use_lower_case_headers);

        Ok(Self {
            options: Arc::new(options),
            cache: Arc::new(cache),
        })
    }

    pub fn options(&self) -> &CsvOptions {
        &self.options
    }

    /// Fields and column names of `T`, from the cache when available.
    pub fn resolve_header<T: CsvRecord>(&self) -> CsvResult<Arc<ResolvedHeader<T>>> {
        self.cache.resolve::<T>()
    }

    /// Forgets every resolved header. Readers and writers already created
    /// keep the header they resolved.
    pub fn clear_caches(&self) {
        self.cache.clear();
    }

    fn typed_format<T: CsvRecord>(&self) -> CsvResult<TypedFormat<T>> {
        Ok(TypedFormat::new(self.resolve_header::<T>()?, self.options.log_errors))
    }

    /// Reader of `T` records over `rdr`.
    pub fn reader<T: CsvRecord, R: Read>(&self, rdr: R) -> CsvResult<RecordReader<R, T>> {
        Ok(CsvItemReader::new(rdr, self.typed_format::<T>()?, &self.options))
    }

    /// Reader of generic rows over `rdr`.
    pub fn row_reader<R: Read>(&self, rdr: R) -> RowReader<R> {
        CsvItemReader::new(rdr, RowFormat, &self.options)
    }

    /// Reader of `T` records over the file at `path`.
    ///
    /// # Errors
    /// The file cannot be opened.
    pub fn reader_from_path<T: CsvRecord, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CsvResult<RecordReader<File, T>> {
        debug!("Opening {} for reading", path.as_ref().display());
        self.reader(File::open(path)?)
    }

    /// Reader of generic rows over the file at `path`.
    pub fn row_reader_from_path<P: AsRef<Path>>(&self, path: P) -> CsvResult<RowReader<File>> {
        debug!("Opening {} for reading", path.as_ref().display());
        Ok(self.row_reader(File::open(path)?))
    }

    /// Reads every `T` record of `rdr`.
    pub fn read_all<T: CsvRecord, R: Read>(&self, rdr: R) -> CsvResult<Vec<T>> {
        self.reader::<T, R>(rdr)?
            .read_to_vec(self.options.initial_capacity)
    }

    /// Reads every `T` record of `text`.
    pub fn read_str<T: CsvRecord>(&self, text: &str) -> CsvResult<Vec<T>> {
        self.read_all(text.as_bytes())
    }

    /// Reads every row of `text`.
    pub fn read_rows_str(&self, text: &str) -> CsvResult<Vec<Row>> {
        self.row_reader(text.as_bytes())
            .read_to_vec(self.options.initial_capacity)
    }

    /// Writer of `T` records into `wtr`.
    pub fn writer<T: CsvRecord, W: Write>(&self, wtr: W) -> CsvResult<RecordWriter<W, T>> {
        Ok(CsvItemWriter::new(wtr, self.typed_format::<T>()?, &self.options))
    }

    /// Writer of generic rows into `wtr`.
    pub fn row_writer<W: Write>(&self, wtr: W) -> RowWriter<W> {
        CsvItemWriter::new(wtr, RowFormat, &self.options)
    }

    /// Writer of `T` records into a file created (or truncated) at `path`.
    pub fn writer_to_path<T: CsvRecord, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CsvResult<RecordWriter<File, T>> {
        debug!("Opening {} for writing", path.as_ref().display());
        self.writer(File::create(path)?)
    }

    /// Writer of generic rows into a file created (or truncated) at `path`.
    pub fn row_writer_to_path<P: AsRef<Path>>(&self, path: P) -> CsvResult<RowWriter<File>> {
        debug!("Opening {} for writing", path.as_ref().display());
        Ok(self.row_writer(File::create(path)?))
    }

    /// Renders `records` as CSV text.
    pub fn write_string<T: CsvRecord>(&self, records: &[T]) -> CsvResult<String> {
        let writer = self.writer::<T, _>(Vec::new())?;
        writer.write_all(records)?;
        into_string(writer.into_inner()?)
    }

    /// Renders `rows` as CSV text.
    pub fn write_rows_string(&self, rows: &[Row]) -> CsvResult<String> {
        let writer = self.row_writer(Vec::new());
        writer.write_all(rows)?;
        into_string(writer.into_inner()?)
    }

    /// Async reader of `T` records over `rdr`.
    pub fn async_reader<T: CsvRecord, R: AsyncRead + Unpin>(
        &self,
        rdr: R,
    ) -> CsvResult<AsyncRecordReader<R, T>> {
        Ok(AsyncCsvItemReader::new(rdr, self.typed_format::<T>()?, &self.options))
    }

    /// Async reader of generic rows over `rdr`.
    pub fn async_row_reader<R: AsyncRead + Unpin>(&self, rdr: R) -> AsyncRowReader<R> {
        AsyncCsvItemReader::new(rdr, RowFormat, &self.options)
    }

    /// Async reader of `T` records over the file at `path`.
    pub async fn async_reader_from_path<T: CsvRecord, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CsvResult<AsyncRecordReader<tokio::fs::File, T>> {
        debug!("Opening {} for reading", path.as_ref().display());
        let file = tokio::fs::File::open(path).await?;
        self.async_reader(file)
    }

    /// Reads every `T` record of `rdr` asynchronously.
    pub async fn read_all_async<T: CsvRecord, R: AsyncRead + Unpin>(
        &self,
        rdr: R,
    ) -> CsvResult<Vec<T>> {
        self.async_reader::<T, R>(rdr)?
            .read_to_vec(self.options.initial_capacity)
            .await
    }

    /// Async writer of `T` records into `wtr`.
    pub fn async_writer<T: CsvRecord, W: AsyncWrite + Unpin>(
        &self,
        wtr: W,
    ) -> CsvResult<AsyncRecordWriter<W, T>> {
        Ok(AsyncCsvItemWriter::new(wtr, self.typed_format::<T>()?, &self.options))
    }

    /// Async writer of generic rows into `wtr`.
    pub fn async_row_writer<W: AsyncWrite + Unpin>(&self, wtr: W) -> AsyncRowWriter<W> {
        AsyncCsvItemWriter::new(wtr, RowFormat, &self.options)
    }

    /// Async writer of `T` records into a file created (or truncated) at `path`.
    pub async fn async_writer_to_path<T: CsvRecord, P: AsRef<Path>>(
        &self,
        path: P,
    ) -> CsvResult<AsyncRecordWriter<tokio::fs::File, T>> {
        debug!("Opening {} for writing", path.as_ref().display());
        let file = tokio::fs::File::create(path).await?;
        self.async_writer(file)
    }
}

impl Default for CsvEngine {
    fn default() -> Self {
        Self {
            options: Arc::new(CsvOptions::default()),
            cache: Arc::new(HeaderCache::default()),
        }
    }
}

fn into_string(bytes: Vec<u8>) -> CsvResult<String> {
    String::from_utf8(bytes)
        .map_err(|error| std::io::Error::new(std::io::ErrorKind::InvalidData, error).into())
}

/// A builder for configuring a [`CsvEngine`].
///
/// # Default Configuration
///
/// - Delimiter: comma (,)
/// - Header line written: yes
/// - Lower-case headers: no
/// - Batch size: 1000
/// - Initial capacity: 100
/// - Conversion errors propagated: no
/// - Line terminator: LF
///
/// # Examples
///
/// ```
/// use batch_csv::CsvEngineBuilder;
/// use batch_csv::core::config::LineTerminator;
///
/// let engine = CsvEngineBuilder::new()
///     .delimiter("\t")
///     .has_headers(false)
///     .batch_size(64)
///     .terminator(LineTerminator::CrLf)
///     .build()
///     .unwrap();
///
/// assert_eq!(engine.options().batch_size, 64);
/// assert!(CsvEngineBuilder::new().delimiter("").build().is_err());
/// ```
#[derive(Default)]
pub struct CsvEngineBuilder {
    options: CsvOptions,
}

impl CsvEngineBuilder {
    pub fn new() -> Self {
        Self {
            options: CsvOptions::default(),
        }
    }

    /// Starts from already loaded options.
    pub fn options(mut self, options: CsvOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the separator used to split and join cells.
    pub fn delimiter<S: Into<String>>(mut self, delimiter: S) -> Self {
        self.options.column_delimiter = delimiter.into();
        self
    }

    /// Sets whether writers emit a header line.
    pub fn has_headers(mut self, yes: bool) -> Self {
        self.options.include_header = yes;
        self
    }

    /// Lower-cases resolved column names for reading and writing.
    pub fn lower_case_headers(mut self, yes: bool) -> Self {
        self.options.use_lower_case_headers = yes;
        self
    }

    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.options.batch_size = batch_size;
        self
    }

    pub fn initial_capacity(mut self, capacity: usize) -> Self {
        self.options.initial_capacity = capacity;
        self
    }

    /// Propagates conversion errors instead of skipping the rest of a record.
    pub fn log_errors(mut self, yes: bool) -> Self {
        self.options.log_errors = yes;
        self
    }

    pub fn terminator(mut self, terminator: LineTerminator) -> Self {
        self.options.line_terminator = terminator;
        self
    }

    pub fn build(self) -> CsvResult<CsvEngine> {
        CsvEngine::new(self.options)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::{CsvEngine, CsvEngineBuilder};
    use crate::{
        core::config::CsvOptions,
        error::{CsvError, CsvResult},
        record::{CsvRecord, FieldDescriptor},
    };

    #[derive(Debug, Default, PartialEq)]
    struct Item {
        sku: String,
        qty: i32,
    }

    impl CsvRecord for Item {
        fn fields() -> CsvResult<Vec<FieldDescriptor<Self>>> {
            Ok(vec![
                FieldDescriptor::new("Sku", |i: &Item| &i.sku, |i: &mut Item, v| i.sku = v),
                FieldDescriptor::new("Qty", |i: &Item| &i.qty, |i: &mut Item, v| i.qty = v)
                    .column("Quantity")?,
            ])
        }
    }

    #[test]
    fn clones_share_the_header_cache() -> CsvResult<()> {
        let engine = CsvEngineBuilder::new().build()?;
        let clone = engine.clone();

        let header = engine.resolve_header::<Item>()?;
        assert!(std::sync::Arc::ptr_eq(&header, &clone.resolve_header::<Item>()?));

        clone.clear_caches();
        let fresh = engine.resolve_header::<Item>()?;
        assert!(!std::sync::Arc::ptr_eq(&header, &fresh));
        assert_eq!(header.columns(), fresh.columns());
        Ok(())
    }

    #[test]
    fn lower_case_headers_apply_to_both_directions() -> Result<(), Box<dyn Error>> {
        let engine = CsvEngineBuilder::new().lower_case_headers(true).build()?;

        let items: Vec<Item> = engine.read_str("sku,quantity\nA-1,4\n")?;
        assert_eq!(
            items,
            vec![Item {
                sku: "A-1".to_string(),
                qty: 4
            }]
        );

        // exact match: the mixed-case header is not recognized
        let missed: Vec<Item> = engine.read_str("Sku,Quantity\nA-1,4\n")?;
        assert_eq!(missed[0], Item::default());

        assert_eq!(engine.write_string(&items)?, "sku,quantity\nA-1,4\n");
        Ok(())
    }

    #[test]
    fn invalid_options_are_rejected() {
        let options = CsvOptions {
            batch_size: 0,
            ..CsvOptions::default()
        };

        assert!(matches!(CsvEngine::new(options), Err(CsvError::Config(_))));
    }

    #[test]
    fn default_engine_uses_default_options() {
        let engine = CsvEngine::default();

        assert_eq!(engine.options(), &CsvOptions::default());
    }
}
