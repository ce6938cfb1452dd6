use crate::error::CsvError;

/// Result of a single read: `Ok(None)` once the source is exhausted.
pub type ItemReaderResult<R> = Result<Option<R>, CsvError>;

pub trait ItemReader<R> {
    fn read(&self) -> ItemReaderResult<R>;
}

pub trait ItemWriter<W> {
    fn write(&self, items: &[W]) -> Result<(), CsvError>;
    fn flush(&self) -> Result<(), CsvError>;
    fn open(&self) -> Result<(), CsvError> {
        Ok(())
    }
    fn close(&self) -> Result<(), CsvError> {
        Ok(())
    }
}
