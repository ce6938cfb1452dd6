use tokio::io::{AsyncWrite, AsyncWriteExt, BufWriter};

use super::{format::RecordFormat, write_state::WriteState};
use crate::{core::config::CsvOptions, error::CsvResult};

/// An async CSV item writer over any `tokio::io::AsyncWrite`.
///
/// Same header rules as [`CsvItemWriter`](super::csv_writer::CsvItemWriter).
/// Each written line is a suspension point. Call [`AsyncCsvItemWriter::close`]
/// (or [`AsyncCsvItemWriter::into_inner`]) to flush buffered lines.
///
/// # Examples
///
/// ```
/// use batch_csv::{CsvEngineBuilder, record::Row};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), batch_csv::CsvError> {
/// let engine = CsvEngineBuilder::new().build()?;
/// let mut writer = engine.async_row_writer(Vec::<u8>::new());
///
/// let row: Row = [("a", Some("1")), ("b", Some("2"))].into_iter().collect();
/// writer.write_all(&[row]).await?;
///
/// assert_eq!(writer.into_inner().await?, b"a,b\n1,2\n");
/// # Ok(())
/// # }
/// ```
pub struct AsyncCsvItemWriter<W, F: RecordFormat> {
    sink: BufWriter<W>,
    state: WriteState<F>,
}

impl<W: AsyncWrite + Unpin, F: RecordFormat> AsyncCsvItemWriter<W, F> {
    pub(crate) fn new(wtr: W, format: F, options: &CsvOptions) -> Self {
        Self {
            sink: BufWriter::new(wtr),
            state: WriteState::new(format, options),
        }
    }

    /// Writes the header (when due) and one line per item.
    pub async fn write_all<'a, I>(&mut self, items: I) -> CsvResult<()>
    where
        I: IntoIterator<Item = &'a F::Item>,
        F::Item: 'a,
    {
        let mut items = items.into_iter().peekable();

        if let Some(header) = self.state.header_line(items.peek().copied()) {
            self.sink.write_all(header.as_bytes()).await?;
        }

        for item in items {
            let line = self.state.data_line(item);
            self.sink.write_all(line.as_bytes()).await?;
        }

        Ok(())
    }

    pub async fn flush(&mut self) -> CsvResult<()> {
        self.sink.flush().await?;
        Ok(())
    }

    /// Settles a header still pending and flushes.
    pub async fn close(&mut self) -> CsvResult<()> {
        if let Some(header) = self.state.finish_line() {
            self.sink.write_all(header.as_bytes()).await?;
        }
        self.flush().await
    }

    /// Closes the writer and returns the underlying sink.
    pub async fn into_inner(mut self) -> CsvResult<W> {
        self.close().await?;
        Ok(self.sink.into_inner())
    }
}
