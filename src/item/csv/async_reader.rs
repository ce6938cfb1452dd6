use log::debug;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio_util::sync::CancellationToken;

use super::{
    format::RecordFormat,
    read_state::{ReadPhase, ReadState, decode_line, trim_terminator},
};
use crate::{
    core::{batch::BatchStatus, config::CsvOptions},
    error::{CsvError, CsvResult},
};

/// An async CSV item reader over any `tokio::io::AsyncRead`.
///
/// Runs the same batching as [`CsvItemReader`](super::csv_reader::CsvItemReader);
/// every line read may suspend the task.
///
/// # Cancellation
///
/// Cancellation granularity is one batch. The token is checked before each
/// fill pass only: a request made while a batch is being filled or handed
/// out takes effect once that batch has been fully returned. The reader then
/// returns `CsvError::Cancelled` once and is finished.
///
/// # Examples
///
/// ```
/// use batch_csv::CsvEngineBuilder;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), batch_csv::CsvError> {
/// let engine = CsvEngineBuilder::new().build()?;
/// let mut reader = engine.async_row_reader("a,b\n1,2\n".as_bytes());
///
/// let row = reader.next().await?.unwrap();
/// assert_eq!(row.get("b"), Some("2"));
/// assert!(reader.next().await?.is_none());
/// # Ok(())
/// # }
/// ```
pub struct AsyncCsvItemReader<R, F: RecordFormat> {
    source: BufReader<R>,
    line: Vec<u8>,
    state: ReadState<F>,
    cancellation: Option<CancellationToken>,
}

impl<R: AsyncRead + Unpin, F: RecordFormat> AsyncCsvItemReader<R, F> {
    pub(crate) fn new(rdr: R, format: F, options: &CsvOptions) -> Self {
        Self {
            source: BufReader::new(rdr),
            line: Vec::new(),
            state: ReadState::new(format, &options.column_delimiter, options.batch_size),
            cancellation: None,
        }
    }

    /// Observes `token` at every batch boundary.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    pub fn header(&self) -> &[String] {
        self.state.header()
    }

    /// Reads the next item, `Ok(None)` once the source is exhausted.
    pub async fn next(&mut self) -> CsvResult<Option<F::Item>> {
        loop {
            if let Some(item) = self.state.next_ready() {
                return Ok(Some(item));
            }

            match self.state.phase() {
                ReadPhase::Start => self.read_header().await?,
                ReadPhase::HeaderRead => {
                    self.check_cancellation()?;
                    self.fill_batch().await?;
                }
                ReadPhase::Done => return Ok(None),
            }
        }
    }

    /// Collects the remaining items, pre-sizing the result with `capacity`.
    pub async fn read_to_vec(&mut self, capacity: usize) -> CsvResult<Vec<F::Item>> {
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = self.next().await? {
            items.push(item);
        }
        Ok(items)
    }

    fn check_cancellation(&mut self) -> CsvResult<()> {
        match &self.cancellation {
            Some(token) if token.is_cancelled() => {
                debug!("Cancellation observed after {} line(s)", self.state.line_count());
                self.state.fail();
                Err(CsvError::Cancelled)
            }
            _ => Ok(()),
        }
    }

    async fn next_line(&mut self) -> std::io::Result<bool> {
        self.line.clear();
        let read = self.source.read_until(b'\n', &mut self.line).await?;
        Ok(read > 0)
    }

    async fn read_header(&mut self) -> CsvResult<()> {
        match self.next_line().await {
            Ok(true) => {
                let line = decode_line(&self.line);
                self.state.accept_header(Some(trim_terminator(&line)));
                Ok(())
            }
            Ok(false) => {
                self.state.accept_header(None);
                Ok(())
            }
            Err(err) => {
                self.state.fail();
                Err(err.into())
            }
        }
    }

    async fn fill_batch(&mut self) -> CsvResult<()> {
        self.state.begin_batch();

        for _ in 0..self.state.batch_size() {
            match self.next_line().await {
                Ok(true) => {
                    let line = decode_line(&self.line);
                    if self.state.accept_line(trim_terminator(&line))? == BatchStatus::Full {
                        break;
                    }
                }
                Ok(false) => {
                    self.state.end_of_input();
                    return Ok(());
                }
                Err(err) => {
                    self.state.fail();
                    return Err(err.into());
                }
            }
        }

        self.state.end_batch();
        Ok(())
    }
}
