use std::borrow::Cow;

use log::{debug, warn};

use super::format::{RecordFormat, split_line};
use crate::{
    core::batch::{Batch, BatchStatus},
    error::CsvResult,
};

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Where a reader stands in `Start -> HeaderRead -> {fill, emit}* -> Done`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadPhase {
    /// Nothing read yet; the next line is the header.
    Start,
    /// Header known; the next step fills a batch.
    HeaderRead,
    /// End of input or failure. Only buffered items remain.
    Done,
}

/// Batching core of the readers, independent of how lines are fetched.
///
/// Drivers call [`ReadState::next_ready`] until it is empty, then fetch lines
/// according to [`ReadState::phase`]: one line for the header, up to
/// [`ReadState::batch_size`] lines for a batch.
pub struct ReadState<F: RecordFormat> {
    format: F,
    delimiter: String,
    header: Vec<String>,
    batch: Batch<F::Item>,
    phase: ReadPhase,
    line_count: usize,
}

impl<F: RecordFormat> ReadState<F> {
    pub fn new(format: F, delimiter: &str, batch_size: usize) -> Self {
        Self {
            format,
            delimiter: delimiter.to_owned(),
            header: Vec::new(),
            batch: Batch::new(batch_size.max(1)),
            phase: ReadPhase::Start,
            line_count: 0,
        }
    }

    pub fn phase(&self) -> ReadPhase {
        self.phase
    }

    pub fn header(&self) -> &[String] {
        &self.header
    }

    pub fn batch_size(&self) -> usize {
        self.batch.batch_size()
    }

    /// Data lines consumed so far.
    pub fn line_count(&self) -> usize {
        self.line_count
    }

    /// Next item of the current batch, in input order.
    pub fn next_ready(&mut self) -> Option<F::Item> {
        self.batch.next_item()
    }

    /// Takes the first line of the source as header. `None` means empty input.
    pub fn accept_header(&mut self, line: Option<&str>) {
        let line = line.unwrap_or_default();
        let line = line.strip_prefix(BYTE_ORDER_MARK).unwrap_or(line);

        self.header = if line.is_empty() {
            Vec::new()
        } else {
            split_line(line, &self.delimiter)
                .into_iter()
                .map(str::to_owned)
                .collect()
        };
        self.format.bind(&self.header);
        self.phase = ReadPhase::HeaderRead;

        debug!("Header read: {:?}", self.header);
    }

    /// Starts a new fill pass.
    pub fn begin_batch(&mut self) {
        debug!("Start reading batch");
        self.batch.clear();
    }

    /// Parses one data line into the batch. On error the reader is done and
    /// the pending batch is dropped.
    pub fn accept_line(&mut self, line: &str) -> CsvResult<BatchStatus> {
        self.line_count += 1;
        let cells = split_line(line, &self.delimiter);

        match self.format.parse(&self.header, &cells) {
            Ok(item) => {
                self.batch.add_item(item);
                Ok(self.batch.get_status())
            }
            Err(err) => {
                self.fail();
                Err(err)
            }
        }
    }

    /// The source is exhausted before the batch was full.
    pub fn end_of_input(&mut self) {
        self.phase = ReadPhase::Done;
        debug!("End reading batch: FINISHED ({} item(s))", self.batch.len());
    }

    /// Logs a completed fill pass.
    pub fn end_batch(&self) {
        debug!("End reading batch: FULL ({} item(s))", self.batch.len());
    }

    /// Stops the reader after an error, discarding pending items.
    pub fn fail(&mut self) {
        self.batch.clear();
        self.phase = ReadPhase::Done;
    }

    pub fn format(&self) -> &F {
        &self.format
    }
}

/// Decodes one raw line. Invalid UTF-8 sequences become U+FFFD instead of
/// failing the read.
pub fn decode_line(bytes: &[u8]) -> Cow<'_, str> {
    let line = String::from_utf8_lossy(bytes);
    if let Cow::Owned(_) = line {
        warn!("Replaced invalid UTF-8 in line: {:?}", trim_terminator(&line));
    }
    line
}

/// Removes a trailing `\n` or `\r\n`. A lone `\r` is not a terminator.
pub fn trim_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
