use std::{
    cell::RefCell,
    io::{self, BufRead, BufReader, Read},
};

use super::{
    format::RecordFormat,
    read_state::{ReadPhase, ReadState, decode_line, trim_terminator},
};
use crate::{
    core::{
        batch::BatchStatus,
        config::CsvOptions,
        item::{ItemReader, ItemReaderResult},
    },
    error::CsvResult,
};

/// A blocking CSV item reader.
///
/// Reads the header line first, then fills batches of up to `batch_size`
/// items and hands them out one by one. The reader is a single-pass sequence:
/// once exhausted, or after an error, it only returns `Ok(None)`.
///
/// Lines end at `\n`; a trailing `\r` is dropped with it. Invalid UTF-8 does
/// not stop the read: offending bytes are replaced with U+FFFD.
///
/// Obtained from [`CsvEngine::reader`](crate::CsvEngine::reader) or
/// [`CsvEngine::row_reader`](crate::CsvEngine::row_reader).
///
/// # Examples
///
/// ```
/// use batch_csv::{CsvEngineBuilder, core::item::ItemReader};
///
/// let engine = CsvEngineBuilder::new().delimiter(";").build().unwrap();
/// let reader = engine.row_reader("id;name\n1;\n2;Bob".as_bytes());
///
/// let first = reader.read().unwrap().unwrap();
/// assert_eq!(first.get("id"), Some("1"));
/// assert_eq!(first.get("name"), None);
///
/// let second = reader.read().unwrap().unwrap();
/// assert_eq!(second.get("name"), Some("Bob"));
///
/// assert!(reader.read().unwrap().is_none());
/// ```
pub struct CsvItemReader<R, F: RecordFormat> {
    /// Uses `RefCell` so that `read` can advance the source through `&self`,
    /// as required by the `ItemReader` trait.
    inner: RefCell<ReaderInner<R, F>>,
}

struct ReaderInner<R, F: RecordFormat> {
    source: BufReader<R>,
    line: Vec<u8>,
    state: ReadState<F>,
}

impl<R: Read, F: RecordFormat> CsvItemReader<R, F> {
    pub(crate) fn new(rdr: R, format: F, options: &CsvOptions) -> Self {
        Self {
            inner: RefCell::new(ReaderInner {
                source: BufReader::new(rdr),
                line: Vec::new(),
                state: ReadState::new(format, &options.column_delimiter, options.batch_size),
            }),
        }
    }

    /// Column names read from the source, empty until the first `read`.
    pub fn header(&self) -> Vec<String> {
        self.inner.borrow().state.header().to_vec()
    }

    /// Collects the remaining items, pre-sizing the result with `capacity`.
    pub fn read_to_vec(&self, capacity: usize) -> CsvResult<Vec<F::Item>> {
        let mut items = Vec::with_capacity(capacity);
        while let Some(item) = self.read()? {
            items.push(item);
        }
        Ok(items)
    }
}

impl<R: Read, F: RecordFormat> ReaderInner<R, F> {
    /// Reads the next line without its terminator. `Ok(false)` at end of input.
    fn next_line(&mut self) -> io::Result<bool> {
        self.line.clear();
        let read = self.source.read_until(b'\n', &mut self.line)?;
        Ok(read > 0)
    }

    fn read_header(&mut self) -> CsvResult<()> {
        match self.next_line() {
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

    fn fill_batch(&mut self) -> CsvResult<()> {
        self.state.begin_batch();

        for _ in 0..self.state.batch_size() {
            match self.next_line() {
                Ok(true) => {
                    let line = decode_line(&self.line);
                    if self.state.accept_line(trim_terminator(&line))? == BatchStatus::Full {
                        self.state.end_batch();
                        return Ok(());
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

    fn read(&mut self) -> ItemReaderResult<F::Item> {
        loop {
            if let Some(item) = self.state.next_ready() {
                return Ok(Some(item));
            }

            match self.state.phase() {
                ReadPhase::Start => self.read_header()?,
                ReadPhase::HeaderRead => self.fill_batch()?,
                ReadPhase::Done => return Ok(None),
            }
        }
    }
}

impl<R: Read, F: RecordFormat> ItemReader<F::Item> for CsvItemReader<R, F> {
    /// Reads the next item.
    ///
    /// # Returns
    /// - `Ok(Some(item))` if an item is available
    /// - `Ok(None)` once the source is exhausted
    /// - `Err(CsvError)` on an I/O failure, or a conversion failure when
    ///   `log_errors` is enabled. The reader is finished afterwards.
    fn read(&self) -> ItemReaderResult<F::Item> {
        self.inner.borrow_mut().read()
    }
}

impl<R: Read, F: RecordFormat> Iterator for CsvItemReader<R, F> {
    type Item = CsvResult<F::Item>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.get_mut().read().transpose()
    }
}
