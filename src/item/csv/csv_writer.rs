use std::{
    cell::RefCell,
    io::{BufWriter, Write},
};

use super::{format::RecordFormat, write_state::WriteState};
use crate::{
    core::{config::CsvOptions, item::ItemWriter},
    error::{CsvError, CsvResult},
};

/// A blocking CSV item writer.
///
/// The header line is written before the first data line, from the record
/// type or from the first row's keys. When the writer is closed (or
/// [`CsvItemWriter::into_inner`] is called) without any item, a typed writer
/// emits a single empty header line and a row writer nothing at all.
///
/// # Examples
///
/// ```
/// use batch_csv::{CsvEngineBuilder, core::item::ItemWriter, record::Row};
///
/// let engine = CsvEngineBuilder::new().delimiter(";").build().unwrap();
/// let writer = engine.row_writer(vec![]);
///
/// let row: Row = [("id", Some("1")), ("name", None)].into_iter().collect();
/// writer.write(&[row]).unwrap();
///
/// let data = String::from_utf8(writer.into_inner().unwrap()).unwrap();
/// assert_eq!(data, "id;name\n1;\n");
/// ```
pub struct CsvItemWriter<W: Write, F: RecordFormat> {
    wrapper: RefCell<WriterInner<W, F>>,
}

struct WriterInner<W: Write, F: RecordFormat> {
    sink: BufWriter<W>,
    state: WriteState<F>,
}

impl<W: Write, F: RecordFormat> CsvItemWriter<W, F> {
    pub(crate) fn new(wtr: W, format: F, options: &CsvOptions) -> Self {
        Self {
            wrapper: RefCell::new(WriterInner {
                sink: BufWriter::new(wtr),
                state: WriteState::new(format, options),
            }),
        }
    }

    /// Writes the header (when due) and one line per item.
    pub fn write_all<'a, I>(&self, items: I) -> CsvResult<()>
    where
        I: IntoIterator<Item = &'a F::Item>,
        F::Item: 'a,
    {
        let mut inner = self.wrapper.borrow_mut();
        let WriterInner { sink, state } = &mut *inner;
        let mut items = items.into_iter().peekable();

        if let Some(header) = state.header_line(items.peek().copied()) {
            sink.write_all(header.as_bytes())?;
        }

        for item in items {
            sink.write_all(state.data_line(item).as_bytes())?;
        }

        Ok(())
    }

    /// Writes the header line still due when no item was written.
    fn finish(&self) -> CsvResult<()> {
        let mut inner = self.wrapper.borrow_mut();
        let WriterInner { sink, state } = &mut *inner;

        if let Some(header) = state.finish_line() {
            sink.write_all(header.as_bytes())?;
        }
        Ok(())
    }

    /// Settles the header, flushes and returns the underlying writer.
    pub fn into_inner(self) -> CsvResult<W> {
        self.finish()?;
        let inner = self.wrapper.into_inner();
        inner
            .sink
            .into_inner()
            .map_err(|error| CsvError::Io(error.into_error()))
    }
}

impl<W: Write, F: RecordFormat> ItemWriter<F::Item> for CsvItemWriter<W, F> {
    fn write(&self, items: &[F::Item]) -> Result<(), CsvError> {
        self.write_all(items)
    }

    /// Flush the contents of the internal buffer to the underlying writer.
    ///
    /// Note that this also flushes the underlying writer.
    fn flush(&self) -> Result<(), CsvError> {
        self.wrapper.borrow_mut().sink.flush()?;
        Ok(())
    }

    /// Settles a header still pending, then flushes.
    fn close(&self) -> Result<(), CsvError> {
        self.finish()?;
        ItemWriter::<F::Item>::flush(self)
    }
}
