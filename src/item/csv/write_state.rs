use super::format::RecordFormat;
use crate::core::config::{CsvOptions, LineTerminator};

/// Line composition shared by the blocking and async writers.
///
/// Tracks whether the header has been settled. It is settled by the first
/// item written, or by [`WriteState::finish_line`] when no item ever came: a
/// typed format then writes an empty header line, a row format nothing.
pub struct WriteState<F: RecordFormat> {
    format: F,
    delimiter: String,
    terminator: LineTerminator,
    include_header: bool,
    header_done: bool,
}

impl<F: RecordFormat> WriteState<F> {
    pub fn new(format: F, options: &CsvOptions) -> Self {
        Self {
            format,
            delimiter: options.column_delimiter.clone(),
            terminator: options.line_terminator,
            include_header: options.include_header,
            header_done: false,
        }
    }

    /// Header line to emit before `first`, if it is due now.
    pub fn header_line(&mut self, first: Option<&F::Item>) -> Option<String> {
        if self.header_done {
            return None;
        }

        let columns = self.format.header(first)?;
        self.header_done = true;

        self.include_header.then(|| self.join(&columns))
    }

    /// Header line due when the writer is closed before any item.
    pub fn finish_line(&mut self) -> Option<String> {
        if self.header_done {
            return None;
        }

        let columns = self.format.empty_header()?;
        self.header_done = true;

        self.include_header.then(|| self.join(&columns))
    }

    pub fn data_line(&self, item: &F::Item) -> String {
        self.join(&self.format.cells(item))
    }

    pub fn is_header_done(&self) -> bool {
        self.header_done
    }

    fn join(&self, cells: &[String]) -> String {
        let mut line = cells.join(&self.delimiter);
        line.push_str(self.terminator.as_str());
        line
    }
}
