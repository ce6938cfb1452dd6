//! Mock sink and flaky source for I/O failure cases.
use mockall::mock;

use std::io::{self, Cursor, Read, Write};

mock! {
    pub Sink {}
    impl Write for Sink {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize>;
        fn flush(&mut self) -> io::Result<()>;
    }
}

/// Serves `data`, then fails every further read.
pub struct FlakySource {
    data: Cursor<&'static [u8]>,
}

impl FlakySource {
    pub fn new(data: &'static str) -> Self {
        Self {
            data: Cursor::new(data.as_bytes()),
        }
    }
}

impl Read for FlakySource {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self.data.read(buf)? {
            0 => Err(io::Error::new(io::ErrorKind::ConnectionReset, "connection reset")),
            read => Ok(read),
        }
    }
}
