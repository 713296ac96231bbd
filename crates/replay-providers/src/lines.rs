use crate::{Error, Result};
use std::io::{BufRead, Read};

/// Largest line accepted from a session log (16 MiB).
///
/// Tool results can embed whole files, so single records routinely reach
/// megabytes.
pub const MAX_LINE_BYTES: usize = 16 * 1024 * 1024;

/// Bounded line reader for JSONL streams.
///
/// Yields each line without its terminator (`\n` or `\r\n`). A line longer
/// than the limit fails the whole stream with [`Error::LineTooLong`].
pub struct JsonlLines<R> {
    reader: R,
    limit: usize,
    buf: Vec<u8>,
    line: usize,
}

impl<R: BufRead> JsonlLines<R> {
    pub fn new(reader: R) -> Self {
        Self::with_limit(reader, MAX_LINE_BYTES)
    }

    pub fn with_limit(reader: R, limit: usize) -> Self {
        Self {
            reader,
            limit,
            buf: Vec::new(),
            line: 0,
        }
    }

    /// Number of lines read so far.
    pub fn line_number(&self) -> usize {
        self.line
    }

    /// Read the next line. Returns `Ok(None)` at end of stream.
    pub fn next_line(&mut self) -> Result<Option<&[u8]>> {
        self.buf.clear();

        // Room for a `\r\n` terminator after a line of exactly `limit` bytes
        let max = self.limit as u64 + 2;
        let read = (&mut self.reader)
            .take(max)
            .read_until(b'\n', &mut self.buf)?;
        if read == 0 {
            return Ok(None);
        }
        self.line += 1;

        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }

        if self.buf.len() > self.limit {
            return Err(Error::LineTooLong {
                line: self.line,
                limit: self.limit,
            });
        }

        Ok(Some(self.buf.as_slice()))
    }
}
