//! A cursor over the lines of a buffered reader.

use std::io::BufRead;

use crate::cursor::Cursor;
use crate::error::CursorResult;

/// Yields each line of a reader, without its trailing `\n` or `\r\n`.
///
/// The reader is dropped on `close`.
pub struct LineCursor<R> {
    reader: Option<R>,
    line: String,
    loaded: bool,
    /// Number of lines read so far.
    position: u64,
}

impl<R: BufRead> LineCursor<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader: Some(reader),
            line: String::new(),
            loaded: false,
            position: 0,
        }
    }

    /// Number of lines read so far.
    pub fn position(&self) -> u64 {
        self.position
    }
}

impl<R: BufRead> Cursor for LineCursor<R> {
    type Item = String;
    type Error = crate::error::CursorError;

    fn load_next(&mut self) -> CursorResult<bool> {
        self.loaded = false;
        let Some(reader) = self.reader.as_mut() else {
            return Ok(false);
        };
        self.line.clear();
        if reader.read_line(&mut self.line)? == 0 {
            self.reader = None;
            return Ok(false);
        }
        if self.line.ends_with('\n') {
            self.line.pop();
            if self.line.ends_with('\r') {
                self.line.pop();
            }
        }
        self.position += 1;
        self.loaded = true;
        Ok(true)
    }

    fn current(&self) -> Option<&String> {
        self.loaded.then_some(&self.line)
    }

    fn close(&mut self) -> CursorResult<()> {
        self.reader = None;
        self.loaded = false;
        Ok(())
    }
}
