//! Non-blocking line input.
//!
//! The main loop and the search's interrupt callback both need to ask "is a
//! line waiting?" without ever blocking, so the reader performs its own
//! readiness poll and its own buffering. Going through [`std::io::Stdin`]
//! would break this: bytes hiding in its internal buffer are invisible to a
//! readiness poll on the descriptor, and whole lines could sit unprocessed
//! until fresh input happened to arrive.

use std::io;

/// A byte source that can report whether a read would block.
pub trait InputSource {
    /// Whether at least one byte can be read without blocking.
    fn is_data_available(&mut self) -> io::Result<bool>;

    /// Reads some bytes, blocking until at least one is available. Returns
    /// 0 at end of input.
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize>;
}

/// Standard input, read straight from the file descriptor.
pub struct StdinSource;

impl InputSource for StdinSource {
    fn is_data_available(&mut self) -> io::Result<bool> {
        let mut fd = libc::pollfd {
            fd: libc::STDIN_FILENO,
            events: libc::POLLIN,
            revents: 0,
        };

        loop {
            let ready = unsafe { libc::poll(&mut fd, 1, 0) };
            if ready < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            return Ok(ready > 0);
        }
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        loop {
            let count =
                unsafe { libc::read(libc::STDIN_FILENO, buf.as_mut_ptr().cast(), buf.len()) };
            if count < 0 {
                let err = io::Error::last_os_error();
                if err.kind() == io::ErrorKind::Interrupted {
                    continue;
                }
                return Err(err);
            }
            return Ok(count as usize);
        }
    }
}

/// The result of one poll of a [`LineReader`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// A complete line, without its terminator.
    Line(String),
    /// No complete line has arrived; try again later.
    Empty,
    /// The input is closed and fully drained.
    Eof,
}

/// Splits an [`InputSource`] into lines without blocking when none has
/// fully arrived yet.
pub struct LineReader<S> {
    source: S,
    buffer: Vec<u8>,
    eof: bool,
}

impl<S: InputSource> LineReader<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            buffer: Vec::new(),
            eof: false,
        }
    }

    /// Hands out the next complete line if one is available. Trailing
    /// carriage returns are stripped along with the newline; bytes after
    /// the final newline are delivered as a last line when the source
    /// closes.
    pub fn poll_line(&mut self) -> ReadOutcome {
        loop {
            if let Some(line) = self.take_buffered_line() {
                return ReadOutcome::Line(line);
            }

            if self.eof {
                if self.buffer.is_empty() {
                    return ReadOutcome::Eof;
                }
                let rest = std::mem::take(&mut self.buffer);
                return ReadOutcome::Line(decode_line(rest));
            }

            match self.source.is_data_available() {
                Ok(true) => {}
                Ok(false) => return ReadOutcome::Empty,
                Err(_) => {
                    self.eof = true;
                    continue;
                }
            }

            let mut chunk = [0u8; 512];
            match self.source.read(&mut chunk) {
                Ok(0) => self.eof = true,
                Ok(count) => self.buffer.extend_from_slice(&chunk[..count]),
                Err(_) => self.eof = true,
            }
        }
    }

    fn take_buffered_line(&mut self) -> Option<String> {
        let newline = self.buffer.iter().position(|&b| b == b'\n')?;
        let mut line: Vec<u8> = self.buffer.drain(..=newline).collect();
        line.pop();
        Some(decode_line(line))
    }
}

fn decode_line(mut bytes: Vec<u8>) -> String {
    if bytes.last() == Some(&b'\r') {
        bytes.pop();
    }
    String::from_utf8_lossy(&bytes).into_owned()
}
