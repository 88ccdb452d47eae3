//! Shared helpers for exercising the driver against scripted input.

use std::collections::VecDeque;
use std::io;

use crate::input::InputSource;

/// An [`InputSource`] that replays a fixed script. Data is always reported
/// as available so the exhausted script reads as end-of-input rather than
/// an eternally idle terminal.
pub(crate) struct ScriptedSource {
    chunks: VecDeque<Vec<u8>>,
}

impl ScriptedSource {
    pub(crate) fn from_chunks(chunks: &[&[u8]]) -> Self {
        Self {
            chunks: chunks.iter().map(|c| c.to_vec()).collect(),
        }
    }

    /// One chunk per line, newline-terminated.
    pub(crate) fn from_lines(lines: &[&str]) -> Self {
        Self {
            chunks: lines
                .iter()
                .map(|line| format!("{line}\n").into_bytes())
                .collect(),
        }
    }
}

impl InputSource for ScriptedSource {
    fn is_data_available(&mut self) -> io::Result<bool> {
        Ok(true)
    }

    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let Some(mut chunk) = self.chunks.pop_front() else {
            return Ok(0);
        };

        let count = chunk.len().min(buf.len());
        buf[..count].copy_from_slice(&chunk[..count]);
        if count < chunk.len() {
            chunk.drain(..count);
            self.chunks.push_front(chunk);
        }

        Ok(count)
    }
}
