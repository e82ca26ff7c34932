//! Frame output buffer
//!
//! A frame is accumulated here and written to the terminal with a single
//! write call, so the terminal never shows a half-drawn screen.

use std::io::{self, Write};
use tracing::debug;

/// Append-only byte accumulator for one frame.
///
/// Growth that cannot be allocated is dropped: the frame comes out incomplete
/// but the editor keeps running. Storage is freed when the buffer is dropped.
#[derive(Debug, Default)]
pub struct OutputBuffer {
    data: Vec<u8>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let mut out = Self::new();
        let _ = out.data.try_reserve(capacity);
        out
    }

    /// Copy `bytes` onto the end
    pub fn append(&mut self, bytes: &[u8]) {
        if self.data.try_reserve(bytes.len()).is_err() {
            return;
        }
        self.data.extend_from_slice(bytes);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Free all storage
    pub fn release(&mut self) {
        self.data = Vec::new();
    }

    /// Hand the accumulated bytes to `writer` in one write call.
    ///
    /// A short write is not retried. Returns the number of bytes written.
    pub fn flush_to<W: Write>(&mut self, writer: &mut W) -> io::Result<usize> {
        if self.is_empty() {
            return Ok(0);
        }
        let written = writer.write(self.as_bytes())?;
        if written < self.len() {
            debug!("Short frame write: {} of {} bytes", written, self.len());
        }
        writer.flush()?;
        Ok(written)
    }
}

impl Write for OutputBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.append(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(()) // Buffering only - real flush via flush_to
    }
}
