//! Console byte sinks.
//!
//! The platform forwards one byte at a time; the transport behind the sink
//! is outside this crate. Writes are assumed to succeed, so sinks swallow
//! transport errors instead of reporting them.

use std::io::Write;

/// Destination for console output bytes.
pub trait ConsoleSink {
    /// Forward a single byte. Never fails from the caller's point of view.
    fn write_byte(&mut self, byte: u8);
}

impl<C: ConsoleSink + ?Sized> ConsoleSink for Box<C> {
    fn write_byte(&mut self, byte: u8) {
        (**self).write_byte(byte);
    }
}

/// Writes each byte straight to the process's standard output.
#[derive(Debug, Default)]
pub struct StdoutConsole;

impl ConsoleSink for StdoutConsole {
    fn write_byte(&mut self, byte: u8) {
        let mut out = std::io::stdout().lock();
        if let Err(e) = out.write_all(&[byte]).and_then(|()| out.flush()) {
            tracing::debug!(error = %e, "console write dropped");
        }
    }
}

/// Collects bytes in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BufferConsole {
    bytes: Vec<u8>,
}

impl BufferConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Output decoded as UTF-8, with invalid sequences replaced.
    pub fn as_text(&self) -> String {
        String::from_utf8_lossy(&self.bytes).into_owned()
    }

    /// Take the collected bytes, leaving the buffer empty.
    pub fn take(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.bytes)
    }
}

impl ConsoleSink for BufferConsole {
    fn write_byte(&mut self, byte: u8) {
        self.bytes.push(byte);
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullConsole;

impl ConsoleSink for NullConsole {
    fn write_byte(&mut self, _byte: u8) {}
}
