//! Serial output boundary.
//!
//! The drain task writes rendered bytes through [`SerialSink`]. Writes are
//! best-effort by contract: a sink swallows device errors instead of
//! reporting them, because nothing upstream could act on a failed write
//! and the drain loop must never stall or exit over one.

use std::io;
use std::sync::{Arc, Mutex, PoisonError};

/// Byte-stream sink the drain task renders into.
pub trait SerialSink: Send {
    /// Write raw bytes to the device. Best effort; failures are dropped.
    fn write(&mut self, bytes: &[u8]);
}

/// Sink that captures output in a shared buffer.
///
/// Clones share the same buffer, so a test (or a host application) can
/// keep one clone and hand the other to the logger, then read back what
/// the drain task wrote.
#[derive(Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Captured output as text (lossy for non-UTF-8 bytes).
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.contents()).into_owned()
    }
}

impl SerialSink for MemorySink {
    fn write(&mut self, bytes: &[u8]) {
        self.buffer
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(bytes);
    }
}

/// Adapter from any [`io::Write`] (stdout, a file, a pty) to a sink.
pub struct WriterSink<W> {
    writer: W,
}

impl<W: io::Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: io::Write + Send> SerialSink for WriterSink<W> {
    fn write(&mut self, bytes: &[u8]) {
        let _ = self.writer.write_all(bytes);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_sink_captures_across_clones() {
        let sink = MemorySink::new();
        let mut writer = sink.clone();

        writer.write(b"hello ");
        writer.write(b"world");

        assert_eq!(sink.contents(), b"hello world");
        assert_eq!(sink.text(), "hello world");
    }

    #[test]
    fn test_writer_sink() {
        let mut sink = WriterSink::new(Vec::new());
        sink.write(b"abc");
        sink.write(b"def");
        assert_eq!(sink.writer, b"abcdef");
    }
}
