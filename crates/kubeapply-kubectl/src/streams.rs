//! In-memory output streams handed to the command engine
//!
//! The engine never writes to the process' stdout/stderr. What it prints is
//! collected here and only surfaced when a fatal error is reported.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

/// Cloneable byte buffer implementing [`Write`]
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffer contents decoded as UTF-8 (lossy)
    pub fn contents(&self) -> String {
        let bytes = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_empty()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Output and error streams captured for one invocation
#[derive(Debug, Clone, Default)]
pub struct CapturedStreams {
    out: SharedBuffer,
    err_out: SharedBuffer,
}

impl CapturedStreams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writer for the engine's standard output
    pub fn out(&self) -> SharedBuffer {
        self.out.clone()
    }

    /// Writer for the engine's standard error
    pub fn err_out(&self) -> SharedBuffer {
        self.err_out.clone()
    }

    /// Everything written to the output stream so far
    pub fn stdout(&self) -> String {
        self.out.contents()
    }

    /// Everything written to the error stream so far
    pub fn stderr(&self) -> String {
        self.err_out.contents()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clones_share_buffers() {
        let streams = CapturedStreams::new();
        let mut out = streams.out();
        let mut err = streams.clone().err_out();

        write!(out, "namespace/demo created").unwrap();
        writeln!(err, "Warning: deprecated").unwrap();

        assert_eq!(streams.stdout(), "namespace/demo created");
        assert_eq!(streams.stderr(), "Warning: deprecated\n");
    }

    #[test]
    fn test_empty_by_default() {
        let streams = CapturedStreams::new();
        assert!(streams.out().is_empty());
        assert_eq!(streams.stderr(), "");
    }
}
