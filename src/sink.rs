use std::io::Write;
use std::sync::Mutex;

/// Serializes per-file output blocks from parallel workers.
///
/// Workers buffer a whole file's diagnostics and flush them as one
/// contiguous block; the lock is held only for the duration of one write.
pub struct DiagnosticsSink<W: Write> {
    inner: Mutex<W>,
}

impl<W: Write> DiagnosticsSink<W> {
    pub const fn new(writer: W) -> Self {
        Self {
            inner: Mutex::new(writer),
        }
    }

    /// Write one file's block. Empty blocks are skipped without locking.
    pub fn write_block(&self, block: &str) {
        if block.is_empty() {
            return;
        }
        let mut writer = self.inner.lock().expect("sink lock poisoned");
        let _ = writer.write_all(block.as_bytes());
        let _ = writer.flush();
    }

    pub fn into_inner(self) -> W {
        self.inner.into_inner().expect("sink lock poisoned")
    }
}

#[cfg(test)]
#[path = "sink_tests.rs"]
mod tests;
