use std::io;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Counts bytes accepted by the wrapped raw sink. The counter is shared so the
/// owner can observe it while the writer sits at the bottom of a sink chain.
pub(crate) struct CountingWriter<W: Write> {
    w: W,
    written: Arc<AtomicU64>,
}

impl<W: Write> CountingWriter<W> {
    pub(crate) fn new(w: W) -> CountingWriter<W> {
        Self {
            w,
            written: Arc::new(AtomicU64::new(0)),
        }
    }

    pub(crate) fn counter(&self) -> Arc<AtomicU64> {
        self.written.clone()
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let n = self.w.write(buf)?;
        self.written.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
    fn flush(&mut self) -> io::Result<()> {
        self.w.flush()
    }
}
