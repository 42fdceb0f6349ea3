use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, warn};

use crate::format::encode_frame;
use crate::io::counting_writer::CountingWriter;
use crate::io::payload_sink::PayloadSink;
use crate::storage::StorageProvider;
use crate::{CodecConfig, CodecError, Record};

/// buffer -> compression -> byte counter -> raw sink
type FrameSink = BufWriter<PayloadSink<CountingWriter<Box<dyn Write + Send>>>>;

enum WriterState {
    Open(FrameSink),
    /// An I/O error hit the sink mid-frame; nothing more may be appended.
    Failed,
    Closed,
}

/// Appends records as newline-delimited JSON envelopes to one logical path.
///
/// Single owner; wrap in [`crate::AsyncFileWriter`] to share it between tasks.
/// Dropping an open writer closes it; errors on that path are only logged.
/// After an I/O error in `write` or `flush` the writer is failed: the sink is
/// released without flushing what it still holds and every later call returns
/// [`CodecError::Failed`], so the torn frame stays the tail of the stream.
pub struct FileWriter {
    path: PathBuf,
    state: WriterState,
    written: Arc<AtomicU64>,
    records: u64,
    frame: Vec<u8>, // per-record scratch buffer
}

impl FileWriter {
    pub fn open(
        storage: &dyn StorageProvider,
        path: impl AsRef<Path>,
        cfg: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let raw = storage.open_for_write(&path)?;
        let counting = CountingWriter::new(raw);
        let written = counting.counter();
        let payload = PayloadSink::new(counting, cfg.compression)?;
        let sink = BufWriter::with_capacity(cfg.write_buffer, payload);
        debug!(path = %path.display(), compression = ?cfg.compression, "opened writer");
        Ok(Self {
            path,
            state: WriterState::Open(sink),
            written,
            records: 0,
            frame: Vec::with_capacity(256),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one frame. A value that is not valid JSON is rejected before
    /// anything reaches the sink.
    pub fn write(&mut self, record: &Record) -> Result<(), CodecError> {
        let sink = match &mut self.state {
            WriterState::Open(sink) => sink,
            WriterState::Failed => return Err(CodecError::Failed),
            WriterState::Closed => return Err(CodecError::Closed),
        };
        self.frame.clear();
        encode_frame(record.offset, &record.value, &mut self.frame)?;
        if let Err(e) = sink.write_all(&self.frame) {
            self.fail(&e);
            return Err(e.into());
        }
        self.records = self.records.saturating_add(1);
        Ok(())
    }

    /// Bytes accepted by the raw sink so far, after compression. Bytes still
    /// held in the write buffer or the compressor are not counted yet.
    pub fn length(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn records_written(&self) -> u64 {
        self.records
    }

    pub(crate) fn length_counter(&self) -> Arc<AtomicU64> {
        self.written.clone()
    }

    /// Push buffered bytes down to the raw sink without sealing the stream.
    pub fn flush(&mut self) -> Result<(), CodecError> {
        let sink = match &mut self.state {
            WriterState::Open(sink) => sink,
            WriterState::Failed => return Err(CodecError::Failed),
            WriterState::Closed => return Err(CodecError::Closed),
        };
        if let Err(e) = sink.flush() {
            self.fail(&e);
            return Err(e.into());
        }
        Ok(())
    }

    fn fail(&mut self, err: &std::io::Error) {
        if let WriterState::Open(sink) = std::mem::replace(&mut self.state, WriterState::Failed) {
            // into_parts skips the flush BufWriter would attempt on drop
            let (payload, _unwritten) = sink.into_parts();
            drop(payload);
        }
        warn!(
            path = %self.path.display(),
            records = self.records,
            error = %err,
            "sink failed, writer refuses further frames"
        );
    }

    /// Flush the buffer, finish the compressor and release the sink. Idempotent
    /// once closed; a failed writer keeps answering [`CodecError::Failed`].
    pub fn close(&mut self) -> Result<(), CodecError> {
        let sink = match std::mem::replace(&mut self.state, WriterState::Closed) {
            WriterState::Open(sink) => sink,
            WriterState::Failed => {
                self.state = WriterState::Failed;
                return Err(CodecError::Failed);
            }
            WriterState::Closed => return Ok(()),
        };
        let payload = sink.into_inner().map_err(|e| e.into_error())?;
        let raw = payload.finish()?;
        drop(raw);
        debug!(
            path = %self.path.display(),
            records = self.records,
            bytes = self.length(),
            "closed writer"
        );
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self.state, WriterState::Closed)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.state, WriterState::Failed)
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        if !matches!(self.state, WriterState::Open(_)) {
            return;
        }
        if let Err(e) = self.close() {
            warn!(path = %self.path.display(), error = %e, "closing writer on drop failed");
        }
    }
}
