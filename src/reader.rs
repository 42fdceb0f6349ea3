use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_stream::try_stream;
use futures_core::Stream;
use futures_util::StreamExt;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::format::{DELIMITER, decode_frame};
use crate::io::payload_reader::PayloadReader;
use crate::storage::StorageProvider;
use crate::{CodecConfig, CodecError, Record};

enum ReaderState {
    Reading(BufReader<PayloadReader>),
    /// Clean end of stream; every further read yields `None`.
    Exhausted,
    /// An error was returned once; the position in the stream is lost.
    Failed,
    Closed,
}

/// Sequential, blocking reader over one stream written by [`crate::FileWriter`].
///
/// Closing while another thread is inside `next_record` is not supported.
pub struct FileReader {
    path: PathBuf,
    state: ReaderState,
    frame: Vec<u8>,
    records: u64,
}

impl FileReader {
    pub fn open(
        storage: &dyn StorageProvider,
        path: impl AsRef<Path>,
        cfg: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let path = path.as_ref().to_path_buf();
        let raw = storage.open_for_read(&path)?;
        let payload = PayloadReader::new(cfg.compression, raw, cfg.read_buffer)?;
        let source = BufReader::with_capacity(cfg.read_buffer, payload);
        debug!(path = %path.display(), compression = ?cfg.compression, "opened reader");
        Ok(Self {
            path,
            state: ReaderState::Reading(source),
            frame: Vec::with_capacity(256),
            records: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the next frame.
    ///
    /// `Ok(None)` means a clean end of stream and is sticky. Bytes after the last
    /// delimiter yield `TruncatedFrame` once; later calls return `Failed`.
    pub fn next_record(&mut self) -> Result<Option<Record>, CodecError> {
        let source = match &mut self.state {
            ReaderState::Reading(source) => source,
            ReaderState::Exhausted => return Ok(None),
            ReaderState::Failed => return Err(CodecError::Failed),
            ReaderState::Closed => return Err(CodecError::Closed),
        };

        self.frame.clear();
        match read_frame(source, &mut self.frame) {
            Ok(true) => {}
            Ok(false) => {
                debug!(path = %self.path.display(), records = self.records, "end of stream");
                self.state = ReaderState::Exhausted;
                return Ok(None);
            }
            Err(e) => {
                warn!(path = %self.path.display(), records = self.records, error = %e, "read failed");
                self.state = ReaderState::Failed;
                return Err(e);
            }
        }

        match decode_frame(&self.frame) {
            Ok(record) => {
                self.records = self.records.saturating_add(1);
                Ok(Some(record))
            }
            Err(e) => {
                warn!(path = %self.path.display(), records = self.records, error = %e, "bad frame");
                self.state = ReaderState::Failed;
                Err(e)
            }
        }
    }

    pub fn records_read(&self) -> u64 {
        self.records
    }

    /// Release the source. Repeated calls are no-ops.
    pub fn close(&mut self) {
        if matches!(self.state, ReaderState::Closed) {
            return;
        }
        self.state = ReaderState::Closed;
        debug!(path = %self.path.display(), records = self.records, "closed reader");
    }
}

/// Accumulate bytes up to the delimiter. `Ok(false)` on a clean end of source.
fn read_frame<R: BufRead>(source: &mut R, frame: &mut Vec<u8>) -> Result<bool, CodecError> {
    let n = source.read_until(DELIMITER, frame)?;
    if n == 0 {
        return Ok(false);
    }
    if frame.last() == Some(&DELIMITER) {
        frame.pop();
        return Ok(true);
    }
    Err(CodecError::TruncatedFrame { len: frame.len() })
}

/// Yields records until the end of stream, the first error, or `close`.
impl Iterator for FileReader {
    type Item = Result<Record, CodecError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_record() {
            Ok(Some(record)) => Some(Ok(record)),
            Ok(None) | Err(CodecError::Failed) | Err(CodecError::Closed) => None,
            Err(e) => Some(Err(e)),
        }
    }
}

/// Async front for [`FileReader`]; reads run inside `block_in_place`.
#[derive(Clone)]
pub struct AsyncFileReader {
    inner: Arc<Mutex<FileReader>>,
}

impl AsyncFileReader {
    pub async fn open(
        storage: &dyn StorageProvider,
        path: impl AsRef<Path>,
        cfg: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let reader = tokio::task::block_in_place(|| FileReader::open(storage, path, cfg))?;
        Ok(Self::from_reader(reader))
    }

    pub fn from_reader(reader: FileReader) -> Self {
        Self {
            inner: Arc::new(Mutex::new(reader)),
        }
    }

    pub async fn next_record(&self) -> Result<Option<Record>, CodecError> {
        let mut guard = self.inner.lock().await;
        tokio::task::block_in_place(|| guard.next_record())
    }

    pub async fn close(&self) {
        self.inner.lock().await.close();
    }

    /// Remaining records as a stream; ends after end of stream or the first error.
    pub fn records(
        &self,
    ) -> impl Stream<Item = Result<Record, CodecError>> + Unpin + Send + 'static {
        let inner = self.inner.clone();
        try_stream! {
            loop {
                let next = {
                    let mut guard = inner.lock().await;
                    tokio::task::block_in_place(|| guard.next_record())?
                };
                match next {
                    Some(record) => yield record,
                    None => break,
                }
            }
        }
        .boxed()
    }
}
