//! writer.rs — async front for [`FileWriter`].
//! - All operations serialize through an async Mutex
//! - The actual IO runs inside `block_in_place` (multi-thread runtime only)
//! - `length()` reads a shared counter and never takes the lock

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;

use crate::storage::StorageProvider;
use crate::writer_inner::FileWriter;
use crate::{CodecConfig, CodecError, Record};

#[derive(Clone)]
pub struct AsyncFileWriter {
    inner: Arc<Mutex<FileWriter>>,
    written: Arc<AtomicU64>,
}

impl AsyncFileWriter {
    pub async fn open(
        storage: &dyn StorageProvider,
        path: impl AsRef<Path>,
        cfg: &CodecConfig,
    ) -> Result<Self, CodecError> {
        let writer = tokio::task::block_in_place(|| FileWriter::open(storage, path, cfg))?;
        Ok(Self::from_writer(writer))
    }

    pub fn from_writer(writer: FileWriter) -> Self {
        let written = writer.length_counter();
        Self {
            inner: Arc::new(Mutex::new(writer)),
            written,
        }
    }

    pub async fn write(&self, record: &Record) -> Result<(), CodecError> {
        let mut guard = self.inner.lock().await;
        tokio::task::block_in_place(|| guard.write(record))
    }

    /// Append several records under one lock acquisition. Stops at the first error.
    pub async fn write_all<'a>(
        &self,
        records: impl IntoIterator<Item = &'a Record>,
    ) -> Result<(), CodecError> {
        let mut guard = self.inner.lock().await;
        tokio::task::block_in_place(|| {
            for record in records {
                guard.write(record)?;
            }
            Ok(())
        })
    }

    pub async fn flush(&self) -> Result<(), CodecError> {
        let mut guard = self.inner.lock().await;
        tokio::task::block_in_place(|| guard.flush())
    }

    pub async fn close(&self) -> Result<(), CodecError> {
        let mut guard = self.inner.lock().await;
        tokio::task::block_in_place(|| guard.close())
    }

    /// Post-compression bytes accepted by the raw sink at this moment.
    pub fn length(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }
}
