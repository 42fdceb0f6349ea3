use std::path::Path;
use std::sync::Arc;

use crate::storage::{LocalFs, StorageProvider};
use crate::{CodecConfig, CodecError, FileReader, FileWriter};

/// Builds readers and writers for logical paths against one storage provider
/// and one codec configuration.
#[derive(Clone)]
pub struct JsonFileFactory {
    storage: Arc<dyn StorageProvider>,
    cfg: CodecConfig,
}

impl JsonFileFactory {
    pub fn new(storage: Arc<dyn StorageProvider>, cfg: CodecConfig) -> Self {
        Self { storage, cfg }
    }

    /// Local filesystem, paths taken as given.
    pub fn local(cfg: CodecConfig) -> Self {
        Self::new(Arc::new(LocalFs::new()), cfg)
    }

    pub fn config(&self) -> &CodecConfig {
        &self.cfg
    }

    pub fn storage(&self) -> &Arc<dyn StorageProvider> {
        &self.storage
    }

    pub fn build_writer(&self, path: impl AsRef<Path>) -> Result<FileWriter, CodecError> {
        FileWriter::open(self.storage.as_ref(), path, &self.cfg)
    }

    pub fn build_reader(&self, path: impl AsRef<Path>) -> Result<FileReader, CodecError> {
        FileReader::open(self.storage.as_ref(), path, &self.cfg)
    }
}
