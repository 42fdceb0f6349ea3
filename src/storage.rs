use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// Byte-stream provider: maps a logical path to a raw sink or source.
///
/// The codec only needs sequential writes/reads; closing happens on drop.
pub trait StorageProvider: Send + Sync {
    fn open_for_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>>;
    fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>>;
}

/// Local filesystem provider. Relative logical paths resolve under `root` when set.
#[derive(Clone, Debug, Default)]
pub struct LocalFs {
    root: Option<PathBuf>,
}

impl LocalFs {
    pub fn new() -> Self {
        Self { root: None }
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }
}

impl StorageProvider for LocalFs {
    /// Creates (or truncates) the file, creating missing parent directories.
    fn open_for_write(&self, path: &Path) -> io::Result<Box<dyn Write + Send>> {
        let path = self.resolve(path);
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&path)?;
        Ok(Box::new(file))
    }

    fn open_for_read(&self, path: &Path) -> io::Result<Box<dyn Read + Send>> {
        let file = File::open(self.resolve(path))?;
        Ok(Box::new(file))
    }
}
