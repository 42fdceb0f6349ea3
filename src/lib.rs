//! Newline-delimited JSON record log.
//!
//! Each record is an `(offset, JSON value)` pair stored as one envelope object
//! followed by `\n`. Streams may be compressed with zstd beneath the framing.
//! The [`upload`] module composes the upload of a finished stream with a
//! remote data-warehouse load.

mod config;
mod error;
mod factory;
pub mod format;
mod io;
mod reader;
mod storage;
mod tests;
pub mod upload;
mod writer;
mod writer_inner;

pub use crate::config::{CodecConfig, CodecConfigBuilder};
pub use crate::error::CodecError;
pub use crate::factory::JsonFileFactory;
pub use crate::reader::{AsyncFileReader, FileReader};
pub use crate::storage::{LocalFs, StorageProvider};
pub use crate::writer::AsyncFileWriter;
pub use crate::writer_inner::FileWriter;

/// One unit of data interchange: a numeric offset plus a JSON-encoded value.
///
/// The codec stores whatever offset it is given; ordering is the producer's concern.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Record {
    pub offset: i64,
    pub value: Vec<u8>,
}

impl Record {
    pub fn new(offset: i64, value: impl Into<Vec<u8>>) -> Self {
        Self {
            offset,
            value: value.into(),
        }
    }
}

/// Transform applied beneath the framing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Compression {
    #[default]
    None,
    Zstd {
        level: i32,
    },
}
