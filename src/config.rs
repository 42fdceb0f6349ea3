// src/config.rs
use crate::Compression;

/// Reader/writer parameters shared by both ends of a stream.
/// Build with `CodecConfig::builder().foo(...).build()`.
///
/// A reader must be opened with the same `compression` the writer used.
#[derive(Clone, Copy, Debug)]
pub struct CodecConfig {
    /// Compression applied between the framing and the raw sink/source.
    pub compression: Compression,

    pub read_buffer: usize,
    pub write_buffer: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl CodecConfig {
    /// Start building a config with defaults.
    ///
    /// Defaults:
    /// - compression  = None
    /// - read_buffer  = 64 KiB
    /// - write_buffer = 64 KiB
    pub fn builder() -> CodecConfigBuilder {
        CodecConfigBuilder {
            compression: Compression::None,
            read_buffer: 64 * 1024,
            write_buffer: 64 * 1024,
        }
    }
}

/// Fluent builder for `CodecConfig`.
#[derive(Clone, Debug)]
pub struct CodecConfigBuilder {
    compression: Compression,
    read_buffer: usize,
    write_buffer: usize,
}

impl CodecConfigBuilder {
    pub fn compression(mut self, c: Compression) -> Self {
        self.compression = c;
        self
    }
    pub fn read_buffer(mut self, bufsize: usize) -> Self {
        self.read_buffer = bufsize;
        self
    }
    pub fn write_buffer(mut self, bufsize: usize) -> Self {
        self.write_buffer = bufsize;
        self
    }

    /// Finalize the config. Zero buffer sizes are bumped to one byte.
    pub fn build(self) -> CodecConfig {
        CodecConfig {
            compression: self.compression,
            read_buffer: self.read_buffer.max(1),
            write_buffer: self.write_buffer.max(1),
        }
    }
}
