use std::io;

#[derive(thiserror::Error, Debug)]
pub enum CodecError {
    #[error("io: {0}")]
    Io(#[from] io::Error),

    /// The value handed to `write` is not valid JSON. Nothing was written.
    #[error("malformed value: {0}")]
    MalformedValue(#[source] serde_json::Error),

    /// End of source reached inside a frame (stream was not closed cleanly).
    #[error("truncated frame: non-empty message without delimiter ({len} bytes)")]
    TruncatedFrame { len: usize },

    /// The frame is not an envelope in any of the supported shapes. Offsets must
    /// be integers in `i64` range; a decimal literal is accepted only when its
    /// fraction is all zeros (`5.0`), exponent forms never.
    #[error("malformed envelope: {0}")]
    MalformedEnvelope(String),

    /// Operation on a closed writer/reader
    #[error("closed")]
    Closed,

    /// The reader or writer already returned an error; the stream position is
    /// no longer trusted.
    #[error("stream failed earlier")]
    Failed,
}

impl CodecError {
    pub fn is_truncation(&self) -> bool {
        matches!(self, CodecError::TruncatedFrame { .. })
    }
}
