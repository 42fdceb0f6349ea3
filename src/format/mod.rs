//! On-disk frame format.
//!
//! A stream is a sequence of frames: `<JSON envelope>\n<JSON envelope>\n...`.
//! There is no header, length prefix or index; boundaries are found by scanning
//! for [`DELIMITER`]. Writers emit only the current envelope shape
//! `{"offset":<i64>,"value":<any JSON>}`; readers also accept the two legacy shapes
//! described on [`EnvelopeShape`].

pub(crate) mod envelope;
mod tests;

pub use envelope::{EnvelopeShape, decode_frame, encode_frame};

/// Frame terminator. serde_json escapes control characters inside strings,
/// so this byte never occurs inside an envelope.
pub const DELIMITER: u8 = b'\n';

pub const OFFSET_KEY: &str = "offset";
pub const VALUE_KEY: &str = "value";

/// Offset field injected by legacy writers.
pub const LEGACY_OFFSET_KEY: &str = "__offset__";

/// Sentinel value keys of the legacy wrapped shape. Old writers stored the key
/// with its quotes included, so both spellings occur in the wild.
pub const LEGACY_VALUE_KEYS: [&str; 2] = ["__value__", "\"__value__\""];
