use serde::Serialize;
use serde_json::{Map, Value};

use super::{DELIMITER, LEGACY_OFFSET_KEY, LEGACY_VALUE_KEYS, OFFSET_KEY, VALUE_KEY};
use crate::{CodecError, Record};

/// Physical layout of an envelope object, checked in declaration order.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvelopeShape {
    /// `{"offset": 5, "value": ...}`: offset and value are siblings.
    Current,
    /// `{"__offset__": 5, "__value__": ...}`: non-object values behind a sentinel key.
    LegacyWrapped,
    /// `{"__offset__": 5, "id": 9}`: object value with the offset injected in place.
    LegacyFlattened,
}

impl EnvelopeShape {
    /// An object carrying `__offset__` came from a legacy writer, so a `value`
    /// field next to it belongs to a flattened payload.
    pub fn detect(obj: &Map<String, Value>) -> Self {
        if obj.contains_key(VALUE_KEY) && !obj.contains_key(LEGACY_OFFSET_KEY) {
            EnvelopeShape::Current
        } else if LEGACY_VALUE_KEYS.iter().any(|k| obj.contains_key(*k)) {
            EnvelopeShape::LegacyWrapped
        } else {
            EnvelopeShape::LegacyFlattened
        }
    }
}

#[derive(Serialize)]
struct Envelope<'a> {
    offset: i64,
    value: &'a Value,
}

/// Append one frame (envelope + delimiter) for `offset`/`value` to `out`.
///
/// `value` must be valid JSON; on error `out` is left untouched.
pub fn encode_frame(offset: i64, value: &[u8], out: &mut Vec<u8>) -> Result<(), CodecError> {
    let value: Value = serde_json::from_slice(value).map_err(CodecError::MalformedValue)?;
    let start = out.len();
    if let Err(e) = serde_json::to_writer(
        &mut *out,
        &Envelope {
            offset,
            value: &value,
        },
    ) {
        out.truncate(start);
        return Err(CodecError::MalformedValue(e));
    }
    out.push(DELIMITER);
    Ok(())
}

/// Parse one frame body (delimiter already stripped) into a record.
pub fn decode_frame(bytes: &[u8]) -> Result<Record, CodecError> {
    let parsed: Value = serde_json::from_slice(bytes)
        .map_err(|e| CodecError::MalformedEnvelope(format!("not JSON: {e}")))?;
    let Value::Object(mut obj) = parsed else {
        return Err(CodecError::MalformedEnvelope(
            "envelope is not a JSON object".into(),
        ));
    };

    let (offset, value) = match EnvelopeShape::detect(&obj) {
        EnvelopeShape::Current => {
            let offset = take_offset(&mut obj, &[OFFSET_KEY])?;
            let value = obj.remove(VALUE_KEY).unwrap_or(Value::Null);
            (offset, value)
        }
        EnvelopeShape::LegacyWrapped => {
            let offset = take_offset(&mut obj, &[LEGACY_OFFSET_KEY, OFFSET_KEY])?;
            let value = LEGACY_VALUE_KEYS
                .iter()
                .find_map(|k| obj.remove(*k))
                .unwrap_or(Value::Null);
            (offset, value)
        }
        EnvelopeShape::LegacyFlattened => {
            let offset = take_offset(&mut obj, &[LEGACY_OFFSET_KEY, OFFSET_KEY])?;
            (offset, Value::Object(obj))
        }
    };

    let value = serde_json::to_vec(&value)
        .map_err(|e| CodecError::MalformedEnvelope(format!("value: {e}")))?;
    Ok(Record { offset, value })
}

fn take_offset(obj: &mut Map<String, Value>, keys: &[&str]) -> Result<i64, CodecError> {
    let node = keys
        .iter()
        .find_map(|k| obj.remove(*k))
        .ok_or_else(|| CodecError::MalformedEnvelope("missing offset".into()))?;
    let offset = match &node {
        Value::Number(n) => n.as_i64().or_else(|| integral_decimal(&n.to_string())),
        _ => None,
    };
    offset.ok_or_else(|| {
        CodecError::MalformedEnvelope(format!("offset is not a 64-bit integer: {node}"))
    })
}

/// `5.0`, `-12.000`: a plain decimal literal whose fraction is all zeros.
/// Exponent forms are not accepted.
fn integral_decimal(text: &str) -> Option<i64> {
    let (int, frac) = text.split_once('.')?;
    if frac.is_empty() || !frac.bytes().all(|b| b == b'0') {
        return None;
    }
    int.parse().ok()
}
