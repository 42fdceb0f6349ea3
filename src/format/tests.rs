#[cfg(test)]
mod tests {
    use super::super::envelope::*;
    use crate::CodecError;
    use serde_json::{Value, json};

    fn value_of(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn encode_always_wraps_offset_and_value() {
        let mut buf = Vec::new();
        encode_frame(42, br#"{"id":9}"#, &mut buf).unwrap();
        assert_eq!(buf, b"{\"offset\":42,\"value\":{\"id\":9}}\n");

        buf.clear();
        encode_frame(-1, b"\"hi\"", &mut buf).unwrap();
        assert_eq!(buf, b"{\"offset\":-1,\"value\":\"hi\"}\n");
    }

    #[test]
    fn encode_rejects_invalid_json_and_leaves_buffer_alone() {
        let mut buf = b"prefix".to_vec();
        let err = encode_frame(1, b"{not json", &mut buf).unwrap_err();
        assert!(matches!(err, CodecError::MalformedValue(_)));
        assert_eq!(buf, b"prefix");
    }

    #[test]
    fn embedded_newlines_are_escaped() {
        let mut buf = Vec::new();
        encode_frame(3, br#""line1\nline2""#, &mut buf).unwrap();
        assert_eq!(buf.iter().filter(|b| **b == b'\n').count(), 1);
        assert_eq!(*buf.last().unwrap(), b'\n');
    }

    #[test]
    fn shape_detection_priority() {
        let obj = |v: Value| v.as_object().unwrap().clone();
        assert_eq!(
            EnvelopeShape::detect(&obj(json!({"offset": 1, "value": 2}))),
            EnvelopeShape::Current
        );
        assert_eq!(
            EnvelopeShape::detect(&obj(json!({"offset": 1, "__value__": 2}))),
            EnvelopeShape::LegacyWrapped
        );
        assert_eq!(
            EnvelopeShape::detect(&obj(json!({"__offset__": 1, "\"__value__\"": 2}))),
            EnvelopeShape::LegacyWrapped
        );
        assert_eq!(
            EnvelopeShape::detect(&obj(json!({"__offset__": 1, "id": 2}))),
            EnvelopeShape::LegacyFlattened
        );
        // A flattened payload that happens to have a `value` field.
        assert_eq!(
            EnvelopeShape::detect(&obj(json!({"__offset__": 1, "value": 2, "id": 3}))),
            EnvelopeShape::LegacyFlattened
        );
    }

    #[test]
    fn decode_legacy_sentinel() {
        let rec = decode_frame(br#"{"offset":5,"__value__":"hello"}"#).unwrap();
        assert_eq!(rec.offset, 5);
        assert_eq!(rec.value, b"\"hello\"");

        let rec = decode_frame(br#"{"\"__value__\"":[1,2],"__offset__":6}"#).unwrap();
        assert_eq!(rec.offset, 6);
        assert_eq!(rec.value, b"[1,2]");
    }

    #[test]
    fn decode_legacy_flattened() {
        let rec = decode_frame(br#"{"__offset__":7,"id":9}"#).unwrap();
        assert_eq!(rec.offset, 7);
        assert_eq!(value_of(&rec.value), json!({"id": 9}));

        let rec = decode_frame(br#"{"__offset__":8,"value":1,"offset":"x"}"#).unwrap();
        assert_eq!(rec.offset, 8);
        assert_eq!(value_of(&rec.value), json!({"value": 1, "offset": "x"}));
    }

    #[test]
    fn three_shapes_decode_to_the_same_record() {
        let current = decode_frame(br#"{"offset":11,"value":{"a":[1,true]}}"#).unwrap();
        let flattened = decode_frame(br#"{"a":[1,true],"__offset__":11}"#).unwrap();
        let wrapped = decode_frame(br#"{"__offset__":11,"__value__":{"a":[1,true]}}"#).unwrap();
        assert_eq!(current, flattened);
        assert_eq!(current, wrapped);
    }

    #[test]
    fn decode_rejects_bad_offsets_and_shapes() {
        for bad in [
            &br#"{"offset":1.5,"value":1}"#[..],
            br#"{"offset":"7","value":1}"#,
            br#"{"offset":18446744073709551615,"value":1}"#,
            br#"{"value":1,"id":2}"#,
            br#"{"id":2}"#,
            b"[1,2,3]",
            b"42",
            b"{\"offset\":",
            b"",
        ] {
            let err = decode_frame(bad).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedEnvelope(_)),
                "{:?} -> {err:?}",
                String::from_utf8_lossy(bad)
            );
        }
    }

    #[test]
    fn decoded_value_is_canonical() {
        let rec = decode_frame(b"{ \"offset\" : 1 , \"value\" : { \"b\" : 1 , \"a\" : 2 } }").unwrap();
        assert!(!rec.value.contains(&b' '));
        assert_eq!(value_of(&rec.value), json!({"a": 2, "b": 1}));
    }

    #[test]
    fn wide_numbers_survive_the_round_trip() {
        for literal in [
            "123456789012345678901234567890",
            "18446744073709551616",
            "-98765432109876543210987654321",
            "3.14159265358979323846264338327950288",
        ] {
            let mut buf = Vec::new();
            encode_frame(1, literal.as_bytes(), &mut buf).unwrap();
            let frame = String::from_utf8(buf.clone()).unwrap();
            assert!(frame.contains(literal), "{frame}");

            buf.pop();
            let rec = decode_frame(&buf).unwrap();
            assert_eq!(rec.value, literal.as_bytes());
        }

        let mut buf = Vec::new();
        encode_frame(2, br#"{"big":123456789012345678901234567890}"#, &mut buf).unwrap();
        buf.pop();
        let rec = decode_frame(&buf).unwrap();
        assert_eq!(rec.value, br#"{"big":123456789012345678901234567890}"#);
    }

    #[test]
    fn integral_decimal_offsets_are_accepted() {
        assert_eq!(decode_frame(br#"{"offset":5.0,"value":1}"#).unwrap().offset, 5);
        assert_eq!(decode_frame(br#"{"__offset__":-12.000,"id":1}"#).unwrap().offset, -12);
        for bad in [
            &br#"{"offset":5.5,"value":1}"#[..],
            br#"{"offset":5e0,"value":1}"#,
            br#"{"offset":9223372036854775808.0,"value":1}"#,
        ] {
            assert!(matches!(
                decode_frame(bad),
                Err(CodecError::MalformedEnvelope(_))
            ));
        }
    }
}
