//! Reversible payload codec
//!
//! Catalog files may carry their item list as an opaque string in a `blob` or
//! `payload` field. The encoding is an obfuscation, not encryption: the JSON
//! text is byte-reversed and base64 encoded. Decoding restores the exact JSON
//! text produced by the encoder.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use serde_json::Value;

use crate::errors::DecodeResult;

/// Encode JSON text into the published payload form
pub fn encode_text(json: &str) -> String {
    let mut bytes = json.as_bytes().to_vec();
    bytes.reverse();
    STANDARD.encode(bytes)
}

/// Encode a JSON value into the published payload form
pub fn encode_value(value: &Value) -> String {
    encode_text(&value.to_string())
}

/// Decode a payload back into its JSON text
pub fn decode_text(encoded: &str) -> DecodeResult<String> {
    let mut bytes = STANDARD.decode(encoded.trim().as_bytes())?;
    bytes.reverse();
    Ok(String::from_utf8(bytes)?)
}

/// Decode a payload and parse the JSON it carries
pub fn decode_and_parse(encoded: &str) -> DecodeResult<Value> {
    let text = decode_text(encoded)?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::DecodeError;
    use serde_json::json;

    #[test]
    fn test_decode_restores_exact_text() {
        let text = r#"[{"file":"nature.json","name":"自然"}]"#;
        let encoded = encode_text(text);
        assert_ne!(encoded, text);
        assert_eq!(decode_text(&encoded).unwrap(), text);
    }

    #[test]
    fn test_decode_and_parse() {
        let value = json!({"wallpapers": [{"id": "a"}]});
        let decoded = decode_and_parse(&encode_value(&value)).unwrap();
        assert_eq!(decoded, value);
    }

    #[test]
    fn test_invalid_base64() {
        let err = decode_and_parse("not base64 !!").unwrap_err();
        assert!(matches!(err, DecodeError::Encoding(_)));
    }

    #[test]
    fn test_invalid_json_after_decode() {
        let err = decode_and_parse(&encode_text("{broken")).unwrap_err();
        assert!(matches!(err, DecodeError::Json(_)));
    }
}
