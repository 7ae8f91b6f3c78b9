//! Shared decoding utilities for compact bearer tokens
//!
//! These helpers are used by both the structure checker and the payload
//! validator so that the two stages agree on what a decodable segment is.

use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::{alphabet, Engine as _};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Standard-alphabet engine that accepts segments with or without padding
const LENIENT_STANDARD: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Number of dot-separated segments in a compact token
pub const TOKEN_SEGMENTS: usize = 3;

/// Split a token into its segments if it has exactly three non-empty ones
#[must_use]
pub fn split_token(token: &str) -> Option<[&str; TOKEN_SEGMENTS]> {
    let mut parts = token.split('.');
    let header = parts.next()?;
    let payload = parts.next()?;
    let signature = parts.next()?;

    if parts.next().is_some() || [header, payload, signature].iter().any(|s| s.is_empty()) {
        return None;
    }

    Some([header, payload, signature])
}

/// Decode one base64url token segment
///
/// The url-safe characters are mapped back onto the standard alphabet before
/// decoding, so `-`/`_` and `+`/`/` are both accepted, and padding is optional.
///
/// # Errors
///
/// Returns the decoder's message if the segment is empty or not valid base64.
pub fn decode_segment(segment: &str) -> Result<Vec<u8>, String> {
    if segment.is_empty() {
        return Err("empty segment".to_string());
    }

    let standard: String = segment
        .chars()
        .map(|c| match c {
            '-' => '+',
            '_' => '/',
            other => other,
        })
        .collect();

    LENIENT_STANDARD
        .decode(standard.as_bytes())
        .map_err(|e| e.to_string())
}

/// Decode and parse a token segment (header or payload) as JSON
///
/// # Errors
///
/// Returns an error if:
/// - The segment cannot be decoded from base64url
/// - The decoded bytes are not valid JSON for `T`
pub fn decode_and_parse_jwt_part<T: DeserializeOwned>(
    encoded_data: &str,
    data_type: &str,
) -> Result<T, String> {
    let decoded_bytes =
        decode_segment(encoded_data).map_err(|e| format!("Invalid {data_type} encoding: {e}"))?;

    serde_json::from_slice(&decoded_bytes).map_err(|e| format!("Invalid {data_type} JSON: {e}"))
}

/// Extract string or array audiences from a token's `aud` claim
///
/// Non-string array members are skipped; any other shape yields no audiences.
#[must_use]
pub fn extract_audiences_from_claim(aud_claim: &Value) -> Vec<String> {
    match aud_claim {
        Value::String(aud) => vec![aud.clone()],
        Value::Array(auds) => auds
            .iter()
            .filter_map(|v| v.as_str().map(ToString::to_string))
            .collect(),
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64::engine::general_purpose;
    use serde_json::json;

    #[test]
    fn test_split_token() {
        assert_eq!(split_token("a.b.c"), Some(["a", "b", "c"]));
        assert_eq!(split_token("a.b"), None);
        assert_eq!(split_token("a.b.c.d"), None);
        assert_eq!(split_token("a..c"), None);
        assert_eq!(split_token(".b.c"), None);
        assert_eq!(split_token("a.b."), None);
        assert_eq!(split_token(""), None);
    }

    #[test]
    fn test_decode_segment_accepts_url_safe_and_padding() {
        // 0xfb 0xff encodes to "+/8" in standard and "-_8" in url-safe
        assert_eq!(decode_segment("-_8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_segment("+/8").unwrap(), vec![0xfb, 0xff]);
        assert_eq!(decode_segment("-_8=").unwrap(), vec![0xfb, 0xff]);

        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(b"{\"sub\":\"1\"}");
        assert_eq!(decode_segment(&encoded).unwrap(), b"{\"sub\":\"1\"}");
    }

    #[test]
    fn test_decode_segment_rejects_garbage() {
        assert!(decode_segment("").is_err());
        assert!(decode_segment("not base64!").is_err());
        assert!(decode_segment("a").is_err());
        assert!(decode_segment("ab$d").is_err());
    }

    #[test]
    fn test_decode_and_parse_jwt_part() {
        let encoded = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let header: Value = decode_and_parse_jwt_part(&encoded, "header").unwrap();
        assert_eq!(header["alg"], "HS256");

        let not_json = general_purpose::URL_SAFE_NO_PAD.encode(b"hello");
        let err = decode_and_parse_jwt_part::<Value>(&not_json, "payload").unwrap_err();
        assert!(err.starts_with("Invalid payload JSON"));

        let err = decode_and_parse_jwt_part::<Value>("***", "payload").unwrap_err();
        assert!(err.starts_with("Invalid payload encoding"));
    }

    #[test]
    fn test_extract_audiences_from_claim_string() {
        let aud_claim = json!("single-audience");
        let audiences = extract_audiences_from_claim(&aud_claim);
        assert_eq!(audiences, vec!["single-audience"]);
    }

    #[test]
    fn test_extract_audiences_from_claim_array() {
        let aud_claim = json!(["audience1", "audience2", 123]);
        let audiences = extract_audiences_from_claim(&aud_claim);
        assert_eq!(audiences, vec!["audience1", "audience2"]);
    }

    #[test]
    fn test_extract_audiences_from_claim_invalid() {
        let aud_claim = json!(123);
        let audiences = extract_audiences_from_claim(&aud_claim);
        assert!(audiences.is_empty());
    }
}
