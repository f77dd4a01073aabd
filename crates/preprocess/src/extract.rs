//! Base64 payload decoding

use base64::{engine::general_purpose::STANDARD, Engine as _};
use photo_tensor_common::{PreprocessError, Result};

const DATA_URI_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

/// Raw bytes decoded from one payload, owned by a single preprocessing call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBytes(Vec<u8>);

impl RawBytes {
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for RawBytes {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for RawBytes {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Strip a leading `data:image/<subtype>;base64,` marker, if present
#[must_use]
pub fn strip_data_uri(payload: &str) -> &str {
    let trimmed = payload.trim_start();
    if let Some(rest) = trimmed.strip_prefix(DATA_URI_PREFIX) {
        if let Some(pos) = rest.find(BASE64_MARKER) {
            return &rest[pos + BASE64_MARKER.len()..];
        }
    }
    trimmed
}

/// Decode a base64 payload into raw bytes
///
/// ASCII whitespace is ignored so line-wrapped payloads decode as-is.
///
/// # Errors
/// Returns `DecodeError` for malformed base64 or a payload that decodes to
/// zero bytes.
pub fn extract_bytes(payload: &str) -> Result<RawBytes> {
    let body = strip_data_uri(payload);
    let compact: String = body.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    if compact.is_empty() {
        return Err(PreprocessError::DecodeError("Payload is empty".to_string()));
    }

    let bytes = STANDARD
        .decode(compact.as_bytes())
        .map_err(|e| PreprocessError::DecodeError(format!("Invalid base64: {e}")))?;

    if bytes.is_empty() {
        return Err(PreprocessError::DecodeError(
            "Payload decoded to zero bytes".to_string(),
        ));
    }

    Ok(RawBytes(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_data_uri() {
        assert_eq!(strip_data_uri("data:image/png;base64,AAAA"), "AAAA");
        assert_eq!(strip_data_uri("data:image/jpeg;base64,/9j/"), "/9j/");
        assert_eq!(strip_data_uri("AAAA"), "AAAA");
        // Not an image data URI: left alone (and will fail to decode)
        assert_eq!(strip_data_uri("data:text/plain,hi"), "data:text/plain,hi");
    }

    #[test]
    fn test_extract_bytes() {
        let bytes = extract_bytes("AAEC/w==").unwrap();
        assert_eq!(bytes.as_slice(), &[0, 1, 2, 255]);

        let prefixed = extract_bytes("data:image/png;base64,AAEC/w==").unwrap();
        assert_eq!(prefixed, bytes);
    }

    #[test]
    fn test_extract_bytes_ignores_line_wrapping() {
        let bytes = extract_bytes("AAEC\n/w==\r\n").unwrap();
        assert_eq!(bytes.as_slice(), &[0, 1, 2, 255]);
    }

    #[test]
    fn test_extract_bytes_errors() {
        assert!(matches!(
            extract_bytes(""),
            Err(PreprocessError::DecodeError(_))
        ));
        assert!(matches!(
            extract_bytes("data:image/png;base64,"),
            Err(PreprocessError::DecodeError(_))
        ));
        assert!(matches!(
            extract_bytes("not-base64!!"),
            Err(PreprocessError::DecodeError(_))
        ));
    }
}
