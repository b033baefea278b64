//! Base64 data URI encoding.
//!
//! The generation result travels back to the client as a self-contained
//! `data:<mime>;base64,<payload>` string so it can be played and downloaded
//! without a second request.

use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DataUriError {
    #[error("Not a data URI")]
    MissingScheme,

    #[error("Data URI has no payload separator")]
    MissingSeparator,

    #[error("Only base64 data URIs are supported")]
    NotBase64,

    #[error("Invalid base64 payload: {0}")]
    InvalidPayload(String),
}

/// A decoded data URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataUri {
    pub mime: String,
    pub data: Vec<u8>,
}

impl DataUri {
    /// Encode bytes as a base64 data URI.
    pub fn encode(mime: &str, data: &[u8]) -> String {
        let encoded = STANDARD.encode(data);
        let mut uri = String::with_capacity(mime.len() + encoded.len() + 13);
        uri.push_str("data:");
        uri.push_str(mime);
        uri.push_str(";base64,");
        uri.push_str(&encoded);
        uri
    }

    /// Parse a base64 data URI.
    pub fn parse(uri: &str) -> Result<Self, DataUriError> {
        let rest = uri.strip_prefix("data:").ok_or(DataUriError::MissingScheme)?;
        let (header, payload) = rest.split_once(',').ok_or(DataUriError::MissingSeparator)?;

        let mime = header
            .strip_suffix(";base64")
            .ok_or(DataUriError::NotBase64)?;

        let data = STANDARD
            .decode(payload.trim())
            .map_err(|e| DataUriError::InvalidPayload(e.to_string()))?;

        Ok(Self {
            mime: mime.to_string(),
            data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_format() {
        assert_eq!(DataUri::encode("video/mp4", b"abc"), "data:video/mp4;base64,YWJj");
        assert_eq!(DataUri::encode("video/mp4", b""), "data:video/mp4;base64,");
    }

    #[test]
    fn test_parse_binary_payload() {
        let bytes: Vec<u8> = (0..=255).collect();
        let uri = DataUri::encode("video/mp4", &bytes);
        let parsed = DataUri::parse(&uri).unwrap();
        assert_eq!(parsed.mime, "video/mp4");
        assert_eq!(parsed.data, bytes);
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert_eq!(DataUri::parse("video/mp4;base64,AAAA"), Err(DataUriError::MissingScheme));
        assert_eq!(DataUri::parse("data:video/mp4;base64"), Err(DataUriError::MissingSeparator));
        assert_eq!(DataUri::parse("data:text/plain,hello"), Err(DataUriError::NotBase64));
        assert!(matches!(
            DataUri::parse("data:video/mp4;base64,!!!"),
            Err(DataUriError::InvalidPayload(_))
        ));
    }
}
