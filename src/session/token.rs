//! Pending attribution token.
//!
//! Created when a tracked hit resolves an origin with registration tracking
//! enabled, consumed at most once by the registration recorder. The token
//! travels in the visitor's cookie as URL-encoded JSON; a visitor has at
//! most one pending token and a new hit overwrites the previous one.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::{Result, TrackError};

/// Cookies above this size get rejected by browsers, so a token that does
/// not fit is dropped rather than truncated.
const MAX_ENCODED_LEN: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributionToken {
    /// Origin code captured at hit time.
    pub code: String,
    /// Querystring parameters captured at hit time, key to value.
    pub params: HashMap<String, String>,
}

impl AttributionToken {
    pub fn new(code: impl Into<String>, params: HashMap<String, String>) -> Self {
        Self {
            code: code.into(),
            params,
        }
    }

    /// Encode for cookie transport.
    pub fn encode(&self) -> Result<String> {
        let json = serde_json::to_string(self)?;
        let encoded = urlencoding::encode(&json).into_owned();
        if encoded.len() > MAX_ENCODED_LEN {
            return Err(TrackError::validation(format!(
                "attribution token too large for a cookie: {} bytes",
                encoded.len()
            )));
        }
        Ok(encoded)
    }

    /// Decode a cookie value. Malformed or oversized input reads as no token.
    pub fn decode(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > MAX_ENCODED_LEN {
            return None;
        }
        let json = urlencoding::decode(raw).ok()?;
        serde_json::from_str(&json).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_encode_decode_round_trip() {
        let token = AttributionToken::new("abc1234", params(&[("pid", "7"), ("oid", "9")]));
        let encoded = token.encode().unwrap();
        let decoded = AttributionToken::decode(&encoded).unwrap();
        assert_eq!(decoded, token);
    }

    #[test]
    fn test_decode_garbage_is_none() {
        assert!(AttributionToken::decode("").is_none());
        assert!(AttributionToken::decode("not-json").is_none());
        assert!(AttributionToken::decode("%7B%22code%22%3A").is_none());
    }

    #[test]
    fn test_decode_oversized_is_none() {
        let raw = "x".repeat(MAX_ENCODED_LEN + 1);
        assert!(AttributionToken::decode(&raw).is_none());
    }

    #[test]
    fn test_encode_rejects_oversized_params() {
        let big: String = "v".repeat(MAX_ENCODED_LEN);
        let token = AttributionToken::new("abc1234", params(&[("k", big.as_str())]));
        assert!(token.encode().is_err());
    }
}
