//! Inbound event decoding
//!
//! A file-landed notification arrives in one of three layouts depending on
//! the delivery path: a flat bucket/name pair, the same pair nested under
//! `data`, or a Pub/Sub-style envelope whose `message.data` field is a
//! base64-encoded JSON payload. Anything else is a decode error, which the
//! dispatcher reports as the caller's fault.

use crate::domain::{ConcordError, Result};
use base64::{engine::general_purpose, Engine as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A file-landed notification, decoded to its essentials
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEvent {
    /// Storage container the object landed in
    pub bucket: String,
    /// Object path within the bucket
    pub name: String,
}

impl StorageEvent {
    /// Decode an inbound event payload
    ///
    /// Accepted layouts, tried in order:
    /// 1. flat: `{"bucket": ..., "name": ...}`
    /// 2. nested: `{"data": {"bucket": ..., "name": ...}}`
    /// 3. enveloped: `{"message": {"data": "<base64 JSON of layout 1>"}}`
    ///
    /// # Errors
    ///
    /// Returns `ConcordError::Decode` for any other shape.
    pub fn decode(payload: &Value) -> Result<Self> {
        if let Some(event) = Self::from_pair(payload) {
            return Ok(event);
        }
        if let Some(event) = payload.get("data").and_then(Self::from_pair) {
            return Ok(event);
        }
        if let Some(encoded) = payload
            .get("message")
            .and_then(|m| m.get("data"))
            .and_then(Value::as_str)
        {
            return Self::from_envelope(encoded);
        }

        Err(ConcordError::Decode(
            "event payload has no bucket/name in any recognized layout".to_string(),
        ))
    }

    fn from_pair(value: &Value) -> Option<Self> {
        let bucket = value.get("bucket")?.as_str()?;
        let name = value.get("name")?.as_str()?;
        Some(Self {
            bucket: bucket.to_string(),
            name: name.to_string(),
        })
    }

    fn from_envelope(encoded: &str) -> Result<Self> {
        let bytes = general_purpose::STANDARD
            .decode(encoded)
            .map_err(|e| ConcordError::Decode(format!("message.data is not valid base64: {e}")))?;
        let inner: Value = serde_json::from_slice(&bytes)
            .map_err(|e| ConcordError::Decode(format!("message.data is not valid JSON: {e}")))?;
        Self::from_pair(&inner).ok_or_else(|| {
            ConcordError::Decode("enveloped payload has no bucket/name pair".to_string())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_flat_layout() {
        let payload = json!({"bucket": "landing", "name": "csv/batch.csv"});
        let event = StorageEvent::decode(&payload).unwrap();
        assert_eq!(event.bucket, "landing");
        assert_eq!(event.name, "csv/batch.csv");
    }

    #[test]
    fn test_decode_nested_layout() {
        let payload = json!({"data": {"bucket": "landing", "name": "hl7/feed.hl7"}});
        let event = StorageEvent::decode(&payload).unwrap();
        assert_eq!(event.bucket, "landing");
        assert_eq!(event.name, "hl7/feed.hl7");
    }

    #[test]
    fn test_decode_enveloped_layout() {
        let inner = json!({"bucket": "landing", "name": "fhir/bundle.json"}).to_string();
        let encoded = general_purpose::STANDARD.encode(inner.as_bytes());
        let payload = json!({"message": {"data": encoded}});

        let event = StorageEvent::decode(&payload).unwrap();
        assert_eq!(event.bucket, "landing");
        assert_eq!(event.name, "fhir/bundle.json");
    }

    #[test]
    fn test_decode_unrecognized_shape_fails() {
        for payload in [
            json!({}),
            json!({"bucket": "landing"}),
            json!({"name": "csv/batch.csv"}),
            json!({"data": {"bucket": "landing"}}),
            json!({"bucket": 7, "name": "csv/batch.csv"}),
            json!([1, 2, 3]),
        ] {
            let result = StorageEvent::decode(&payload);
            assert!(matches!(result, Err(ConcordError::Decode(_))), "payload: {payload}");
        }
    }

    #[test]
    fn test_decode_envelope_with_bad_base64_fails() {
        let payload = json!({"message": {"data": "%%% not base64 %%%"}});
        assert!(matches!(
            StorageEvent::decode(&payload),
            Err(ConcordError::Decode(_))
        ));
    }

    #[test]
    fn test_decode_envelope_with_non_json_payload_fails() {
        let encoded = general_purpose::STANDARD.encode(b"plain text");
        let payload = json!({"message": {"data": encoded}});
        assert!(matches!(
            StorageEvent::decode(&payload),
            Err(ConcordError::Decode(_))
        ));
    }

    #[test]
    fn test_flat_layout_wins_over_nested() {
        let payload = json!({
            "bucket": "outer",
            "name": "csv/outer.csv",
            "data": {"bucket": "inner", "name": "csv/inner.csv"}
        });
        let event = StorageEvent::decode(&payload).unwrap();
        assert_eq!(event.bucket, "outer");
    }
}
