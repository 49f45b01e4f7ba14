// crates/storecheck-core/src/response.rs
// ============================================================================
// Module: Storecheck Call Record
// Description: Captured outcome of a single HTTP round-trip.
// Purpose: Carry status, body, content type, and elapsed time to the checks.
// Dependencies: serde_json
// ============================================================================

//! ## Overview
//! A call record is created immediately after an HTTP call returns and is
//! owned solely by the invoking step; it is discarded at the end of the
//! step and never stored in the run context. The raw body is kept as bytes
//! so the typed decode happens exactly once, at the caller's request.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;

use serde_json::Value;

use crate::decode;
use crate::decode::DecodeError;

// ============================================================================
// SECTION: Call Record
// ============================================================================

/// Captured outcome of one HTTP round-trip.
///
/// # Invariants
/// - `elapsed` is wall time measured around the blocking round-trip.
/// - `body` holds the raw bytes exactly as received.
#[derive(Debug, Clone)]
pub struct CallRecord {
    /// HTTP status code of the response.
    pub status: u16,
    /// Raw response body bytes.
    pub body: Vec<u8>,
    /// `Content-Type` header value, when present.
    pub content_type: Option<String>,
    /// Wall time spent in the round-trip.
    pub elapsed: Duration,
}

impl CallRecord {
    /// Creates a record from the parts captured around an HTTP call.
    #[must_use]
    pub const fn new(
        status: u16,
        body: Vec<u8>,
        content_type: Option<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            status,
            body,
            content_type,
            elapsed,
        }
    }

    /// Parses the body as JSON for field-level checks.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] when the body is not valid JSON.
    pub fn json(&self) -> Result<Value, DecodeError> {
        decode::decode_payload(&self.body, "response body")
    }

    /// Decodes the body into a typed payload under the given schema label.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] naming `schema` on malformed or mismatched
    /// bodies.
    pub fn decode<T: serde::de::DeserializeOwned>(&self, schema: &str) -> Result<T, DecodeError> {
        decode::decode_payload(&self.body, schema)
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
#[allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only panic-based assertions are permitted."
)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn json_view_parses_body() {
        let record = CallRecord::new(
            200,
            br#"{"data":{"title":"Premium Saree for Women"}}"#.to_vec(),
            Some("application/json".to_string()),
            Duration::from_millis(120),
        );
        let value = record.json().unwrap_or_else(|err| unreachable!("body must parse: {err}"));
        assert_eq!(value["data"]["title"], "Premium Saree for Women");
    }

    #[test]
    fn invalid_body_surfaces_decode_error() {
        let record = CallRecord::new(200, b"not-json".to_vec(), None, Duration::ZERO);
        assert!(record.json().is_err());
    }
}
