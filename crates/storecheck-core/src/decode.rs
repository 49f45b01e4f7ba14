// crates/storecheck-core/src/decode.rs
// ============================================================================
// Module: Storecheck Response Decoder
// Description: Schema-labelled decoding of HTTP response bodies.
// Purpose: Turn raw bodies into typed payloads with a tolerant field policy.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! The decoder converts a raw response body into a typed payload exactly
//! once per response. Unknown input fields are silently dropped, absent
//! fields surface as `None` (or [`FieldPresence::Missing`]) rather than
//! defaulted values, and malformed input fails the step with an error
//! naming the attempted schema. Decoding is purely functional: the same
//! body always yields structurally equal values.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use serde::Serializer;
use serde::de::DeserializeOwned;
use serde::de::Deserializer;
use serde_json::Value;
use thiserror::Error;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a response body does not match the expected schema.
///
/// # Invariants
/// - `schema` is the stable label of the attempted schema, not a type name.
/// - A decode error never leaves a partially populated payload behind.
#[derive(Debug, Error)]
#[error("response body did not match schema `{schema}`: {source}")]
pub struct DecodeError {
    /// Stable label of the schema the decoder attempted.
    pub schema: String,
    /// Underlying parse or shape mismatch.
    #[source]
    pub source: serde_json::Error,
}

// ============================================================================
// SECTION: Decoding
// ============================================================================

/// Decodes a raw response body into the target payload type.
///
/// # Errors
///
/// Returns [`DecodeError`] naming `schema` when the body is not valid JSON
/// or does not match the target shape. This is a hard failure for the
/// calling step; there is no retry.
pub fn decode_payload<T: DeserializeOwned>(body: &[u8], schema: &str) -> Result<T, DecodeError> {
    serde_json::from_slice(body).map_err(|source| DecodeError {
        schema: schema.to_string(),
        source,
    })
}

/// Decodes an already-parsed JSON value into the target payload type.
///
/// # Errors
///
/// Returns [`DecodeError`] naming `schema` when the value does not match
/// the target shape.
pub fn decode_value<T: DeserializeOwned>(value: Value, schema: &str) -> Result<T, DecodeError> {
    serde_json::from_value(value).map_err(|source| DecodeError {
        schema: schema.to_string(),
        source,
    })
}

// ============================================================================
// SECTION: Field Presence
// ============================================================================

/// Three-way presence for duck-typed response fields.
///
/// Some endpoints return a field as an object once available and as `null`
/// while pending; "present but null" and "structurally missing" are
/// distinct conditions and must stay distinguishable after decoding.
///
/// Fields of this type must carry `#[serde(default)]` so an absent field
/// decodes as [`FieldPresence::Missing`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldPresence<T> {
    /// The field was structurally absent from the body.
    Missing,
    /// The field was present with a `null` value.
    Null,
    /// The field was present with a concrete value.
    Present(T),
}

impl<T> FieldPresence<T> {
    /// Returns true when the field was structurally absent.
    #[must_use]
    pub const fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    /// Returns true when the field was present but null.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the concrete value, when present.
    #[must_use]
    pub const fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Missing | Self::Null => None,
        }
    }
}

impl<T> Default for FieldPresence<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for FieldPresence<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer)
            .map(|inner| inner.map_or(Self::Null, Self::Present))
    }
}

impl<T: Serialize> Serialize for FieldPresence<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Missing | Self::Null => serializer.serialize_none(),
            Self::Present(value) => value.serialize(serializer),
        }
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
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    #[derive(Debug, PartialEq, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct Sample {
        access_token: String,
        refresh_token: Option<String>,
        #[serde(default)]
        tags: FieldPresence<Vec<String>>,
    }

    #[test]
    fn unknown_fields_are_dropped() {
        let with_extras = br#"{"accessToken":"a","refreshToken":"r","vendor":"x","extra":1}"#;
        let without = br#"{"accessToken":"a","refreshToken":"r"}"#;
        let left: Sample = decode_payload(with_extras, "sample").unwrap_or_else(|err| {
            unreachable!("extra fields must not fail decoding: {err}")
        });
        let right: Sample = decode_payload(without, "sample").unwrap_or_else(|err| {
            unreachable!("plain body must decode: {err}")
        });
        assert_eq!(left, right);
    }

    #[test]
    fn absent_fields_stay_unset() {
        let body = br#"{"accessToken":"a"}"#;
        let sample: Sample = decode_payload(body, "sample")
            .unwrap_or_else(|err| unreachable!("body must decode: {err}"));
        assert_eq!(sample.refresh_token, None);
        assert!(sample.tags.is_missing());
    }

    #[test]
    fn null_and_missing_are_distinct() {
        let null_body = br#"{"accessToken":"a","tags":null}"#;
        let sample: Sample = decode_payload(null_body, "sample")
            .unwrap_or_else(|err| unreachable!("body must decode: {err}"));
        assert!(sample.tags.is_null());
        assert!(!sample.tags.is_missing());
    }

    #[test]
    fn truncated_body_names_the_schema() {
        let err = match decode_payload::<Sample>(br#"{"accessToken":"a""#, "loginResponse") {
            Ok(_) => unreachable!("truncated body must not decode"),
            Err(err) => err,
        };
        assert_eq!(err.schema, "loginResponse");
        assert!(err.to_string().contains("loginResponse"));
    }

    #[test]
    fn redecoding_is_deterministic() {
        let body = br#"{"accessToken":"a","refreshToken":"r","tags":["silk","festive"]}"#;
        let first: Sample = decode_payload(body, "sample")
            .unwrap_or_else(|err| unreachable!("body must decode: {err}"));
        let second: Sample = decode_payload(body, "sample")
            .unwrap_or_else(|err| unreachable!("body must decode: {err}"));
        assert_eq!(first, second);
    }

    #[test]
    fn decode_value_matches_decode_payload() {
        let value = json!({"accessToken": "a", "refreshToken": null});
        let sample: Sample = decode_value(value, "sample")
            .unwrap_or_else(|err| unreachable!("value must decode: {err}"));
        assert_eq!(sample.access_token, "a");
        assert_eq!(sample.refresh_token, None);
    }
}
