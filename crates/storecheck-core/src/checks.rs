// crates/storecheck-core/src/checks.rs
// ============================================================================
// Module: Storecheck Check Pipeline
// Description: Declarative checks evaluated against a call record.
// Purpose: Convert response expectations into named pass/fail outcomes.
// Dependencies: crate::response, regex, serde_json, thiserror
// ============================================================================

//! ## Overview
//! A check is one declarative, independently evaluated assertion against a
//! call record: status code, timing threshold, content type, field
//! presence/type/value/pattern, or array bounds. [`verify`] evaluates a
//! sequence of checks in order and stops at the first failure; each
//! failure names the business-meaning check, the expected value, and the
//! actual value, attributed to the endpoint under test.
//!
//! Field paths resolve with a three-way outcome so "present but null" and
//! "structurally missing" produce distinct diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;
use std::time::Duration;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::response::CallRecord;

// ============================================================================
// SECTION: Field Kinds
// ============================================================================

/// Expected runtime type for a field-type check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// JSON string.
    String,
    /// JSON boolean.
    Boolean,
    /// JSON number.
    Number,
    /// JSON array.
    Array,
    /// JSON object.
    Object,
}

impl FieldKind {
    /// Returns the stable label used in diagnostics.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Array => "array",
            Self::Object => "object",
        }
    }

    /// Returns true when the value has this runtime type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match self {
            Self::String => value.is_string(),
            Self::Boolean => value.is_boolean(),
            Self::Number => value.is_number(),
            Self::Array => value.is_array(),
            Self::Object => value.is_object(),
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns the runtime type label of a JSON value.
fn kind_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// ============================================================================
// SECTION: Path Resolution
// ============================================================================

/// Three-way outcome of resolving a field path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathValue<'a> {
    /// The path does not exist in the document.
    Missing,
    /// The path exists and holds an explicit `null`.
    Null,
    /// The path exists and holds a concrete value.
    Value(&'a Value),
}

/// Resolves a dotted field path against a JSON document.
///
/// Segments index objects by key and arrays by non-negative integer
/// (`data.items.0.id`). A missing key, an out-of-range index, or a
/// traversal into a scalar yields [`PathValue::Missing`]; only an explicit
/// terminal `null` yields [`PathValue::Null`].
#[must_use]
pub fn resolve_path<'a>(root: &'a Value, path: &str) -> PathValue<'a> {
    let mut current = root;
    for segment in path.split('.') {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };
        match next {
            Some(value) => current = value,
            None => return PathValue::Missing,
        }
    }
    if current.is_null() { PathValue::Null } else { PathValue::Value(current) }
}

// ============================================================================
// SECTION: Check Kinds
// ============================================================================

/// Regex evaluation semantics for pattern checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// The whole string must match the pattern.
    Full,
    /// The pattern must match somewhere within the string.
    Contains,
}

/// One declarative check against a call record.
#[derive(Debug, Clone)]
pub enum Check {
    /// Status code equals the expected value.
    StatusEquals(u16),
    /// Elapsed time is strictly under the threshold.
    TimeUnder(Duration),
    /// `Content-Type` header contains the substring.
    ContentTypeContains(String),
    /// Value at the path is present and non-null.
    FieldPresent(String),
    /// Value at the path has the expected runtime type.
    FieldType(String, FieldKind),
    /// Value at the path deep-equals the expected value.
    FieldEquals(String, Value),
    /// String value at the path matches the pattern.
    FieldMatches {
        /// Dotted field path to the string value.
        path: String,
        /// Regular expression source.
        pattern: String,
        /// Full-match versus substring-search semantics.
        mode: MatchMode,
    },
    /// Array at the path has at least one element.
    ArrayNonEmpty(String),
    /// Array at the path has at most `max` elements.
    ArrayBounded(String, usize),
}

// ============================================================================
// SECTION: Failures
// ============================================================================

/// Structured failure for one check.
///
/// # Invariants
/// - `description` names the business-meaning check, not a generic assert.
/// - `expected` and `actual` are always both populated.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("check failed for {endpoint}: {description}: expected {expected}, actual {actual}")]
pub struct CheckFailure {
    /// Endpoint under test, for attribution.
    pub endpoint: String,
    /// Human-readable description of the check that failed.
    pub description: String,
    /// Rendering of the expected value or condition.
    pub expected: String,
    /// Rendering of the observed value or condition.
    pub actual: String,
}

impl CheckFailure {
    /// Builds a failure attributed to the endpoint under test.
    fn new(
        endpoint: &str,
        description: impl Into<String>,
        expected: impl Into<String>,
        actual: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            description: description.into(),
            expected: expected.into(),
            actual: actual.into(),
        }
    }
}

// ============================================================================
// SECTION: Verification
// ============================================================================

/// Evaluates checks in order against a call record, stopping at the first
/// failure.
///
/// Failure isolation is per step: a failure here fails only the calling
/// step; siblings keep running unless they declared a dependency on it.
///
/// # Errors
///
/// Returns the first [`CheckFailure`] in declaration order.
pub fn verify(endpoint: &str, record: &CallRecord, checks: &[Check]) -> Result<(), CheckFailure> {
    let mut parsed: Option<Value> = None;
    for check in checks {
        evaluate(endpoint, record, &mut parsed, check)?;
    }
    Ok(())
}

/// Evaluates one check, parsing the body lazily for field-level kinds.
fn evaluate(
    endpoint: &str,
    record: &CallRecord,
    parsed: &mut Option<Value>,
    check: &Check,
) -> Result<(), CheckFailure> {
    match check {
        Check::StatusEquals(expected) => {
            if record.status == *expected {
                Ok(())
            } else {
                Err(CheckFailure::new(
                    endpoint,
                    format!("status code equals {expected}"),
                    expected.to_string(),
                    record.status.to_string(),
                ))
            }
        }
        Check::TimeUnder(threshold) => {
            if record.elapsed < *threshold {
                Ok(())
            } else {
                Err(CheckFailure::new(
                    endpoint,
                    format!("response time under {} ms", threshold.as_millis()),
                    format!("< {} ms", threshold.as_millis()),
                    format!("{} ms", record.elapsed.as_millis()),
                ))
            }
        }
        Check::ContentTypeContains(substring) => {
            let header = record.content_type.as_deref();
            if header.is_some_and(|value| value.contains(substring.as_str())) {
                Ok(())
            } else {
                Err(CheckFailure::new(
                    endpoint,
                    format!("content type contains `{substring}`"),
                    format!("header containing `{substring}`"),
                    header.map_or_else(|| "(no content-type header)".to_string(), str::to_string),
                ))
            }
        }
        Check::FieldPresent(path) => match field(endpoint, record, parsed, path)? {
            PathValue::Value(_) => Ok(()),
            PathValue::Null => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` is present"),
                format!("non-null value at `{path}`"),
                "present but null".to_string(),
            )),
            PathValue::Missing => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` is present"),
                format!("non-null value at `{path}`"),
                "structurally missing".to_string(),
            )),
        },
        Check::FieldType(path, kind) => match field(endpoint, record, parsed, path)? {
            PathValue::Value(value) if kind.matches(value) => Ok(()),
            PathValue::Value(value) => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` has type {kind}"),
                kind.as_str().to_string(),
                kind_name(value).to_string(),
            )),
            PathValue::Null => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` has type {kind}"),
                kind.as_str().to_string(),
                "present but null".to_string(),
            )),
            PathValue::Missing => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` has type {kind}"),
                kind.as_str().to_string(),
                "structurally missing".to_string(),
            )),
        },
        Check::FieldEquals(path, expected) => match field(endpoint, record, parsed, path)? {
            PathValue::Value(value) if deep_equals(value, expected) => Ok(()),
            PathValue::Value(value) => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` equals expected value"),
                expected.to_string(),
                value.to_string(),
            )),
            PathValue::Null => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` equals expected value"),
                expected.to_string(),
                "present but null".to_string(),
            )),
            PathValue::Missing => Err(CheckFailure::new(
                endpoint,
                format!("field `{path}` equals expected value"),
                expected.to_string(),
                "structurally missing".to_string(),
            )),
        },
        Check::FieldMatches {
            path,
            pattern,
            mode,
        } => evaluate_pattern(endpoint, record, parsed, path, pattern, *mode),
        Check::ArrayNonEmpty(path) => match array_at(endpoint, record, parsed, path)? {
            items if items.is_empty() => Err(CheckFailure::new(
                endpoint,
                format!("array `{path}` is non-empty"),
                "length > 0".to_string(),
                "length 0".to_string(),
            )),
            _ => Ok(()),
        },
        Check::ArrayBounded(path, max) => {
            let items = array_at(endpoint, record, parsed, path)?;
            if items.len() <= *max {
                Ok(())
            } else {
                Err(CheckFailure::new(
                    endpoint,
                    format!("array `{path}` has at most {max} elements"),
                    format!("length <= {max}"),
                    format!("length {}", items.len()),
                ))
            }
        }
    }
}

/// Evaluates a pattern check with full-match or substring semantics.
fn evaluate_pattern(
    endpoint: &str,
    record: &CallRecord,
    parsed: &mut Option<Value>,
    path: &str,
    pattern: &str,
    mode: MatchMode,
) -> Result<(), CheckFailure> {
    let description = match mode {
        MatchMode::Full => format!("field `{path}` matches pattern `{pattern}`"),
        MatchMode::Contains => format!("field `{path}` contains pattern `{pattern}`"),
    };
    let text = match field(endpoint, record, parsed, path)? {
        PathValue::Value(Value::String(text)) => text.clone(),
        PathValue::Value(value) => {
            return Err(CheckFailure::new(
                endpoint,
                description,
                "string value".to_string(),
                kind_name(value).to_string(),
            ));
        }
        PathValue::Null => {
            return Err(CheckFailure::new(
                endpoint,
                description,
                "string value".to_string(),
                "present but null".to_string(),
            ));
        }
        PathValue::Missing => {
            return Err(CheckFailure::new(
                endpoint,
                description,
                "string value".to_string(),
                "structurally missing".to_string(),
            ));
        }
    };
    let source = match mode {
        MatchMode::Full => format!("^(?:{pattern})$"),
        MatchMode::Contains => pattern.to_string(),
    };
    let regex = Regex::new(&source).map_err(|err| {
        CheckFailure::new(
            endpoint,
            description.clone(),
            "valid regular expression".to_string(),
            err.to_string(),
        )
    })?;
    if regex.is_match(&text) {
        Ok(())
    } else {
        Err(CheckFailure::new(endpoint, description, format!("`{pattern}`"), format!("`{text}`")))
    }
}

/// Resolves a field path, parsing the body lazily on first use.
fn field<'a>(
    endpoint: &str,
    record: &CallRecord,
    parsed: &'a mut Option<Value>,
    path: &str,
) -> Result<PathValue<'a>, CheckFailure> {
    if parsed.is_none() {
        let value = record.json().map_err(|err| {
            CheckFailure::new(
                endpoint,
                "response body parses as JSON".to_string(),
                "valid JSON body".to_string(),
                err.to_string(),
            )
        })?;
        *parsed = Some(value);
    }
    match parsed {
        Some(root) => Ok(resolve_path(root, path)),
        // Unreachable: the body was parsed above; kept total for the borrow.
        None => Ok(PathValue::Missing),
    }
}

/// Resolves a field path that must hold an array.
fn array_at<'a>(
    endpoint: &str,
    record: &CallRecord,
    parsed: &'a mut Option<Value>,
    path: &str,
) -> Result<&'a [Value], CheckFailure> {
    let description = format!("field `{path}` is an array");
    match field(endpoint, record, parsed, path)? {
        PathValue::Value(Value::Array(items)) => Ok(items),
        PathValue::Value(value) => Err(CheckFailure::new(
            endpoint,
            description,
            "array".to_string(),
            kind_name(value).to_string(),
        )),
        PathValue::Null => Err(CheckFailure::new(
            endpoint,
            description,
            "array".to_string(),
            "present but null".to_string(),
        )),
        PathValue::Missing => Err(CheckFailure::new(
            endpoint,
            description,
            "array".to_string(),
            "structurally missing".to_string(),
        )),
    }
}

/// Compares JSON values with numeric equality across integer and float
/// representations.
///
/// `450` and `450.0` are the same value on the wire even though
/// `serde_json` stores them differently.
fn deep_equals(left: &Value, right: &Value) -> bool {
    match (left, right) {
        (Value::Number(l), Value::Number(r)) => match (l.as_f64(), r.as_f64()) {
            (Some(l), Some(r)) => l == r,
            _ => l == r,
        },
        (Value::Array(l), Value::Array(r)) => {
            l.len() == r.len() && l.iter().zip(r).all(|(a, b)| deep_equals(a, b))
        }
        (Value::Object(l), Value::Object(r)) => {
            l.len() == r.len()
                && l.iter().all(|(key, a)| r.get(key).is_some_and(|b| deep_equals(a, b)))
        }
        _ => left == right,
    }
}
