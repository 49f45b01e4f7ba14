// crates/storecheck-core/src/context.rs
// ============================================================================
// Module: Storecheck Run Context
// Description: Per-suite artifact store bridging producer and consumer steps.
// Purpose: Broker tokens, identifiers, and titles between dependent steps.
// Dependencies: serde, thiserror
// ============================================================================

//! ## Overview
//! The run context is the only shared mutable state of a suite run. A
//! producing step records an artifact once; later consuming steps read it
//! instead of re-fetching. Reads never fail by themselves: callers choose
//! per key whether absence is fatal ([`RunContext::require`]) or
//! recoverable with a literal fallback ([`RunContext::get_or`]).
//!
//! Each suite owns an isolated context instance. The admin and buyer
//! backends have distinct token domains and must never share one.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Context Keys
// ============================================================================

/// Logical names for artifacts shared between steps.
///
/// # Invariants
/// - Wire labels are stable; they appear in diagnostics and artifacts.
/// - Each key has exactly one producing step per suite run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ContextKey {
    /// Admin backend access token, produced by the login step.
    AuthToken,
    /// Buyer app access token, produced by the buyer login step.
    BuyerAppToken,
    /// Identifier of a live catalog entry, produced by catalog search.
    LiveCatalogId,
    /// Identifier of an uploaded video, produced by video registration.
    VideoId,
    /// Title of the uploaded video, produced by video registration.
    VideoTitle,
    /// Recommended search term, produced by the search step.
    SearchRecommend,
    /// Identifier of the recommended search entry, produced by the search step.
    SearchRecommendId,
}

impl ContextKey {
    /// Returns the stable label used in diagnostics and artifacts.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AuthToken => "authToken",
            Self::BuyerAppToken => "buyerAppToken",
            Self::LiveCatalogId => "liveCatalogId",
            Self::VideoId => "videoId",
            Self::VideoTitle => "videoTitle",
            Self::SearchRecommend => "searchRecommend",
            Self::SearchRecommendId => "searchRecommendId",
        }
    }

    /// Returns the name of the step expected to produce this artifact.
    #[must_use]
    pub const fn producer(self) -> &'static str {
        match self {
            Self::AuthToken => "admin_login",
            Self::BuyerAppToken => "buyer_login",
            Self::LiveCatalogId => "catalog_search",
            Self::VideoId | Self::VideoTitle => "video_register",
            Self::SearchRecommend | Self::SearchRecommendId => "buyer_search",
        }
    }

    /// Returns true when a missing value must abort the dependent chain.
    ///
    /// Only auth tokens are fatal; identifier and title keys fall back to
    /// literal defaults at the call site.
    #[must_use]
    pub const fn fatal_when_missing(self) -> bool {
        matches!(self, Self::AuthToken | Self::BuyerAppToken)
    }
}

impl fmt::Display for ContextKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised when a required artifact was never produced.
///
/// The message names the missing key and the upstream producer so the
/// diagnostic points at the real cause rather than the consuming step.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "missing run artifact `{key}`: producing step `{producer}` has not recorded it"
)]
pub struct MissingArtifactError {
    /// The absent context key.
    pub key: ContextKey,
    /// Name of the step expected to produce the artifact.
    pub producer: &'static str,
}

// ============================================================================
// SECTION: Run Context
// ============================================================================

/// Per-suite artifact store.
///
/// # Invariants
/// - Writes are last-write-wins; re-running a producer overwrites.
/// - Values persist for the suite run; there is no deletion.
/// - Scheduling is single-threaded and sequential, so no locking is needed.
#[derive(Debug, Clone, Default)]
pub struct RunContext {
    /// Stored artifacts keyed by logical name.
    entries: BTreeMap<ContextKey, String>,
}

impl RunContext {
    /// Creates an empty context for a new suite run.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an artifact, overwriting any existing value for the key.
    pub fn set(&mut self, key: ContextKey, value: impl Into<String>) {
        self.entries.insert(key, value.into());
    }

    /// Returns the stored value, or `None` when the key was never produced.
    #[must_use]
    pub fn get(&self, key: ContextKey) -> Option<&str> {
        self.entries.get(&key).map(String::as_str)
    }

    /// Returns the stored value, or the literal fallback when absent.
    ///
    /// This is the recoverable-absence path for identifier and title keys.
    #[must_use]
    pub fn get_or<'a>(&'a self, key: ContextKey, fallback: &'a str) -> &'a str {
        self.get(key).unwrap_or(fallback)
    }

    /// Returns the stored value, or an error naming the missing producer.
    ///
    /// This is the fatal path for auth-token keys: the caller aborts the
    /// dependent chain with the returned diagnostic.
    ///
    /// # Errors
    ///
    /// Returns [`MissingArtifactError`] when the key was never produced.
    pub fn require(&self, key: ContextKey) -> Result<&str, MissingArtifactError> {
        self.get(key).ok_or(MissingArtifactError {
            key,
            producer: key.producer(),
        })
    }

    /// Returns true when the key has a recorded value.
    #[must_use]
    pub fn is_set(&self, key: ContextKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns the number of recorded artifacts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when no artifacts have been recorded yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
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
    use super::*;

    #[test]
    fn set_then_get_round_trips() {
        let mut ctx = RunContext::new();
        ctx.set(ContextKey::AuthToken, "tok-123");
        assert_eq!(ctx.get(ContextKey::AuthToken), Some("tok-123"));
    }

    #[test]
    fn last_write_wins_on_rerun() {
        let mut ctx = RunContext::new();
        ctx.set(ContextKey::LiveCatalogId, "first");
        ctx.set(ContextKey::LiveCatalogId, "second");
        assert_eq!(ctx.get(ContextKey::LiveCatalogId), Some("second"));
    }

    #[test]
    fn get_or_falls_back_when_absent() {
        let ctx = RunContext::new();
        assert_eq!(ctx.get_or(ContextKey::VideoTitle, "default title"), "default title");
    }

    #[test]
    fn require_names_key_and_producer() {
        let ctx = RunContext::new();
        let err = match ctx.require(ContextKey::AuthToken) {
            Ok(_) => unreachable!("empty context must not satisfy require"),
            Err(err) => err,
        };
        assert_eq!(err.key, ContextKey::AuthToken);
        assert_eq!(err.producer, "admin_login");
        let message = err.to_string();
        assert!(message.contains("authToken"));
        assert!(message.contains("admin_login"));
    }

    #[test]
    fn fatal_classification_covers_tokens_only() {
        assert!(ContextKey::AuthToken.fatal_when_missing());
        assert!(ContextKey::BuyerAppToken.fatal_when_missing());
        assert!(!ContextKey::LiveCatalogId.fatal_when_missing());
        assert!(!ContextKey::SearchRecommend.fatal_when_missing());
    }
}
