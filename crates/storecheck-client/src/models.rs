// crates/storecheck-client/src/models.rs
// ============================================================================
// Module: Storecheck Payload Models
// Description: Typed request and response payloads for both backends.
// Purpose: Give every exercised endpoint a schema with tolerant decoding.
// Dependencies: serde, storecheck-core
// ============================================================================

//! ## Overview
//! Response models follow the tolerant decoding policy: unknown fields are
//! dropped, absent fields stay `None`, and object-or-null fields use
//! [`FieldPresence`] so "pending" (`null`) and "absent" remain
//! distinguishable. Each response model carries a stable `SCHEMA` label
//! used in decode diagnostics.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use storecheck_core::FieldPresence;

// ============================================================================
// SECTION: Auth
// ============================================================================

/// Login request for either backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    /// Login phone number.
    pub phone: String,
    /// One-time login code.
    pub otp: String,
}

/// Login response carrying the token pair.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Access token consumed by dependent steps.
    pub access_token: String,
    /// Refresh token; asserted non-empty but never consumed downstream.
    pub refresh_token: String,
    /// Optional user block.
    pub user: Option<UserSummary>,
}

impl LoginResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "loginResponse";
}

/// User block embedded in the login response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    /// User identifier.
    #[serde(rename = "_id")]
    pub id: Option<String>,
    /// Display name.
    pub name: Option<String>,
    /// Registered phone number.
    pub phone: Option<String>,
}

// ============================================================================
// SECTION: Catalog
// ============================================================================

/// One catalog entry in a search result page.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary {
    /// Catalog entry identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Entry title.
    pub title: Option<String>,
    /// True when the entry is live in the storefront.
    pub live: Option<bool>,
}

/// Catalog search response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSearchResponse {
    /// Result page.
    pub data: Vec<CatalogSummary>,
    /// Total match count, when the backend reports it.
    pub total: Option<u64>,
}

impl CatalogSearchResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "catalogSearchResponse";

    /// Returns the first live entry, the producer of `liveCatalogId`.
    #[must_use]
    pub fn first_live(&self) -> Option<&CatalogSummary> {
        self.data.iter().find(|entry| entry.live == Some(true))
    }
}

/// Catalog edit request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEditRequest {
    /// New entry title.
    pub title: String,
    /// New display price.
    pub price_text: f64,
}

/// Catalog edit response echoing the persisted entry.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEditResponse {
    /// The edited entry.
    pub data: CatalogDetail,
}

impl CatalogEditResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "catalogEditResponse";
}

/// Full catalog entry as returned by the edit endpoint.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogDetail {
    /// Catalog entry identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Entry title.
    pub title: Option<String>,
    /// Display price.
    pub price_text: Option<f64>,
    /// True when the entry is live in the storefront.
    pub live: Option<bool>,
}

// ============================================================================
// SECTION: Video Tagging Pipeline
// ============================================================================

/// Video upload registration request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRegisterRequest {
    /// Video title.
    pub title: String,
    /// Source location of the uploaded video.
    pub source_url: String,
}

/// Video upload registration response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoRegisterResponse {
    /// Identifier of the registered video.
    pub video_id: String,
    /// Echoed title.
    pub title: Option<String>,
}

impl VideoRegisterResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "videoRegisterResponse";
}

/// Tag pipeline status for one video.
///
/// `tags` is `null` while the pipeline is still running and an object once
/// tagging completed; the two states must stay distinguishable.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTagStatusResponse {
    /// Pipeline status label (`pending`, `processing`, `done`).
    pub status: String,
    /// Tag bundle, present only once the pipeline finished.
    #[serde(default)]
    pub tags: FieldPresence<TagBundle>,
}

impl VideoTagStatusResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "videoTagStatusResponse";

    /// Returns true when the pipeline reports completion.
    #[must_use]
    pub fn is_done(&self) -> bool {
        self.status == "done"
    }
}

/// Tag bundle produced by the pipeline.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagBundle {
    /// Assigned tag labels.
    pub labels: Vec<String>,
    /// Aggregate confidence, when reported.
    pub confidence: Option<f64>,
}

/// Final tag listing for one video.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTagsResponse {
    /// Assigned tags.
    pub data: Vec<VideoTag>,
}

impl VideoTagsResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "videoTagsResponse";
}

/// One assigned tag.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoTag {
    /// Tag label.
    pub label: String,
    /// Per-tag confidence, when reported.
    pub confidence: Option<f64>,
}

// ============================================================================
// SECTION: Buyer App
// ============================================================================

/// Collection listing response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionsResponse {
    /// Available collections.
    pub collections: Vec<CollectionSummary>,
}

impl CollectionsResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "collectionsResponse";
}

/// One collection in the listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionSummary {
    /// Collection identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Collection name.
    pub name: String,
    /// Product count, when the listing includes it.
    pub product_count: Option<u64>,
}

/// Product-count response for one collection.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCountResponse {
    /// Collection identifier.
    pub collection_id: Option<String>,
    /// Number of products in the collection.
    pub count: u64,
}

impl CollectionCountResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "collectionCountResponse";
}

/// Search response with an optional recommendation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    /// Matching entries.
    pub results: Vec<SearchResult>,
    /// Backend recommendation; absent or null when none applies.
    #[serde(default)]
    pub recommend: FieldPresence<SearchRecommendation>,
}

impl SearchResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "searchResponse";
}

/// One search result entry.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    /// Entry identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Entry title.
    pub title: Option<String>,
}

/// Recommended search term with its identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchRecommendation {
    /// Recommendation identifier, the producer of `searchRecommendId`.
    #[serde(rename = "_id")]
    pub id: String,
    /// Recommended term, the producer of `searchRecommend`.
    pub name: String,
}

/// Buyer profile response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    /// Display name.
    pub name: Option<String>,
    /// Registered phone number.
    pub phone: Option<String>,
    /// Contact email.
    pub email: Option<String>,
}

impl ProfileResponse {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "profileResponse";
}

// ============================================================================
// SECTION: Vendor Error Envelope
// ============================================================================

/// Error envelope some endpoints embed in an otherwise-200 body.
///
/// Bulk iteration treats this the same as an HTTP 401/429: abort further
/// sub-requests and record a marker per remaining item.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorEnvelope {
    /// Vendor status label (`error`, `fail`, or absent on success).
    pub status: Option<String>,
    /// Vendor message, when provided.
    pub message: Option<String>,
}

impl VendorEnvelope {
    /// Stable schema label for decode diagnostics.
    pub const SCHEMA: &'static str = "vendorEnvelope";

    /// Returns true when the envelope signals a vendor-side error.
    #[must_use]
    pub fn signals_error(&self) -> bool {
        matches!(self.status.as_deref(), Some("error" | "fail" | "rate_limited"))
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
    use storecheck_core::decode_payload;

    use super::*;

    #[test]
    fn login_response_decodes_camel_case() {
        let body = br#"{"accessToken":"a.b.c","refreshToken":"r.s.t","user":{"_id":"u1","name":"Asha","phone":"9999999999"}}"#;
        let login: LoginResponse = decode_payload(body, LoginResponse::SCHEMA)
            .unwrap_or_else(|err| panic!("login body must decode: {err}"));
        assert_eq!(login.access_token, "a.b.c");
        assert_eq!(login.refresh_token, "r.s.t");
        assert_eq!(login.user.and_then(|user| user.name), Some("Asha".to_string()));
    }

    #[test]
    fn tag_status_distinguishes_pending_from_done() {
        let pending = br#"{"status":"processing","tags":null}"#;
        let status: VideoTagStatusResponse =
            decode_payload(pending, VideoTagStatusResponse::SCHEMA)
                .unwrap_or_else(|err| panic!("pending body must decode: {err}"));
        assert!(!status.is_done());
        assert!(status.tags.is_null());

        let done = br#"{"status":"done","tags":{"labels":["saree","festive"],"confidence":0.93}}"#;
        let status: VideoTagStatusResponse = decode_payload(done, VideoTagStatusResponse::SCHEMA)
            .unwrap_or_else(|err| panic!("done body must decode: {err}"));
        assert!(status.is_done());
        let labels = status.tags.value().map(|bundle| bundle.labels.clone());
        assert_eq!(labels, Some(vec!["saree".to_string(), "festive".to_string()]));
    }

    #[test]
    fn first_live_entry_feeds_the_context() {
        let body = br#"{"data":[{"_id":"draft-1","live":false},{"_id":"live-1","title":"Silk","live":true}]}"#;
        let page: CatalogSearchResponse = decode_payload(body, CatalogSearchResponse::SCHEMA)
            .unwrap_or_else(|err| panic!("search body must decode: {err}"));
        assert_eq!(page.first_live().map(|entry| entry.id.as_str()), Some("live-1"));
    }

    #[test]
    fn vendor_envelope_detects_error_statuses() {
        let body = br#"{"status":"rate_limited","message":"slow down"}"#;
        let envelope: VendorEnvelope = decode_payload(body, VendorEnvelope::SCHEMA)
            .unwrap_or_else(|err| panic!("envelope must decode: {err}"));
        assert!(envelope.signals_error());

        let ok = br#"{"count":12}"#;
        let envelope: VendorEnvelope = decode_payload(ok, VendorEnvelope::SCHEMA)
            .unwrap_or_else(|err| panic!("success body must decode: {err}"));
        assert!(!envelope.signals_error());
    }
}
