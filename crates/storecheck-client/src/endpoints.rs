// crates/storecheck-client/src/endpoints.rs
// ============================================================================
// Module: Storecheck Endpoint Catalog
// Description: Endpoint paths for the admin and buyer backends.
// Purpose: Keep exercised paths in one place with stable labels.
// Dependencies: std
// ============================================================================

//! ## Overview
//! The suite exercises a fixed catalog of endpoints. Paths are relative to
//! each backend's base URL; parametric paths are built by the helper
//! functions. Labels double as the endpoint attribution in check failures.

// ============================================================================
// SECTION: Admin Backend
// ============================================================================

/// Endpoints of the catalog admin backend.
pub mod admin {
    /// Login with phone number and one-time code.
    pub const LOGIN: &str = "api/v1/auth/login";
    /// Catalog search with query parameters.
    pub const CATALOG_SEARCH: &str = "api/v1/catalog/search";
    /// Video upload registration.
    pub const VIDEO_REGISTER: &str = "api/v1/videos";

    /// Returns the edit path for one catalog entry.
    #[must_use]
    pub fn catalog_edit(catalog_id: &str) -> String {
        format!("api/v1/catalog/{catalog_id}")
    }

    /// Returns the tag-status polling path for one video.
    #[must_use]
    pub fn video_tag_status(video_id: &str) -> String {
        format!("api/v1/videos/{video_id}/tags/status")
    }

    /// Returns the final tag listing path for one video.
    #[must_use]
    pub fn video_tags(video_id: &str) -> String {
        format!("api/v1/videos/{video_id}/tags")
    }
}

// ============================================================================
// SECTION: Buyer Backend
// ============================================================================

/// Endpoints of the buyer app backend.
pub mod buyer {
    /// Login with phone number and one-time code.
    pub const LOGIN: &str = "api/v1/auth/login";
    /// Collection listing.
    pub const COLLECTIONS: &str = "api/v1/collections";
    /// Search with query parameters.
    pub const SEARCH: &str = "api/v1/search";
    /// Buyer profile.
    pub const PROFILE: &str = "api/v1/profile";

    /// Returns the product-count path for one collection.
    #[must_use]
    pub fn collection_count(collection_id: &str) -> String {
        format!("api/v1/collections/{collection_id}/count")
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================
