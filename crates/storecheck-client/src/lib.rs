// crates/storecheck-client/src/lib.rs
// ============================================================================
// Module: Storecheck Client Library
// Description: Public API surface for the HTTP client layer.
// Purpose: Expose the blocking client, endpoint catalog, and payload models.
// Dependencies: crate::{client, endpoints, models}
// ============================================================================

//! ## Overview
//! The client layer wraps a blocking HTTP client with per-call timing
//! capture and per-backend authorization schemes, and carries the endpoint
//! catalog and typed payload models for both backends under test. Every
//! round-trip produces a [`storecheck_core::CallRecord`] for the check
//! pipeline.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod client;
pub mod endpoints;
pub mod models;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use client::ApiClient;
pub use client::ClientError;
