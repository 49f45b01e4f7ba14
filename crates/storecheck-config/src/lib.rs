// crates/storecheck-config/src/lib.rs
// ============================================================================
// Module: Storecheck Configuration Library
// Description: Public API surface for suite configuration.
// Purpose: Expose strict, fail-closed configuration loading.
// Dependencies: crate::config
// ============================================================================

//! ## Overview
//! Configuration for the verification suite: base URLs and auth schemes
//! for the two backends, login credentials, and timing thresholds.
//! Configuration is loaded from a TOML file with strict limits; invalid or
//! unknown values fail closed rather than defaulting silently.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod config;

// ============================================================================
// SECTION: Re-Exports
// ============================================================================

pub use config::AuthScheme;
pub use config::BackendConfig;
pub use config::ConfigError;
pub use config::CredentialsConfig;
pub use config::SuiteConfig;
pub use config::TimingConfig;
