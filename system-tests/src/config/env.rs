// system-tests/src/config/env.rs
// ============================================================================
// Module: System Test Environment
// Description: Environment-backed configuration for system tests.
// Purpose: Centralize env parsing with strict UTF-8 validation.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Environment values are parsed with strict UTF-8 enforcement to avoid
//! silent misconfiguration. Invalid UTF-8 fails closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

// ============================================================================
// SECTION: Environment Constants
// ============================================================================

/// Environment keys for system test configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemTestEnv {
    /// Optional artifact run root override.
    RunRoot,
    /// Optional timeout override in seconds (positive integer).
    TimeoutSeconds,
    /// Optional external admin backend URL (skips the admin stub).
    ExternalAdminUrl,
    /// Optional external buyer backend URL (skips the buyer stub).
    ExternalBuyerUrl,
}

impl SystemTestEnv {
    /// Returns the canonical environment variable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RunRoot => "STORECHECK_SYSTEM_TEST_RUN_ROOT",
            Self::TimeoutSeconds => "STORECHECK_SYSTEM_TEST_TIMEOUT_SEC",
            Self::ExternalAdminUrl => "STORECHECK_SYSTEM_TEST_ADMIN_URL",
            Self::ExternalBuyerUrl => "STORECHECK_SYSTEM_TEST_BUYER_URL",
        }
    }
}

// ============================================================================
// SECTION: Config Types
// ============================================================================

/// Typed system test configuration derived from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SystemTestConfig {
    /// Optional artifact run root override.
    pub run_root: Option<PathBuf>,
    /// Optional timeout override in seconds (positive integer).
    pub timeout: Option<Duration>,
    /// Optional external admin backend URL.
    pub external_admin_url: Option<String>,
    /// Optional external buyer backend URL.
    pub external_buyer_url: Option<String>,
}

impl SystemTestConfig {
    /// Loads configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error when an environment value is not valid UTF-8, is
    /// empty, or fails validation (for example, an invalid timeout).
    pub fn load() -> Result<Self, String> {
        let run_root = read_env_nonempty(SystemTestEnv::RunRoot.as_str())?.map(PathBuf::from);
        let timeout = read_env_nonempty(SystemTestEnv::TimeoutSeconds.as_str())?
            .map(|value| parse_timeout_seconds(SystemTestEnv::TimeoutSeconds.as_str(), &value))
            .transpose()?;
        let external_admin_url = read_env_nonempty(SystemTestEnv::ExternalAdminUrl.as_str())?;
        let external_buyer_url = read_env_nonempty(SystemTestEnv::ExternalBuyerUrl.as_str())?;
        Ok(Self {
            run_root,
            timeout,
            external_admin_url,
            external_buyer_url,
        })
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Reads an environment variable and enforces UTF-8 validity.
///
/// # Errors
///
/// Returns an error when the environment variable contains invalid UTF-8.
pub fn read_env_strict(name: &str) -> Result<Option<String>, String> {
    std::env::var_os(name).map_or(Ok(None), |raw| {
        raw.into_string().map(Some).map_err(|_| format!("{name} must be valid UTF-8"))
    })
}

/// Reads an environment variable and rejects empty values.
///
/// # Errors
///
/// Returns an error when the variable is set but empty or whitespace.
fn read_env_nonempty(name: &str) -> Result<Option<String>, String> {
    match read_env_strict(name)? {
        None => Ok(None),
        Some(value) if value.trim().is_empty() => {
            Err(format!("{name} must not be empty when set"))
        }
        Some(value) => Ok(Some(value)),
    }
}

/// Parses a positive-integer seconds value into a duration.
///
/// # Errors
///
/// Returns an error when the value is not a positive integer.
pub(crate) fn parse_timeout_seconds(name: &str, raw: &str) -> Result<Duration, String> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("{name} must be a positive integer number of seconds"))?;
    if secs == 0 {
        return Err(format!("{name} must be greater than zero"));
    }
    Ok(Duration::from_secs(secs))
}
