// crates/storecheck-config/src/config.rs
// ============================================================================
// Module: Storecheck Configuration
// Description: Configuration loading and validation for the suite.
// Purpose: Provide strict, fail-closed config parsing with hard limits.
// Dependencies: serde, toml, url
// ============================================================================

//! ## Overview
//! Configuration is loaded from a TOML file with a strict size limit and
//! `deny_unknown_fields` on every section. Base URLs must parse with an
//! http(s) scheme, credentials must be non-empty, and timing values are
//! bounded. Environment variables may override the config path and the
//! base URLs; invalid environment values fail closed.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::env;
use std::fs;
use std::path::Path;
use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default configuration filename when no path is specified.
const DEFAULT_CONFIG_NAME: &str = "storecheck.toml";
/// Environment variable used to override the config path.
pub(crate) const CONFIG_ENV_VAR: &str = "STORECHECK_CONFIG";
/// Environment variable overriding the admin backend base URL.
pub(crate) const ADMIN_BASE_URL_ENV_VAR: &str = "STORECHECK_ADMIN_BASE_URL";
/// Environment variable overriding the buyer backend base URL.
pub(crate) const BUYER_BASE_URL_ENV_VAR: &str = "STORECHECK_BUYER_BASE_URL";
/// Maximum configuration file size in bytes.
pub(crate) const MAX_CONFIG_FILE_SIZE: u64 = 64 * 1024;
/// Minimum accepted response-time threshold in milliseconds.
pub(crate) const MIN_RESPONSE_TIME_MS: u64 = 1_000;
/// Maximum accepted response-time threshold in milliseconds.
pub(crate) const MAX_RESPONSE_TIME_MS: u64 = 120_000;
/// Default response-time threshold in milliseconds.
pub(crate) const DEFAULT_RESPONSE_TIME_MS: u64 = 20_000;
/// Default response-time threshold for slow endpoints in milliseconds.
pub(crate) const DEFAULT_SLOW_RESPONSE_TIME_MS: u64 = 40_000;
/// Maximum accepted throttle pause in milliseconds.
pub(crate) const MAX_THROTTLE_PAUSE_MS: u64 = 10_000;
/// Default cooperative pause between bulk sub-requests in milliseconds.
pub(crate) const DEFAULT_THROTTLE_PAUSE_MS: u64 = 1_000;
/// Default polling attempt budget for the video tag pipeline.
pub(crate) const DEFAULT_POLL_ATTEMPTS: u32 = 8;
/// Maximum accepted polling attempt budget.
pub(crate) const MAX_POLL_ATTEMPTS: u32 = 64;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
    /// The configuration file exceeds the size limit.
    #[error("config file {path} exceeds {MAX_CONFIG_FILE_SIZE} bytes")]
    TooLarge {
        /// Path of the oversized file.
        path: PathBuf,
    },
    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file {path}: {source}")]
    Parse {
        /// Path that failed to parse.
        path: PathBuf,
        /// Underlying TOML error.
        #[source]
        source: Box<toml::de::Error>,
    },
    /// A configuration value failed validation.
    #[error("invalid config value for `{key}`: {reason}")]
    Invalid {
        /// Dotted key of the offending value.
        key: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
    /// An environment override is not usable.
    #[error("invalid environment override `{name}`: {reason}")]
    Env {
        /// Name of the environment variable.
        name: &'static str,
        /// Why the value was rejected.
        reason: String,
    },
}

// ============================================================================
// SECTION: Auth Schemes
// ============================================================================

/// Authorization header scheme used by a backend.
///
/// # Invariants
/// - Labels are stable wire forms used in the `Authorization` header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthScheme {
    /// `Authorization: Bearer <token>` (admin backend).
    Bearer,
    /// `Authorization: JWT <token>` (buyer backend).
    Jwt,
}

impl AuthScheme {
    /// Returns the header prefix for this scheme.
    #[must_use]
    pub const fn header_prefix(self) -> &'static str {
        match self {
            Self::Bearer => "Bearer",
            Self::Jwt => "JWT",
        }
    }
}

// ============================================================================
// SECTION: Config Sections
// ============================================================================

/// Connection settings for one backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BackendConfig {
    /// Base URL of the backend, http(s) only.
    pub base_url: String,
    /// Authorization scheme the backend expects.
    pub auth_scheme: AuthScheme,
}

impl BackendConfig {
    /// Parses and returns the validated base URL.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] when the URL does not parse or
    /// does not use an http(s) scheme.
    pub fn parsed_base_url(&self, key: &'static str) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.base_url).map_err(|err| ConfigError::Invalid {
            key,
            reason: err.to_string(),
        })?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(ConfigError::Invalid {
                key,
                reason: format!("unsupported scheme `{}`", url.scheme()),
            });
        }
        Ok(url)
    }
}

/// Login credentials for the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CredentialsConfig {
    /// Login phone number.
    pub phone: String,
    /// One-time login code.
    pub one_time_code: String,
}

/// Timing thresholds for the suite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct TimingConfig {
    /// Default response-time threshold in milliseconds.
    pub response_time_ms: u64,
    /// Response-time threshold for slow endpoints in milliseconds.
    pub slow_response_time_ms: u64,
    /// Cooperative pause between bulk sub-requests in milliseconds.
    pub throttle_pause_ms: u64,
    /// Polling attempt budget for the video tag pipeline.
    pub poll_attempts: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            response_time_ms: DEFAULT_RESPONSE_TIME_MS,
            slow_response_time_ms: DEFAULT_SLOW_RESPONSE_TIME_MS,
            throttle_pause_ms: DEFAULT_THROTTLE_PAUSE_MS,
            poll_attempts: DEFAULT_POLL_ATTEMPTS,
        }
    }
}

impl TimingConfig {
    /// Returns the default response-time threshold as a duration.
    #[must_use]
    pub const fn response_time(&self) -> Duration {
        Duration::from_millis(self.response_time_ms)
    }

    /// Returns the slow-endpoint threshold as a duration.
    #[must_use]
    pub const fn slow_response_time(&self) -> Duration {
        Duration::from_millis(self.slow_response_time_ms)
    }

    /// Returns the throttle pause as a duration.
    #[must_use]
    pub const fn throttle_pause(&self) -> Duration {
        Duration::from_millis(self.throttle_pause_ms)
    }
}

/// Full suite configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SuiteConfig {
    /// Admin backend connection settings.
    pub admin: BackendConfig,
    /// Buyer backend connection settings.
    pub buyer: BackendConfig,
    /// Login credentials.
    pub credentials: CredentialsConfig,
    /// Timing thresholds; every field has a default.
    #[serde(default)]
    pub timings: TimingConfig,
}

impl SuiteConfig {
    /// Loads configuration from the default path or `STORECHECK_CONFIG`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized,
    /// unparsable, or fails validation.
    pub fn load() -> Result<Self, ConfigError> {
        let path = env::var_os(CONFIG_ENV_VAR)
            .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_NAME), PathBuf::from);
        Self::load_from(&path)
    }

    /// Loads configuration from an explicit path.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file is missing, oversized,
    /// unparsable, or fails validation.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let metadata = fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if metadata.len() > MAX_CONFIG_FILE_SIZE {
            return Err(ConfigError::TooLarge {
                path: path.to_path_buf(),
            });
        }
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Self = toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source: Box::new(source),
        })?;
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Applies environment overrides for the backend base URLs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Env`] when an override is set but empty or
    /// not valid UTF-8.
    fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Some(value) = read_env_strict(ADMIN_BASE_URL_ENV_VAR)? {
            self.admin.base_url = value;
        }
        if let Some(value) = read_env_strict(BUYER_BASE_URL_ENV_VAR)? {
            self.buyer.base_url = value;
        }
        Ok(())
    }

    /// Validates the full configuration, failing closed on any bad value.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Invalid`] naming the offending key.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let _ = self.admin.parsed_base_url("admin.base_url")?;
        let _ = self.buyer.parsed_base_url("buyer.base_url")?;
        if self.credentials.phone.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "credentials.phone",
                reason: "must not be empty".to_string(),
            });
        }
        if self.credentials.one_time_code.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "credentials.one_time_code",
                reason: "must not be empty".to_string(),
            });
        }
        validate_range(
            "timings.response_time_ms",
            self.timings.response_time_ms,
            MIN_RESPONSE_TIME_MS,
            MAX_RESPONSE_TIME_MS,
        )?;
        validate_range(
            "timings.slow_response_time_ms",
            self.timings.slow_response_time_ms,
            MIN_RESPONSE_TIME_MS,
            MAX_RESPONSE_TIME_MS,
        )?;
        if self.timings.slow_response_time_ms < self.timings.response_time_ms {
            return Err(ConfigError::Invalid {
                key: "timings.slow_response_time_ms",
                reason: "must be >= timings.response_time_ms".to_string(),
            });
        }
        if self.timings.throttle_pause_ms > MAX_THROTTLE_PAUSE_MS {
            return Err(ConfigError::Invalid {
                key: "timings.throttle_pause_ms",
                reason: format!("must be <= {MAX_THROTTLE_PAUSE_MS}"),
            });
        }
        if self.timings.poll_attempts == 0 || self.timings.poll_attempts > MAX_POLL_ATTEMPTS {
            return Err(ConfigError::Invalid {
                key: "timings.poll_attempts",
                reason: format!("must be in 1..={MAX_POLL_ATTEMPTS}"),
            });
        }
        Ok(())
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Validates that a value sits within an inclusive range.
fn validate_range(
    key: &'static str,
    value: u64,
    min: u64,
    max: u64,
) -> Result<(), ConfigError> {
    if value < min || value > max {
        return Err(ConfigError::Invalid {
            key,
            reason: format!("must be in {min}..={max}"),
        });
    }
    Ok(())
}

/// Reads an environment variable with strict UTF-8 and non-empty checks.
///
/// # Errors
///
/// Returns [`ConfigError::Env`] when the variable is set but empty,
/// whitespace, or not valid UTF-8.
fn read_env_strict(name: &'static str) -> Result<Option<String>, ConfigError> {
    match env::var_os(name) {
        None => Ok(None),
        Some(raw) => {
            let value = raw.into_string().map_err(|_| ConfigError::Env {
                name,
                reason: "must be valid UTF-8".to_string(),
            })?;
            if value.trim().is_empty() {
                return Err(ConfigError::Env {
                    name,
                    reason: "must not be empty".to_string(),
                });
            }
            Ok(Some(value))
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
    use std::io::Write;

    use super::*;

    const VALID: &str = r#"
[admin]
base_url = "https://admin.example.test"
auth_scheme = "bearer"

[buyer]
base_url = "https://buyer.example.test"
auth_scheme = "jwt"

[credentials]
phone = "9999999999"
one_time_code = "123456"
"#;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new()
            .unwrap_or_else(|err| panic!("create temp config: {err}"));
        file.write_all(contents.as_bytes())
            .unwrap_or_else(|err| panic!("write temp config: {err}"));
        file
    }

    #[test]
    fn valid_config_loads_with_default_timings() {
        let file = write_config(VALID);
        let config = SuiteConfig::load_from(file.path())
            .unwrap_or_else(|err| panic!("valid config must load: {err}"));
        assert_eq!(config.admin.auth_scheme, AuthScheme::Bearer);
        assert_eq!(config.buyer.auth_scheme, AuthScheme::Jwt);
        assert_eq!(config.timings.response_time_ms, DEFAULT_RESPONSE_TIME_MS);
        assert_eq!(config.timings.slow_response_time_ms, DEFAULT_SLOW_RESPONSE_TIME_MS);
    }

    #[test]
    fn unknown_keys_fail_closed() {
        let file = write_config(&format!("{VALID}\n[surprise]\nvalue = 1\n"));
        assert!(matches!(
            SuiteConfig::load_from(file.path()),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn non_http_scheme_is_rejected() {
        let contents = VALID.replace("https://admin.example.test", "ftp://admin.example.test");
        let file = write_config(&contents);
        let err = match SuiteConfig::load_from(file.path()) {
            Ok(_) => panic!("ftp scheme must be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("admin.base_url"));
    }

    #[test]
    fn empty_phone_is_rejected() {
        let contents = VALID.replace("9999999999", "  ");
        let file = write_config(&contents);
        let err = match SuiteConfig::load_from(file.path()) {
            Ok(_) => panic!("empty phone must be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("credentials.phone"));
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let file = write_config(&format!("{VALID}\n[timings]\nresponse_time_ms = 10\n"));
        let err = match SuiteConfig::load_from(file.path()) {
            Ok(_) => panic!("tiny threshold must be rejected"),
            Err(err) => err,
        };
        assert!(err.to_string().contains("timings.response_time_ms"));
    }

    #[test]
    fn slow_threshold_must_dominate_default() {
        let file = write_config(&format!(
            "{VALID}\n[timings]\nresponse_time_ms = 30000\nslow_response_time_ms = 20000\n"
        ));
        assert!(SuiteConfig::load_from(file.path()).is_err());
    }

    #[test]
    fn auth_scheme_prefixes_are_stable() {
        assert_eq!(AuthScheme::Bearer.header_prefix(), "Bearer");
        assert_eq!(AuthScheme::Jwt.header_prefix(), "JWT");
    }
}
