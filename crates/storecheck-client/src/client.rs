// crates/storecheck-client/src/client.rs
// ============================================================================
// Module: Storecheck API Client
// Description: Blocking HTTP wrapper with timing capture and auth schemes.
// Purpose: Turn round-trips into call records for the check pipeline.
// Dependencies: reqwest, storecheck-config, storecheck-core, url
// ============================================================================

//! ## Overview
//! One client instance serves one backend: it owns the backend's base URL,
//! authorization scheme, and timeout. Every request captures status,
//! content type, body bytes, and elapsed wall time into a
//! [`CallRecord`]. Transport failures (connect errors, client-side
//! timeouts) are fatal for the calling step and are never retried.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::time::Duration;
use std::time::Instant;

use reqwest::blocking::Client;
use reqwest::blocking::RequestBuilder;
use serde::Serialize;
use storecheck_config::AuthScheme;
use storecheck_config::BackendConfig;
use storecheck_core::CallRecord;
use storecheck_core::StepError;
use thiserror::Error;
use url::Url;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Default hard timeout for the full request lifecycle.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
/// User agent sent with every request.
const USER_AGENT: &str = "storecheck/0.1";

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Error raised by the HTTP client layer.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    Build(String),
    /// A request path did not join onto the base URL.
    #[error("invalid endpoint path `{path}`: {reason}")]
    Path {
        /// The offending path.
        path: String,
        /// Why the join failed.
        reason: String,
    },
    /// The round-trip failed at the transport level (no retry).
    #[error("transport failure for {endpoint}: {source}")]
    Transport {
        /// Endpoint under test, for attribution.
        endpoint: String,
        /// Underlying transport error.
        #[source]
        source: reqwest::Error,
    },
}

impl From<ClientError> for StepError {
    fn from(err: ClientError) -> Self {
        Self::Transport(err.to_string())
    }
}

// ============================================================================
// SECTION: API Client
// ============================================================================

/// Blocking HTTP client bound to one backend.
///
/// # Invariants
/// - The authorization scheme is fixed per backend (`Bearer` admin,
///   `JWT` buyer); tokens are supplied per call from the run context.
/// - Elapsed time wraps the full blocking round-trip including body read.
#[derive(Debug, Clone)]
pub struct ApiClient {
    /// Base URL of the backend.
    base_url: Url,
    /// Authorization scheme the backend expects.
    auth_scheme: AuthScheme,
    /// Underlying blocking client.
    client: Client,
}

impl ApiClient {
    /// Creates a client for one backend with the default timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the
    /// underlying client cannot be built.
    pub fn new(config: &BackendConfig) -> Result<Self, ClientError> {
        Self::with_timeout(config, DEFAULT_TIMEOUT)
    }

    /// Creates a client for one backend with an explicit timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] when the base URL is invalid or the
    /// underlying client cannot be built.
    pub fn with_timeout(config: &BackendConfig, timeout: Duration) -> Result<Self, ClientError> {
        let base_url = config
            .parsed_base_url("base_url")
            .map_err(|err| ClientError::Build(err.to_string()))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|err| ClientError::Build(err.to_string()))?;
        Ok(Self {
            base_url,
            auth_scheme: config.auth_scheme,
            client,
        })
    }

    /// Returns the backend base URL.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Issues a GET request with query parameters.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on path or transport failures.
    pub fn get(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<CallRecord, ClientError> {
        let url = self.join(path)?;
        let request = self.client.get(url).query(query);
        self.send(path, request, token)
    }

    /// Issues a POST request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on path or transport failures.
    pub fn post_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<CallRecord, ClientError> {
        let url = self.join(path)?;
        let request = self.client.post(url).json(body);
        self.send(path, request, token)
    }

    /// Issues a PUT request with a JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError`] on path or transport failures.
    pub fn put_json<T: Serialize>(
        &self,
        path: &str,
        body: &T,
        token: Option<&str>,
    ) -> Result<CallRecord, ClientError> {
        let url = self.join(path)?;
        let request = self.client.put(url).json(body);
        self.send(path, request, token)
    }

    /// Joins an endpoint path onto the base URL.
    fn join(&self, path: &str) -> Result<Url, ClientError> {
        self.base_url.join(path).map_err(|err| ClientError::Path {
            path: path.to_string(),
            reason: err.to_string(),
        })
    }

    /// Sends the request, attaching authorization, and captures the record.
    fn send(
        &self,
        endpoint: &str,
        mut request: RequestBuilder,
        token: Option<&str>,
    ) -> Result<CallRecord, ClientError> {
        if let Some(token) = token {
            request = request
                .header("Authorization", format!("{} {token}", self.auth_scheme.header_prefix()));
        }
        let started = Instant::now();
        let response = request.send().map_err(|source| ClientError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;
        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .map_err(|source| ClientError::Transport {
                endpoint: endpoint.to_string(),
                source,
            })?
            .to_vec();
        let elapsed = started.elapsed();
        Ok(CallRecord::new(status, body, content_type, elapsed))
    }
}
