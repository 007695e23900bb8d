//! Immutable capture configuration.
//!
//! Configuration is built exactly once, validated up front, and injected into
//! the client at construction. There is no process-wide mutable state; a host
//! that needs configure-once semantics constructs one [`Config`] at startup
//! and shares the client built from it.

use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

/// Client identity reported in every delivered event.
pub const CLIENT_NAME: &str = "rust-client";
pub const CLIENT_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Fixed API suffix appended to the collection endpoint.
const API_SUFFIX: &str = "/api/";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("empty endpoint param")]
    EmptyEndpoint,

    #[error("empty api_key param")]
    EmptyApiKey,

    #[error("invalid endpoint URL: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
}

/// Validated, immutable configuration for the capture pipeline.
#[derive(Debug, Clone)]
pub struct Config {
    endpoint: Url,
    api_key: String,
    user_id: String,
    user_params: Map<String, Value>,
    show_transport_errors: bool,
    client_name: String,
    client_version: String,
}

impl Config {
    /// Builds a configuration from the host-supplied settings.
    ///
    /// Fails if `endpoint` or `api_key` is empty. The endpoint is normalized
    /// by trimming trailing slashes and appending the fixed API suffix, so
    /// `https://example.com/` becomes `https://example.com/api/`.
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        user_id: impl Into<String>,
        user_params: Map<String, Value>,
    ) -> Result<Self, ConfigError> {
        let endpoint = endpoint.into();
        let api_key = api_key.into();

        if endpoint.is_empty() {
            return Err(ConfigError::EmptyEndpoint);
        }
        if api_key.is_empty() {
            return Err(ConfigError::EmptyApiKey);
        }

        let normalized = format!("{}{}", endpoint.trim_end_matches('/'), API_SUFFIX);
        let endpoint = Url::parse(&normalized)?;

        Ok(Self {
            endpoint,
            api_key,
            user_id: user_id.into(),
            user_params,
            show_transport_errors: true,
            client_name: CLIENT_NAME.to_string(),
            client_version: CLIENT_VERSION.to_string(),
        })
    }

    /// Whether transport-level delivery failures are surfaced to the caller
    /// (default) or swallowed.
    pub fn show_transport_errors(mut self, show: bool) -> Self {
        self.show_transport_errors = show;
        self
    }

    /// Normalized collection endpoint, ending in the API suffix.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    pub fn user_params(&self) -> &Map<String, Value> {
        &self.user_params
    }

    pub fn shows_transport_errors(&self) -> bool {
        self.show_transport_errors
    }

    pub fn client_name(&self) -> &str {
        &self.client_name
    }

    pub fn client_version(&self) -> &str {
        &self.client_version
    }
}
