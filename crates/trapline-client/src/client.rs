//! Capture entry point and delivery client.
//!
//! One capture call runs the whole pipeline synchronously: normalize, build
//! the trace, snapshot the environment, assemble the event and POST it. The
//! call blocks for at most one bounded source read per frame plus one
//! network call capped by [`DELIVERY_TIMEOUT`].

use std::time::Duration;

use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use trapline_core::{
    build_trace, normalize_raw, Config, EnvironmentSnapshot, ErrorEvent, RawError, RequestEnv,
};

/// Fixed timeout for the delivery POST.
pub const DELIVERY_TIMEOUT: Duration = Duration::from_secs(10);

/// Route under the configured endpoint that receives error events.
const ERROR_ROUTE: &str = "client/error";

const CONTENT_TYPE: &str = "application/json; charset=UTF-8";

#[derive(Error, Debug)]
pub enum DeliveryError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("payload serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Synchronous error-capture client.
///
/// Holds the immutable configuration and a reusable blocking HTTP client.
/// Construct once at startup, after [`Config::new`] has validated the
/// settings, and share across the process.
pub struct Client {
    config: Config,
    http: reqwest::blocking::Client,
    request_env: RequestEnv,
}

impl Client {
    pub fn new(config: Config) -> Self {
        let http = reqwest::blocking::Client::builder()
            .timeout(DELIVERY_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            config,
            http,
            request_env: RequestEnv::default(),
        }
    }

    /// Sets the ambient request state snapshotted into every event captured
    /// through this client.
    pub fn with_request_env(mut self, env: RequestEnv) -> Self {
        self.request_env = env;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Captures one error and delivers it.
    ///
    /// Returns `Ok(false)` without side effects when `error` is absent.
    /// A transport failure surfaces as `Err` only when the configuration
    /// shows transport errors; otherwise it is logged and swallowed and the
    /// capture still reports `Ok(true)`.
    pub fn capture(
        &self,
        error: Option<RawError>,
        custom_error_id: Option<String>,
        custom_params: Option<Value>,
    ) -> Result<bool, DeliveryError> {
        self.capture_with_env(error, &self.request_env, custom_error_id, custom_params)
    }

    /// [`Client::capture`] with explicit per-call request state, for hosts
    /// that serve many requests through one shared client.
    pub fn capture_with_env(
        &self,
        error: Option<RawError>,
        env: &RequestEnv,
        custom_error_id: Option<String>,
        custom_params: Option<Value>,
    ) -> Result<bool, DeliveryError> {
        let Some(raw) = error else {
            return Ok(false);
        };

        let (normalized, raw_trace) = normalize_raw(raw);
        let stack_trace = build_trace(&normalized, raw_trace.as_deref());
        let snapshot = EnvironmentSnapshot::collect(env);
        let event = ErrorEvent::assemble(
            &self.config,
            normalized,
            stack_trace,
            snapshot,
            custom_error_id,
            custom_params,
        );

        match self.deliver(&event) {
            Ok(()) => Ok(true),
            Err(err) if !self.config.shows_transport_errors() => {
                warn!(%err, "error delivery failed, swallowed by configuration");
                Ok(true)
            }
            Err(err) => Err(err),
        }
    }

    /// Issues the single synchronous POST for one assembled event.
    fn deliver(&self, event: &ErrorEvent) -> Result<(), DeliveryError> {
        let url = format!("{}{}", self.config.endpoint(), ERROR_ROUTE);
        let body = serde_json::to_vec(event)?;

        let response = self
            .http
            .post(&url)
            .header(reqwest::header::CONTENT_TYPE, CONTENT_TYPE)
            .body(body)
            .send()?;
        response.error_for_status()?;

        debug!(url, "error event delivered");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;
    use serde_json::{json, Map};
    use std::io::Write;
    use tempfile::NamedTempFile;
    use trapline_core::ExceptionInfo;

    fn client_for(endpoint: &str) -> Client {
        Client::new(Config::new(endpoint, "k1", "u1", Map::new()).unwrap())
    }

    fn source_fixture() -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        for i in 1..=20 {
            writeln!(file, "source line {i}").unwrap();
        }
        file
    }

    #[test]
    fn absent_error_is_a_no_op() {
        let mut server = mockito::Server::new();
        let mock = server.mock("POST", "/api/client/error").expect(0).create();

        let client = client_for(&server.url());
        let result = client.capture(None, None, None).unwrap();

        assert!(!result);
        mock.assert();
    }

    #[test]
    fn captured_error_is_posted_with_normalized_fields() {
        let source = source_fixture();
        let path = source.path().to_str().unwrap().to_string();

        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/client/error")
            .match_header("content-type", "application/json; charset=UTF-8")
            .match_body(Matcher::PartialJson(json!({
                "api_key": "k1",
                "client": {"name": "rust-client"},
                "error": {
                    "message": "boom",
                    "code": "E_WARNING",
                    "stack_trace": [{"line": 10, "file_name": path, "method_name": ""}],
                },
                "user": {"uid": "u1"},
            })))
            .with_status(200)
            .create();

        let client = client_for(&server.url());
        let error = RawError::from(ExceptionInfo::new("boom", 2, path.as_str(), 10));
        let result = client.capture(Some(error), None, None).unwrap();

        assert!(result);
        mock.assert();
    }

    #[test]
    fn oversized_message_is_delivered_truncated() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/client/error")
            .match_body(Matcher::PartialJson(json!({
                "error": {"message": "x".repeat(2048)},
            })))
            .with_status(200)
            .create();

        let client = client_for(&server.url());
        let error = RawError::from(ExceptionInfo::new("x".repeat(3000), 1, "/a.rs", 1));
        assert!(client.capture(Some(error), None, None).unwrap());
        mock.assert();
    }

    #[test]
    fn transport_failure_surfaces_by_default() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/client/error")
            .with_status(500)
            .create();

        let client = client_for(&server.url());
        let error = RawError::from(ExceptionInfo::new("boom", 1, "/a.rs", 1));
        let result = client.capture(Some(error), None, None);

        assert!(matches!(result, Err(DeliveryError::Transport(_))));
    }

    #[test]
    fn transport_failure_is_swallowed_when_configured() {
        let mut server = mockito::Server::new();
        server
            .mock("POST", "/api/client/error")
            .with_status(500)
            .create();

        let config = Config::new(server.url(), "k1", "u1", Map::new())
            .unwrap()
            .show_transport_errors(false);
        let client = Client::new(config);

        let error = RawError::from(ExceptionInfo::new("boom", 1, "/a.rs", 1));
        assert!(client.capture(Some(error), None, None).unwrap());
    }

    #[test]
    fn unreachable_endpoint_is_swallowed_when_configured() {
        // Port 9 (discard) is closed on test machines; the connection fails
        // before any HTTP exchange.
        let config = Config::new("http://127.0.0.1:9", "k1", "u1", Map::new())
            .unwrap()
            .show_transport_errors(false);
        let client = Client::new(config);

        let error = RawError::from(ExceptionInfo::new("boom", 1, "/a.rs", 1));
        assert!(client.capture(Some(error), None, None).unwrap());
    }

    #[test]
    fn per_call_request_env_reaches_the_payload() {
        let mut server = mockito::Server::new();
        let mock = server
            .mock("POST", "/api/client/error")
            .match_body(Matcher::PartialJson(json!({
                "request": {
                    "http_method": "POST",
                    "client_headers": {"HTTP_FOO": "1"},
                },
            })))
            .with_status(200)
            .create();

        let client = client_for(&server.url());

        let mut serve_vars = Map::new();
        serve_vars.insert("REQUEST_METHOD".to_string(), json!("POST"));
        serve_vars.insert("HTTP_FOO".to_string(), json!("1"));
        serve_vars.insert("OTHER".to_string(), json!("2"));
        let env = RequestEnv {
            server: serve_vars,
            ..Default::default()
        };

        let error = RawError::from(ExceptionInfo::new("boom", 1, "/a.rs", 1));
        assert!(client
            .capture_with_env(Some(error), &env, None, None)
            .unwrap());
        mock.assert();
    }
}
