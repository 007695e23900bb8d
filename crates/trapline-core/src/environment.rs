//! Environment snapshot collector.
//!
//! Captures query/body/cookie/session/upload/header state from the ambient
//! request, bounded by the sanitizer ceilings. The ambient state itself is
//! host-supplied: a middleware host fills a [`RequestEnv`] per request, a
//! CLI host leaves the default empty one.

use serde_json::{Map, Value};

use crate::normalize::coerce_string;
use crate::sanitize::{sanitize_map, truncate_chars, NESTED_LIMIT, SCALAR_LIMIT};

/// Conventional prefix carried by inbound client headers in CGI-style
/// server variables (`HTTP_USER_AGENT`, `HTTP_HOST`, ...).
pub const CLIENT_HEADER_PREFIX: &str = "HTTP_";

/// Ambient request state as the host observes it.
///
/// `server` holds CGI-style variables: `SERVER_PROTOCOL`, `HTTP_HOST`,
/// `SCRIPT_NAME`, `REQUEST_METHOD`, `HTTP_USER_AGENT`, `HTTP_REFERER`,
/// `REMOTE_ADDR`, plus the `HTTP_*` client headers.
#[derive(Debug, Clone, Default)]
pub struct RequestEnv {
    pub query: Option<Map<String, Value>>,
    pub post: Option<Map<String, Value>>,
    pub cookies: Option<Map<String, Value>>,
    pub session: Option<Map<String, Value>>,
    pub files: Option<Map<String, Value>>,
    pub server: Map<String, Value>,
}

/// Sanitized request/environment state attached to every event.
#[derive(Debug, Clone, Default)]
pub struct EnvironmentSnapshot {
    pub query_string: Map<String, Value>,
    pub post: Map<String, Value>,
    pub cookies: Map<String, Value>,
    pub session: Map<String, Value>,
    pub files: Map<String, Value>,
    pub client_headers: Map<String, Value>,
    pub url: String,
    pub http_method: String,
    pub user_agent: String,
    pub referrer: String,
    pub host: String,
    pub remote_ip: String,
}

impl EnvironmentSnapshot {
    /// Collects and sanitizes the ambient request state.
    pub fn collect(env: &RequestEnv) -> Self {
        let host = scalar(&env.server, "HTTP_HOST");
        let script = scalar(&env.server, "SCRIPT_NAME");
        let scheme = if scalar(&env.server, "SERVER_PROTOCOL")
            .to_lowercase()
            .contains("https")
        {
            "https"
        } else {
            "http"
        };
        let url = truncate_chars(&format!("{scheme}://{host}{script}"), SCALAR_LIMIT).into_owned();

        Self {
            query_string: container(&env.query),
            post: container(&env.post),
            cookies: container(&env.cookies),
            session: container(&env.session),
            files: container(&env.files),
            client_headers: client_headers(&env.server),
            url,
            http_method: scalar(&env.server, "REQUEST_METHOD"),
            user_agent: scalar(&env.server, "HTTP_USER_AGENT"),
            referrer: scalar(&env.server, "HTTP_REFERER"),
            host,
            remote_ip: scalar(&env.server, "REMOTE_ADDR"),
        }
    }
}

/// Absent container yields an empty map; a present one is sanitized at the
/// nested ceiling.
fn container(var: &Option<Map<String, Value>>) -> Map<String, Value> {
    match var {
        Some(map) => sanitize_map(map.clone(), NESTED_LIMIT),
        None => Map::new(),
    }
}

/// Only entries whose key carries the inbound-header prefix.
fn client_headers(server: &Map<String, Value>) -> Map<String, Value> {
    let filtered: Map<String, Value> = server
        .iter()
        .filter(|(key, _)| key.starts_with(CLIENT_HEADER_PREFIX))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();
    sanitize_map(filtered, NESTED_LIMIT)
}

/// A single server variable as a string, capped at the scalar ceiling.
/// Missing variables yield the empty string.
fn scalar(server: &Map<String, Value>, key: &str) -> String {
    match server.get(key) {
        Some(value) => truncate_chars(&coerce_string(value.clone()), SCALAR_LIMIT).into_owned(),
        None => String::new(),
    }
}
