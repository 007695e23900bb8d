//! Final event payload.
//!
//! Merges configuration identity, the normalized error and trace, the
//! environment snapshot, a timestamp and caller-supplied custom fields into
//! the single immutable [`ErrorEvent`] that goes on the wire.

use chrono::Local;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::config::Config;
use crate::environment::EnvironmentSnapshot;
use crate::normalize::NormalizedError;
use crate::trace::StackFrame;

/// RFC-2822-like timestamp layout, e.g. `Thu Aug 28 2026 14:03:21 +0200`.
pub const DATE_FORMAT: &str = "%a %b %d %Y %H:%M:%S %z";

#[derive(Debug, Clone, Serialize)]
pub struct ClientInfo {
    pub name: String,
    pub version: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDetails {
    pub message: String,
    pub stack_trace: Vec<StackFrame>,
    pub code: Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestHeaders {
    pub user_agent: String,
    pub referrer: String,
    pub host: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RequestDetails {
    pub url: String,
    pub query_string: Map<String, Value>,
    pub http_method: String,
    pub post: Map<String, Value>,
    pub session: Map<String, Value>,
    pub cookies: Map<String, Value>,
    pub files: Map<String, Value>,
    pub client_headers: Map<String, Value>,
    pub headers: RequestHeaders,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user_ip: String,
    pub uid: String,
    pub user_params: Map<String, Value>,
}

/// One fully assembled error event. Built once per capture, never mutated,
/// sent exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEvent {
    pub api_key: String,
    pub client: ClientInfo,
    pub date: String,
    pub error: ErrorDetails,
    pub request: RequestDetails,
    pub user: UserInfo,
    pub custom_error_id: Option<String>,
    pub custom_params: Option<Value>,
}

impl ErrorEvent {
    /// Merges all capture inputs into the final payload, stamped with the
    /// current local time.
    pub fn assemble(
        config: &Config,
        error: NormalizedError,
        stack_trace: Vec<StackFrame>,
        env: EnvironmentSnapshot,
        custom_error_id: Option<String>,
        custom_params: Option<Value>,
    ) -> Self {
        Self {
            api_key: config.api_key().to_string(),
            client: ClientInfo {
                name: config.client_name().to_string(),
                version: config.client_version().to_string(),
            },
            date: Local::now().format(DATE_FORMAT).to_string(),
            error: ErrorDetails {
                message: error.message,
                stack_trace,
                code: error.code,
            },
            request: RequestDetails {
                url: env.url,
                query_string: env.query_string,
                http_method: env.http_method,
                post: env.post,
                session: env.session,
                cookies: env.cookies,
                files: env.files,
                client_headers: env.client_headers,
                headers: RequestHeaders {
                    user_agent: env.user_agent,
                    referrer: env.referrer,
                    host: env.host,
                },
            },
            user: UserInfo {
                user_ip: env.remote_ip,
                uid: config.user_id().to_string(),
                user_params: config.user_params().clone(),
            },
            custom_error_id,
            custom_params,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::trace::build_trace;
    use chrono::DateTime;
    use serde_json::{json, Map};

    fn test_config() -> Config {
        let mut params = Map::new();
        params.insert("email".to_string(), json!("dev@example.com"));
        Config::new("https://collect.example.com", "k1", "u1", params).unwrap()
    }

    fn test_event() -> ErrorEvent {
        let error = normalize(json!("boom"), json!(2), json!("/tmp/a.rs"), json!(10));
        let trace = build_trace(&error, None);
        ErrorEvent::assemble(
            &test_config(),
            error,
            trace,
            EnvironmentSnapshot::default(),
            Some("custom-1".to_string()),
            Some(json!({"tag": "checkout"})),
        )
    }

    #[test]
    fn payload_carries_the_original_wire_layout() {
        let value = serde_json::to_value(test_event()).unwrap();

        assert_eq!(value["api_key"], "k1");
        assert_eq!(value["client"]["name"], "rust-client");
        assert_eq!(value["error"]["message"], "boom");
        assert_eq!(value["error"]["code"], "E_WARNING");
        assert_eq!(value["error"]["stack_trace"][0]["line"], 10);
        assert_eq!(value["error"]["stack_trace"][0]["file_name"], "/tmp/a.rs");
        assert_eq!(value["error"]["stack_trace"][0]["args"], json!([]));
        assert_eq!(value["user"]["uid"], "u1");
        assert_eq!(value["user"]["user_params"]["email"], "dev@example.com");
        assert_eq!(value["custom_error_id"], "custom-1");
        assert_eq!(value["custom_params"]["tag"], "checkout");

        let request = value["request"].as_object().unwrap();
        for key in [
            "url",
            "query_string",
            "http_method",
            "post",
            "session",
            "cookies",
            "files",
            "client_headers",
            "headers",
        ] {
            assert!(request.contains_key(key), "missing request.{key}");
        }
    }

    #[test]
    fn absent_custom_fields_serialize_as_null() {
        let error = normalize(json!("boom"), json!(1), json!(""), json!(1));
        let event = ErrorEvent::assemble(
            &test_config(),
            error.clone(),
            build_trace(&error, None),
            EnvironmentSnapshot::default(),
            None,
            None,
        );

        let value = serde_json::to_value(event).unwrap();
        assert_eq!(value["custom_error_id"], Value::Null);
        assert_eq!(value["custom_params"], Value::Null);
    }

    #[test]
    fn date_uses_the_offset_bearing_format() {
        let event = test_event();
        let parsed = DateTime::parse_from_str(&event.date, DATE_FORMAT);
        assert!(parsed.is_ok(), "unparseable date: {}", event.date);
    }
}
