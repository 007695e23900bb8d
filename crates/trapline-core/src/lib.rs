//! Capture-and-normalize pipeline for the trapline error-capture agent.
//!
//! This crate turns a raw error (message, code, file, line, optional stack
//! frames) plus ambient request state into a size-bounded, deterministic
//! [`ErrorEvent`] ready for delivery. It performs no network I/O; the
//! companion `trapline-client` crate owns the transport.

pub mod config;
pub mod context;
pub mod environment;
pub mod normalize;
pub mod payload;
pub mod sanitize;
pub mod severity;
pub mod trace;

// Re-export commonly used types
pub use config::{Config, ConfigError};
pub use context::{read_context, SourceContext};
pub use environment::{EnvironmentSnapshot, RequestEnv};
pub use normalize::{
    normalize, normalize_raw, ExceptionInfo, NormalizedError, RawError, RawFrame, ScalarError,
};
pub use payload::ErrorEvent;
pub use trace::{build_trace, StackFrame};

// Re-export external dependencies
pub use chrono;
pub use serde;
pub use serde_json;
pub use thiserror;
pub use tracing;
