//! Raw-error shapes and the error normalizer.
//!
//! Hosts observe errors in two shapes: a structured exception-like object
//! carrying an optional stack trace, or the bare scalars an error-handler
//! callback receives. Both are loosely typed on purpose; normalization
//! coerces every field with safe defaults so a malformed error can never
//! crash the capture pipeline.

use serde_json::Value;

use crate::sanitize::{truncate_chars, SCALAR_LIMIT};
use crate::severity;

/// One entry of a host-supplied stack trace, before coercion.
#[derive(Debug, Clone, Default)]
pub struct RawFrame {
    pub file: Value,
    pub line: Value,
    pub function: Value,
}

impl RawFrame {
    pub fn new(file: impl Into<Value>, line: impl Into<Value>, function: impl Into<Value>) -> Self {
        Self {
            file: file.into(),
            line: line.into(),
            function: function.into(),
        }
    }
}

/// An exception-like error: the full shape a caught exception exposes.
#[derive(Debug, Clone, Default)]
pub struct ExceptionInfo {
    pub message: Value,
    pub code: Value,
    pub file: Value,
    pub line: Value,
    pub trace: Option<Vec<RawFrame>>,
}

impl ExceptionInfo {
    pub fn new(
        message: impl Into<Value>,
        code: impl Into<Value>,
        file: impl Into<Value>,
        line: impl Into<Value>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            file: file.into(),
            line: line.into(),
            trace: None,
        }
    }

    pub fn with_trace(mut self, trace: Vec<RawFrame>) -> Self {
        self.trace = Some(trace);
        self
    }
}

/// A scalar error: the four values an error-handler callback observes.
#[derive(Debug, Clone, Default)]
pub struct ScalarError {
    pub message: Value,
    pub code: Value,
    pub file: Value,
    pub line: Value,
}

impl ScalarError {
    pub fn new(
        message: impl Into<Value>,
        code: impl Into<Value>,
        file: impl Into<Value>,
        line: impl Into<Value>,
    ) -> Self {
        Self {
            message: message.into(),
            code: code.into(),
            file: file.into(),
            line: line.into(),
        }
    }
}

/// Tagged union over the raw error shapes a host can hand to `capture`.
#[derive(Debug, Clone)]
pub enum RawError {
    Exception(ExceptionInfo),
    Scalar(ScalarError),
}

impl RawError {
    /// The raw, pre-normalization severity code.
    pub fn code(&self) -> &Value {
        match self {
            RawError::Exception(info) => &info.code,
            RawError::Scalar(err) => &err.code,
        }
    }
}

impl From<ExceptionInfo> for RawError {
    fn from(info: ExceptionInfo) -> Self {
        RawError::Exception(info)
    }
}

impl From<ScalarError> for RawError {
    fn from(err: ScalarError) -> Self {
        RawError::Scalar(err)
    }
}

/// Canonical error form produced by [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedError {
    /// Coerced to a string and capped at the scalar ceiling.
    pub message: String,
    /// Symbolic name for known severity codes, raw value otherwise.
    pub code: Value,
    pub file: String,
    /// Always at least 1.
    pub line: u32,
}

/// Coerces raw message/code/file/line into canonical form.
pub fn normalize(message: Value, code: Value, file: Value, line: Value) -> NormalizedError {
    let message = coerce_string(message);
    NormalizedError {
        message: truncate_chars(&message, SCALAR_LIMIT).into_owned(),
        code: severity::symbolic_code(code),
        file: coerce_string(file),
        line: coerce_line(line),
    }
}

/// Normalizes either raw-error shape, yielding the canonical error plus the
/// supplied trace when the shape carried one.
pub fn normalize_raw(raw: RawError) -> (NormalizedError, Option<Vec<RawFrame>>) {
    match raw {
        RawError::Exception(info) => (
            normalize(info.message, info.code, info.file, info.line),
            info.trace,
        ),
        RawError::Scalar(err) => (normalize(err.message, err.code, err.file, err.line), None),
    }
}

/// Null becomes empty, strings pass through, any other JSON value is
/// rendered as its compact text form.
pub(crate) fn coerce_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Coerces to an integer line number, clamped to at least 1. Numeric strings
/// parse; anything unparseable falls back to 1.
pub(crate) fn coerce_line(value: Value) -> u32 {
    let line = match &value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        Value::String(s) => s.trim().parse::<f64>().map(|f| f as i64).unwrap_or(0),
        _ => 0,
    };
    line.clamp(1, i64::from(u32::MAX)) as u32
}
