//! Fixed severity-code enumeration.
//!
//! Known integer codes map to their symbolic names; anything else passes
//! through verbatim as a custom code.

use serde_json::Value;

/// Codes that indicate an unrecoverable condition, used by the termination
/// hook to decide whether the last error is worth reporting.
pub const FATAL_CODES: &[i64] = &[1, 4, 16, 64];

/// Returns the symbolic name for a known integer severity code.
pub fn symbolic_name(code: i64) -> Option<&'static str> {
    match code {
        1 => Some("E_ERROR"),
        2 => Some("E_WARNING"),
        4 => Some("E_PARSE"),
        8 => Some("E_NOTICE"),
        16 => Some("E_CORE_ERROR"),
        32 => Some("E_CORE_WARNING"),
        64 => Some("E_COMPILE_ERROR"),
        128 => Some("E_COMPILE_WARNING"),
        256 => Some("E_USER_ERROR"),
        512 => Some("E_USER_WARNING"),
        1024 => Some("E_USER_NOTICE"),
        2048 => Some("E_STRICT"),
        4096 => Some("E_RECOVERABLE_ERROR"),
        8192 => Some("E_DEPRECATED"),
        16384 => Some("E_USER_DEPRECATED"),
        _ => None,
    }
}

/// Maps a raw code onto the closed table. Unknown or non-integer codes are
/// returned unchanged.
pub fn symbolic_code(code: Value) -> Value {
    match code_as_int(&code).and_then(symbolic_name) {
        Some(name) => Value::String(name.to_string()),
        None => code,
    }
}

/// Whether the raw code is one of the fatal severities.
pub fn is_fatal(code: &Value) -> bool {
    code_as_int(code).is_some_and(|c| FATAL_CODES.contains(&c))
}

fn code_as_int(code: &Value) -> Option<i64> {
    match code {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
