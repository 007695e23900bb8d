//! Bounded-length coercion for strings and nested key/value structures.
//!
//! Every field that ends up on the wire passes through here, so an oversized
//! or adversarial input can never grow the payload without bound.

use serde_json::{Map, Value};
use std::borrow::Cow;

/// Ceiling for single scalar fields: error message, request scalars, header
/// values.
pub const SCALAR_LIMIT: usize = 2048;

/// Ceiling for string leaves inside collected request containers (query,
/// post, cookies, session, files, client headers).
pub const NESTED_LIMIT: usize = 512;

/// Truncates `s` to at most `max` characters, without a trailing marker.
///
/// The cut is made on a character boundary, so multi-byte text is never
/// split mid-codepoint. Returns the input unchanged (borrowed) when it is
/// already within the limit.
pub fn truncate_chars(s: &str, max: usize) -> Cow<'_, str> {
    match s.char_indices().nth(max) {
        Some((idx, _)) => Cow::Owned(s[..idx].to_string()),
        None => Cow::Borrowed(s),
    }
}

/// Applies [`truncate_chars`] to every string leaf of a JSON value.
///
/// Structure, key order and non-string leaves (numbers, booleans, nulls) are
/// left untouched. Idempotent: sanitizing twice equals sanitizing once.
pub fn sanitize_value(value: Value, max: usize) -> Value {
    match value {
        Value::String(s) => {
            let cut = s.char_indices().nth(max).map(|(idx, _)| idx);
            match cut {
                Some(idx) => Value::String(s[..idx].to_string()),
                None => Value::String(s),
            }
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| sanitize_value(item, max))
                .collect(),
        ),
        Value::Object(map) => Value::Object(sanitize_map(map, max)),
        other => other,
    }
}

/// Map form of [`sanitize_value`], preserving key order.
pub fn sanitize_map(map: Map<String, Value>, max: usize) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| (key, sanitize_value(value, max)))
        .collect()
}
