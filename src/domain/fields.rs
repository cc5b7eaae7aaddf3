//! Field Resolver - dotted-path extraction over loosely structured records.
//!
//! Upstream events carry no fixed schema, so every "get X from an event"
//! lookup is expressed as an ordered table of dotted paths. The first path
//! that yields a non-empty value wins, which makes the precedence between
//! schema shapes explicit and auditable.
//!
//! Numeric segments index into arrays, so `lineItems.0.name` reads the name
//! of the first line item.

use serde_json::Value;

/// Shared `null`, for lookups that need a borrowed empty record.
pub static NULL: Value = Value::Null;

/// Walks a dotted key path through nested objects (and arrays).
///
/// Returns `None` as soon as an intermediate segment is missing or `null`.
/// A `null` at the final segment is returned as-is; [`first_of`] is the
/// place that treats it as empty.
pub fn get_path<'a>(record: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(record, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

/// Returns the first value along `paths` that is present, not `null` and not
/// an empty string.
///
/// Callers list higher-confidence schema shapes first.
pub fn first_of<'a>(record: &'a Value, paths: &[&str]) -> Option<&'a Value> {
    paths
        .iter()
        .filter_map(|path| get_path(record, path))
        .find(|value| !is_empty(value))
}

/// [`first_of`] with an explicit fallback value.
pub fn first_of_or<'a>(record: &'a Value, paths: &[&str], fallback: &'a Value) -> &'a Value {
    first_of(record, paths).unwrap_or(fallback)
}

/// [`first_of`] rendered as display text.
pub fn first_text(record: &Value, paths: &[&str]) -> Option<String> {
    first_of(record, paths).map(value_text)
}

/// Returns the first non-empty *string* along `paths`.
///
/// Used for human-facing fields (names, emails) where a nested object
/// must not be mistaken for the value.
pub fn first_str(record: &Value, paths: &[&str]) -> Option<String> {
    paths
        .iter()
        .filter_map(|path| get_path(record, path))
        .filter_map(Value::as_str)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Reads a single path as non-empty display text.
pub fn text_at(record: &Value, path: &str) -> Option<String> {
    first_text(record, &[path])
}

/// Renders a value for display: strings verbatim, other scalars through
/// their JSON form, containers as compact JSON.
pub fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `null` and `""` carry no signal.
pub fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}
