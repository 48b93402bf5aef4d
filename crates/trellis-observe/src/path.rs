//! Dotted-path reads and writes over the value graph.
//!
//! Reads never fail: a segment that cannot be resolved yields
//! `Undefined` and resolution carries on from there. Writes materialize
//! missing intermediate objects; a write through a primitive is
//! silently dropped, the way a loosely-typed host would discard it.

use indexmap::IndexMap;
use trellis_value::Value;

/// Splits a dotted path into segments. The empty path has none and
/// addresses the root itself.
pub fn split_path(path: &str) -> Vec<&str> {
    if path.is_empty() {
        Vec::new()
    } else {
        path.split('.').collect()
    }
}

/// Resolves a dotted path against a value. Misses read `Undefined`.
///
/// ```
/// use trellis_observe::resolve_path;
/// use trellis_value::{from_json, Value};
/// use serde_json::json;
///
/// let data = from_json(&json!({"a": {"b": [10, 20]}}));
/// assert_eq!(resolve_path(&data, "a.b.1"), Value::Number(20.0));
/// assert_eq!(resolve_path(&data, "a.b.length"), Value::Number(2.0));
/// assert_eq!(resolve_path(&data, "a.x.y"), Value::Undefined);
/// ```
pub fn resolve_path(value: &Value, path: &str) -> Value {
    resolve_segments(value, split_path(path).iter().copied())
}

pub(crate) fn resolve_segments<'a>(
    value: &Value,
    segments: impl IntoIterator<Item = &'a str>,
) -> Value {
    let mut current = value.clone();
    for segment in segments {
        current = current.get(segment);
    }
    current
}

/// Writes `value` at `segments`, creating missing intermediate objects.
/// Returns false when the write lands on a primitive and is dropped.
pub(crate) fn write_value(target: &mut Value, segments: &[&str], value: Value) -> bool {
    let Some((head, rest)) = segments.split_first() else {
        return false;
    };
    if rest.is_empty() {
        return match target {
            Value::Object(map) => {
                map.insert((*head).to_string(), value);
                true
            }
            Value::Array(items) => match head.parse::<usize>() {
                Ok(index) => {
                    items.set(index, value);
                    true
                }
                Err(_) => false,
            },
            _ => false,
        };
    }
    match target {
        Value::Object(map) => {
            let slot = map
                .entry((*head).to_string())
                .or_insert(Value::Undefined);
            if matches!(slot, Value::Undefined | Value::Null) {
                *slot = Value::Object(IndexMap::new());
            }
            write_value(slot, rest, value)
        }
        Value::Array(items) => {
            let Ok(index) = head.parse::<usize>() else {
                return false;
            };
            let mut element = items.get(index);
            if matches!(element, Value::Undefined | Value::Null) {
                element = Value::Object(IndexMap::new());
            }
            let written = write_value(&mut element, rest, value);
            if written {
                items.set(index, element);
            }
            written
        }
        _ => false,
    }
}
