//! Dotted-path addressing over nested JSON objects.
//!
//! `metadata.name` addresses `record["metadata"]["name"]`. Paths never index
//! into arrays.

use serde_json::{Map, Value};

/// Resolves `path` inside `record`.
///
/// Returns `None` when a segment is missing or an intermediate value is not
/// an object.
pub fn get<'a>(record: &'a Map<String, Value>, path: &str) -> Option<&'a Value> {
    if !path.contains('.') {
        return record.get(path);
    }

    let mut segments = path.split('.');
    let first = segments.next()?;
    let mut current = record.get(first)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    Some(current)
}

/// Assigns `value` at `path`, creating intermediate objects as needed.
///
/// Any non-object value found on the way is replaced by an empty object.
pub fn set(record: &mut Map<String, Value>, path: &str, value: Value) {
    if path.is_empty() {
        return;
    }

    let mut segments: Vec<&str> = path.split('.').collect();
    let last = match segments.pop() {
        Some(last) => last,
        None => return,
    };

    let mut current = record;
    for segment in segments {
        let slot = current
            .entry(segment.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return,
        };
    }
    current.insert(last.to_string(), value);
}
