//! Schema walking: the dotted-path vocabulary of a draft-07 object schema.
//!
//! Both the table headers and the validator are built from the two walks in
//! this module, so they always agree on which paths exist and which are
//! required.

pub mod authoring;
pub mod fields;

use serde_json::{Map, Value};

use crate::models::ID_FIELD;

/// Effective base type of a schema node.
///
/// A list `type` such as `["object", "null"]` resolves to its first
/// non-`"null"` entry.
pub fn base_type(schema: &Value) -> Option<&str> {
    match schema.get("type")? {
        Value::String(t) => Some(t.as_str()),
        Value::Array(types) => types
            .iter()
            .filter_map(Value::as_str)
            .find(|t| *t != "null"),
        _ => None,
    }
}

/// True when the node's `type` is a list containing `"null"`.
pub fn is_nullable(schema: &Value) -> bool {
    match schema.get("type") {
        Some(Value::Array(types)) => types.iter().any(|t| t.as_str() == Some("null")),
        _ => false,
    }
}

/// The node's `properties` mapping.
pub fn properties(schema: &Value) -> Option<&Map<String, Value>> {
    schema.get("properties")?.as_object()
}

/// Object-typed node with its own `properties`: the only nodes walked into.
fn nested_properties(schema: &Value) -> Option<&Map<String, Value>> {
    if base_type(schema) == Some("object") {
        properties(schema)
    } else {
        None
    }
}

/// Every addressable path, in declared order, excluding `opendb_id`.
///
/// Nested objects contribute both their own path and their children's.
/// Array `items` are never walked.
pub fn enumerate_properties(schema: &Value, prefix: &str) -> Vec<String> {
    let mut paths = Vec::new();
    collect_properties(schema, prefix, &mut paths);
    paths
}

fn collect_properties(schema: &Value, prefix: &str, out: &mut Vec<String>) {
    let Some(props) = properties(schema) else {
        return;
    };

    for (name, prop) in props {
        if name == ID_FIELD {
            continue;
        }
        let path = format!("{}{}", prefix, name);
        out.push(path.clone());

        if nested_properties(prop).is_some() {
            collect_properties(prop, &format!("{}.", path), out);
        }
    }
}

/// The required-closure: every required path, including nested objects'
/// required fields, excluding `opendb_id`.
///
/// Names listed in `required` but missing from `properties` are passed
/// through unchanged.
pub fn enumerate_required(schema: &Value, prefix: &str) -> Vec<String> {
    let mut paths = Vec::new();
    collect_required(schema, prefix, &mut paths);
    paths
}

fn collect_required(schema: &Value, prefix: &str, out: &mut Vec<String>) {
    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for field in required.iter().filter_map(Value::as_str) {
            if field == ID_FIELD {
                continue;
            }
            let path = format!("{}{}", prefix, field);
            if !out.contains(&path) {
                out.push(path);
            }
        }
    }

    let Some(props) = properties(schema) else {
        return;
    };
    for (name, prop) in props {
        if nested_properties(prop).is_some() {
            collect_required(prop, &format!("{}{}.", prefix, name), out);
        }
    }
}

/// Schema node describing the value at an instance location.
///
/// Walks `properties` for object keys and `items` for array indices.
pub fn node_at<'a>(schema: &'a Value, segments: &[String]) -> Option<&'a Value> {
    let mut current = schema;
    for segment in segments {
        if let Some(next) = properties(current).and_then(|p| p.get(segment)) {
            current = next;
        } else if segment.parse::<usize>().is_ok() {
            current = current.get("items")?;
        } else {
            return None;
        }
    }
    Some(current)
}
