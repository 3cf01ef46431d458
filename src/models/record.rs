//! Record model: an arbitrarily nested JSON object keyed by `opendb_id`.

use serde_json::{Map, Value};

/// Identity field present on every record. Never part of the path vocabulary.
pub const ID_FIELD: &str = "opendb_id";

/// A record is a JSON object.
pub type Record = Map<String, Value>;

/// A projected table row, keyed by dotted path.
pub type Row = Map<String, Value>;

/// Returns the record's `opendb_id` when it is a non-empty string.
pub fn record_id(record: &Record) -> Option<&str> {
    match record.get(ID_FIELD) {
        Some(Value::String(id)) if !id.is_empty() => Some(id.as_str()),
        _ => None,
    }
}

/// Generates a fresh record identifier.
pub fn new_record_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Sets a fresh `opendb_id` when the record has none (or an empty one).
/// Returns the record's id.
pub fn ensure_record_id(record: &mut Record) -> String {
    if let Some(id) = record_id(record) {
        return id.to_string();
    }
    let id = new_record_id();
    record.insert(ID_FIELD.to_string(), Value::String(id.clone()));
    id
}

/// JSON type name of a value, as used in type mismatch reports.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(n) if n.is_i64() || n.is_u64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// True for null and for strings that are empty after trimming.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}
