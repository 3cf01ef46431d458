//! Checks applied to user-authored category schemas before they are saved.

use serde_json::{json, Value};

use crate::errors::AppError;

pub const DRAFT7_URI: &str = "http://json-schema.org/draft-07/schema#";

/// Keys every category schema must declare at its root.
const REQUIRED_KEYS: [&str; 4] = ["$schema", "title", "type", "properties"];

/// Starting template for a new category.
pub fn default_schema(title: &str) -> Value {
    json!({
        "$schema": DRAFT7_URI,
        "title": title,
        "type": "object",
        "required": ["opendb_id"],
        "properties": {
            "opendb_id": {"type": "string", "format": "uuid"},
            "name": {"type": "string"}
        }
    })
}

/// Rejects schemas the editor cannot work with.
pub fn check_schema_document(name: &str, doc: &Value) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation(
            "Please enter a schema name.".to_string(),
        ));
    }
    if name.contains(&['/', '\\', '.'][..]) {
        return Err(AppError::Validation(format!(
            "Schema name '{}' may not contain '/', '\\' or '.'",
            name
        )));
    }

    let Some(root) = doc.as_object() else {
        return Err(AppError::Validation(
            "Schema must be a JSON object.".to_string(),
        ));
    };

    let missing: Vec<&str> = REQUIRED_KEYS
        .iter()
        .copied()
        .filter(|key| !root.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(AppError::Validation(format!(
            "Schema is missing required fields: {}",
            missing.join(", ")
        )));
    }

    if root.get("type").and_then(Value::as_str) != Some("object") {
        return Err(AppError::Validation(
            "Schema type must be 'object' for component data.".to_string(),
        ));
    }

    match root.get("properties").and_then(Value::as_object) {
        None => {
            return Err(AppError::Validation(
                "Properties must be a JSON object.".to_string(),
            ))
        }
        Some(props) if props.is_empty() => {
            return Err(AppError::Validation(
                "Schema must have at least one property.".to_string(),
            ))
        }
        Some(_) => {}
    }

    crate::validate::compile(doc)
        .map(|_| ())
        .map_err(|e| AppError::Schema(format!("Schema does not compile: {}", e)))
}
