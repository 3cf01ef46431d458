//! Form field descriptors derived from a schema.
//!
//! The UI picks a widget per [`FieldKind`]; values flow back through
//! [`FieldKind::normalize`] so the rest of the engine never needs to know
//! which control produced them.

use serde::Serialize;
use serde_json::{Number, Value};

use super::{base_type, enumerate_required, properties};
use crate::models::{Record, ID_FIELD};
use crate::path;

/// Editable field kinds.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldKind {
    Text,
    Integer {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Number {
        minimum: Option<f64>,
        maximum: Option<f64>,
    },
    Boolean,
    Enum {
        options: Vec<String>,
    },
    Array {
        item_type: String,
    },
}

impl FieldKind {
    /// Picks the kind for a property schema. Unknown types edit as text.
    pub fn from_schema(schema: &Value) -> Self {
        let minimum = schema.get("minimum").and_then(Value::as_f64);
        let maximum = schema.get("maximum").and_then(Value::as_f64);

        match base_type(schema).unwrap_or("string") {
            "string" => match schema.get("enum").and_then(Value::as_array) {
                Some(options) => FieldKind::Enum {
                    options: options.iter().map(display_scalar).collect(),
                },
                None => FieldKind::Text,
            },
            "integer" => FieldKind::Integer { minimum, maximum },
            "number" => FieldKind::Number { minimum, maximum },
            "boolean" => FieldKind::Boolean,
            "array" => FieldKind::Array {
                item_type: schema
                    .get("items")
                    .and_then(base_type)
                    .unwrap_or("string")
                    .to_string(),
            },
            _ => FieldKind::Text,
        }
    }

    /// Value shown in a fresh form for this kind.
    pub fn default_value(&self) -> Value {
        match self {
            FieldKind::Text => Value::String(String::new()),
            FieldKind::Integer { .. } => Value::from(0),
            FieldKind::Number { .. } => Value::from(0.0),
            FieldKind::Boolean => Value::Bool(false),
            FieldKind::Enum { options } => {
                Value::String(options.first().cloned().unwrap_or_default())
            }
            FieldKind::Array { .. } => Value::Array(Vec::new()),
        }
    }

    /// Coerces raw widget input to this kind.
    ///
    /// Input that cannot be coerced is returned unchanged so that validation
    /// reports it as a type mismatch.
    pub fn normalize(&self, raw: Value) -> Value {
        match self {
            FieldKind::Text | FieldKind::Enum { .. } => match raw {
                Value::Bool(_) | Value::Number(_) => Value::String(display_scalar(&raw)),
                other => other,
            },
            FieldKind::Integer { minimum, maximum } => match as_f64(&raw) {
                Some(n) => {
                    let n = clamp(n.trunc(), *minimum, *maximum);
                    Value::Number(Number::from(n as i64))
                }
                None => raw,
            },
            FieldKind::Number { minimum, maximum } => match as_f64(&raw) {
                Some(n) => Number::from_f64(clamp(n, *minimum, *maximum))
                    .map(Value::Number)
                    .unwrap_or(raw),
                None => raw,
            },
            FieldKind::Boolean => match &raw {
                Value::String(s) if s.eq_ignore_ascii_case("true") => Value::Bool(true),
                Value::String(s) if s.eq_ignore_ascii_case("false") => Value::Bool(false),
                _ => raw,
            },
            FieldKind::Array { .. } => match raw {
                Value::Array(_) => raw,
                Value::Null => Value::Array(Vec::new()),
                scalar => Value::Array(vec![scalar]),
            },
        }
    }
}

fn as_f64(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    n.filter(|n| n.is_finite())
}

fn clamp(n: f64, minimum: Option<f64>, maximum: Option<f64>) -> f64 {
    let n = minimum.map_or(n, |min| n.max(min));
    maximum.map_or(n, |max| n.min(max))
}

fn display_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// One editable leaf of the generated form.
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
    pub path: String,
    /// Dotted path of the enclosing object group, empty at top level.
    pub group: String,
    pub label: String,
    pub required: bool,
    pub kind: FieldKind,
    pub description: Option<String>,
    pub default: Option<Value>,
}

impl FormField {
    /// The record's value at this field, or the schema default, or the
    /// kind's default.
    pub fn current_value(&self, record: &Record) -> Value {
        path::get(record, &self.path)
            .cloned()
            .or_else(|| self.default.clone())
            .unwrap_or_else(|| self.kind.default_value())
    }
}

/// `part_number` -> `Part Number`.
pub fn field_label(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Leaf fields of the form for `schema`, in declared order.
///
/// Nested objects with `properties` become groups and are walked; the id
/// field is never editable.
pub fn form_fields(schema: &Value) -> Vec<FormField> {
    let required = enumerate_required(schema, "");
    let mut fields = Vec::new();
    collect_fields(schema, "", &required, &mut fields);
    fields
}

fn collect_fields(schema: &Value, prefix: &str, required: &[String], out: &mut Vec<FormField>) {
    let Some(props) = properties(schema) else {
        return;
    };

    for (name, prop) in props {
        if name == ID_FIELD {
            continue;
        }
        let path = format!("{}{}", prefix, name);

        if base_type(prop) == Some("object") && properties(prop).is_some() {
            collect_fields(prop, &format!("{}.", path), required, out);
            continue;
        }

        let is_required = required.contains(&path);
        let mut label = field_label(name);
        if is_required {
            label.push_str(" *");
        }

        out.push(FormField {
            group: prefix.trim_end_matches('.').to_string(),
            label,
            required: is_required,
            kind: FieldKind::from_schema(prop),
            description: prop
                .get("description")
                .and_then(Value::as_str)
                .map(str::to_string),
            default: prop.get("default").cloned(),
            path,
        });
    }
}
