//! Record validation against a category schema.
//!
//! Structural draft-07 errors are classified into missing-required,
//! missing-optional and type-mismatch buckets; two sweeps then catch values
//! that are present but blank.

use std::cmp::Ordering;

use jsonschema::error::ValidationErrorKind;
use serde_json::Value;

use crate::models::{is_blank, json_type_name, DiagnosticReport, Record, TypeMismatch, ID_FIELD};
use crate::path;
use crate::schema::{enumerate_properties, enumerate_required, node_at};

/// Keyword of a structural error that the classifier cares about.
#[derive(Debug, Clone, PartialEq)]
enum Keyword {
    Required(String),
    Type,
    Other,
}

/// Structural error reduced to what classification needs.
#[derive(Debug, Clone)]
struct StructuralError {
    segments: Vec<String>,
    keyword: Keyword,
    instance: Value,
    message: String,
}

/// A schema compiled once for validating many records.
pub struct SchemaValidator {
    schema: Value,
    compiled: Result<jsonschema::Validator, String>,
    all_fields: Vec<String>,
    required_fields: Vec<String>,
}

impl SchemaValidator {
    pub fn new(schema: &Value) -> Self {
        let compiled = compile(schema).map_err(|e| {
            tracing::warn!("Schema does not compile: {}", e);
            format!("Invalid schema: {}", e)
        });

        Self {
            schema: schema.clone(),
            compiled,
            all_fields: enumerate_properties(schema, ""),
            required_fields: enumerate_required(schema, ""),
        }
    }

    /// All addressable paths of the schema.
    pub fn all_fields(&self) -> &[String] {
        &self.all_fields
    }

    /// The required-closure of the schema.
    pub fn required_fields(&self) -> &[String] {
        &self.required_fields
    }

    /// Validates one record. Never fails; every problem lands in the report.
    pub fn validate(&self, record: &Record) -> DiagnosticReport {
        let mut report = DiagnosticReport::default();

        let structural = match &self.compiled {
            Ok(validator) => self.structural_errors(validator, record),
            Err(message) => {
                report.errors.push(message.clone());
                Vec::new()
            }
        };

        for error in structural {
            report.errors.push(error.message);

            match error.keyword {
                Keyword::Required(missing) => {
                    if missing == ID_FIELD {
                        continue;
                    }
                    let prefix = error.segments.join(".");
                    let candidate = if prefix.is_empty() {
                        missing
                    } else {
                        format!("{}.{}", prefix, missing)
                    };
                    if self.required_fields.contains(&candidate) {
                        report.add_missing_required(candidate);
                    } else {
                        report.add_missing_optional(candidate);
                    }
                }
                Keyword::Type => {
                    let expected = node_at(&self.schema, &error.segments)
                        .and_then(|node| node.get("type"))
                        .cloned()
                        .unwrap_or(Value::Null);
                    report.type_mismatches.push(TypeMismatch {
                        field: error.segments.join("."),
                        expected,
                        actual: json_type_name(&error.instance).to_string(),
                        value: error.instance,
                    });
                }
                Keyword::Other => {}
            }
        }

        // Present-but-blank required values satisfy key presence only.
        for field in &self.required_fields {
            if path::get(record, field).is_some_and(is_blank) {
                report.add_missing_required(field.clone());
            }
        }

        for field in &self.all_fields {
            if self.required_fields.contains(field) {
                continue;
            }
            if path::get(record, field).map_or(true, is_blank) {
                report.add_missing_optional(field.clone());
            }
        }

        report.is_valid = report.missing_required.is_empty() && report.type_mismatches.is_empty();
        report
    }

    fn structural_errors(
        &self,
        validator: &jsonschema::Validator,
        record: &Record,
    ) -> Vec<StructuralError> {
        let instance = Value::Object(record.clone());
        let mut errors: Vec<StructuralError> = validator
            .iter_errors(&instance)
            .map(|e| {
                let message = e.to_string();
                let segments = pointer_segments(&e.instance_path.to_string());
                let keyword = match &e.kind {
                    ValidationErrorKind::Required { property } => Keyword::Required(
                        property
                            .as_str()
                            .map(str::to_string)
                            .unwrap_or_else(|| property.to_string()),
                    ),
                    ValidationErrorKind::Type { .. } => Keyword::Type,
                    _ => Keyword::Other,
                };
                StructuralError {
                    segments,
                    keyword,
                    instance: e.instance.into_owned(),
                    message,
                }
            })
            .collect();

        errors.sort_by(|a, b| compare_segments(&a.segments, &b.segments));
        errors
    }
}

/// Draft-07 validator that treats `format` as an annotation only.
pub(crate) fn compile(
    schema: &Value,
) -> Result<jsonschema::Validator, jsonschema::ValidationError<'static>> {
    jsonschema::draft7::options()
        .should_validate_formats(false)
        .build(schema)
}

/// Validates `record` against `schema`.
pub fn validate(record: &Record, schema: &Value) -> DiagnosticReport {
    SchemaValidator::new(schema).validate(record)
}

/// Splits a JSON pointer (`/a/b~1c`) into unescaped segments.
fn pointer_segments(pointer: &str) -> Vec<String> {
    pointer
        .split('/')
        .skip(1)
        .map(|s| s.replace("~1", "/").replace("~0", "~"))
        .collect()
}

/// Orders instance paths segment by segment, array indices numerically.
fn compare_segments(a: &[String], b: &[String]) -> Ordering {
    for (x, y) in a.iter().zip(b) {
        let ord = match (x.parse::<usize>(), y.parse::<usize>()) {
            (Ok(i), Ok(j)) => i.cmp(&j),
            _ => x.cmp(y),
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    a.len().cmp(&b.len())
}
