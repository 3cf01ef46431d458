//! Validation report models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value whose runtime type disagrees with the declared schema type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeMismatch {
    /// Dotted path of the offending value
    pub field: String,
    /// Declared `type` keyword (a string or an array of strings)
    pub expected: Value,
    /// JSON type name of the offending value
    pub actual: String,
    pub value: Value,
}

/// Per-record validation outcome.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub missing_required: Vec<String>,
    pub missing_optional: Vec<String>,
    pub type_mismatches: Vec<TypeMismatch>,
}

impl DiagnosticReport {
    pub(crate) fn add_missing_required(&mut self, path: String) {
        if !self.missing_required.contains(&path) {
            self.missing_required.push(path);
        }
    }

    pub(crate) fn add_missing_optional(&mut self, path: String) {
        if !self.missing_optional.contains(&path) {
            self.missing_optional.push(path);
        }
    }

    /// True if a type mismatch is reported at `field` or anywhere beneath it.
    pub fn has_type_mismatch_under(&self, field: &str) -> bool {
        self.type_mismatches.iter().any(|m| {
            m.field == field
                || m.field
                    .strip_prefix(field)
                    .is_some_and(|rest| rest.starts_with('.'))
        })
    }

    /// Human-readable lines grouped the way the details view lists them.
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if self.is_valid {
            lines.push("Entry is valid".to_string());
        } else {
            lines.push("Entry has validation issues".to_string());
        }
        if !self.missing_required.is_empty() {
            lines.push("Missing Required Fields:".to_string());
            lines.extend(self.missing_required.iter().map(|f| format!("• {}", f)));
        }
        if !self.type_mismatches.is_empty() {
            lines.push("Type Mismatches:".to_string());
            lines.extend(self.type_mismatches.iter().map(|m| {
                format!("• {}: expected {}, got {}", m.field, m.expected, m.actual)
            }));
        }
        if !self.missing_optional.is_empty() {
            lines.push("Missing Optional Fields:".to_string());
            lines.extend(self.missing_optional.iter().map(|f| format!("• {}", f)));
        }
        // Raw errors only matter when nothing above explains them.
        if !self.errors.is_empty()
            && self.missing_required.is_empty()
            && self.type_mismatches.is_empty()
        {
            lines.push("Other Validation Errors:".to_string());
            lines.extend(self.errors.iter().map(|e| format!("• {}", e)));
        }
        lines
    }
}

/// Validation results for a whole category, keyed by record id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryReport {
    pub category: String,
    pub generated_at: String,
    pub total: usize,
    pub valid: usize,
    pub reports: BTreeMap<String, DiagnosticReport>,
}

impl CategoryReport {
    pub fn summary(&self) -> String {
        format!(
            "Validation: {}/{} entries are valid",
            self.valid, self.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mismatch(field: &str) -> TypeMismatch {
        TypeMismatch {
            field: field.to_string(),
            expected: json!("string"),
            actual: "integer".to_string(),
            value: json!(1),
        }
    }

    #[test]
    fn test_missing_paths_are_deduplicated() {
        let mut report = DiagnosticReport::default();
        report.add_missing_required("a".to_string());
        report.add_missing_required("a".to_string());
        report.add_missing_optional("b".to_string());
        report.add_missing_optional("b".to_string());
        assert_eq!(report.missing_required, vec!["a"]);
        assert_eq!(report.missing_optional, vec!["b"]);
    }

    #[test]
    fn test_type_mismatch_under_matches_nested_fields_only() {
        let report = DiagnosticReport {
            type_mismatches: vec![mismatch("metadata.count")],
            ..Default::default()
        };
        assert!(report.has_type_mismatch_under("metadata"));
        assert!(report.has_type_mismatch_under("metadata.count"));
        assert!(!report.has_type_mismatch_under("meta"));
        assert!(!report.has_type_mismatch_under("metadata.name"));
    }

    #[test]
    fn test_describe_hides_raw_errors_when_classified() {
        let report = DiagnosticReport {
            is_valid: false,
            errors: vec!["1 is not of type \"string\"".to_string()],
            type_mismatches: vec![mismatch("name")],
            ..Default::default()
        };
        let lines = report.describe();
        assert!(lines.contains(&"• name: expected \"string\", got integer".to_string()));
        assert!(!lines.iter().any(|l| l == "Other Validation Errors:"));
    }
}
