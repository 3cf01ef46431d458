//! In-memory state of one open category.
//!
//! Owns the record set keyed by `opendb_id`, the path vocabulary derived
//! from the schema and the latest validation results. Every load, save and
//! delete re-validates the whole category.

use std::collections::BTreeMap;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::errors::{AppError, LoadIssue};
use crate::models::{new_record_id, record_id, CategoryReport, DiagnosticReport, Record, Row, ID_FIELD};
use crate::schema::fields::{form_fields, FormField};
use crate::search::SearchQuery;
use crate::store::RecordStore;
use crate::table::styling::{cell_severity, header_is_required, CellSeverity};
use crate::table::{self, unflatten_edits};
use crate::validate::SchemaValidator;

/// One category opened for browsing and editing.
pub struct CategorySession {
    category: String,
    schema: Value,
    validator: SchemaValidator,
    records: BTreeMap<String, Record>,
    headers: Vec<String>,
    report: CategoryReport,
}

impl CategorySession {
    /// Builds a session from already loaded records.
    pub fn new(category: impl Into<String>, schema: Value, records: Vec<Record>) -> Self {
        let category = category.into();
        let validator = SchemaValidator::new(&schema);
        let headers = table::headers(&schema);

        let mut keyed = BTreeMap::new();
        for record in records {
            let Some(id) = record_id(&record).map(str::to_string) else {
                tracing::warn!("Skipping entry in {} without opendb_id", category);
                continue;
            };
            if keyed.insert(id.clone(), record).is_some() {
                tracing::warn!("Duplicate opendb_id {} in {}, keeping the last", id, category);
            }
        }

        let mut session = Self {
            report: empty_report(&category),
            category,
            schema,
            validator,
            records: keyed,
            headers,
        };
        session.validate_all();
        session
    }

    /// Loads a category's records from the store and validates them.
    pub fn load(
        store: &RecordStore,
        category: &str,
        schema: Value,
    ) -> Result<(Self, Vec<LoadIssue>), AppError> {
        let set = store.load_category(category)?;
        let session = Self::new(category, schema, set.records);
        tracing::info!("{}", session.report.summary());
        Ok((session, set.issues))
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn schema(&self) -> &Value {
        &self.schema
    }

    /// Table headers: `opendb_id` followed by every schema path.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// The schema's required-closure.
    pub fn required_fields(&self) -> &[String] {
        self.validator.required_fields()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn record(&self, id: &str) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.values()
    }

    /// Form fields for the category's editor.
    pub fn form_fields(&self) -> Vec<FormField> {
        form_fields(&self.schema)
    }

    /// Rows for every record, ordered by id.
    pub fn rows(&self) -> Vec<Row> {
        let records: Vec<Record> = self.records.values().cloned().collect();
        table::flatten(&records, &self.headers)
    }

    /// Rows accepted by `query`.
    pub fn visible_rows(&self, query: &SearchQuery) -> Vec<Row> {
        let filter = query.compile();
        self.rows()
            .into_iter()
            .filter(|row| filter.accepts(row, &self.headers))
            .collect()
    }

    /// Latest validation results.
    pub fn report(&self) -> &CategoryReport {
        &self.report
    }

    pub fn diagnostics(&self, id: &str) -> Option<&DiagnosticReport> {
        self.report.reports.get(id)
    }

    /// Re-validates every record.
    pub fn validate_all(&mut self) -> &CategoryReport {
        let mut reports = BTreeMap::new();
        let mut valid = 0;

        for (id, record) in &self.records {
            let report = self.validator.validate(record);
            tracing::debug!(
                "Validated {}: valid={} required={:?} mismatches={}",
                id,
                report.is_valid,
                report.missing_required,
                report.type_mismatches.len()
            );
            if report.is_valid {
                valid += 1;
            }
            reports.insert(id.clone(), report);
        }

        self.report = CategoryReport {
            category: self.category.clone(),
            generated_at: Utc::now().to_rfc3339(),
            total: self.records.len(),
            valid,
            reports,
        };
        &self.report
    }

    /// Validates a record without touching the session.
    pub fn validate_record(&self, record: &Record) -> DiagnosticReport {
        self.validator.validate(record)
    }

    /// A fresh record for the "add" form.
    pub fn new_record(&self) -> Record {
        let mut record = Map::new();
        record.insert(ID_FIELD.to_string(), Value::String(new_record_id()));
        record
    }

    /// Applies form edits to `base`, persists the result and updates the
    /// session. Nothing changes in memory if the write fails.
    pub fn save_edits(
        &mut self,
        store: &RecordStore,
        base: &Record,
        edits: &Map<String, Value>,
    ) -> Result<Record, AppError> {
        let record = unflatten_edits(base, edits);
        self.save(store, record)
    }

    /// Persists a whole record and updates the session.
    pub fn save(&mut self, store: &RecordStore, record: Record) -> Result<Record, AppError> {
        let id = record_id(&record)
            .ok_or_else(|| AppError::BadRequest("Record has no opendb_id".to_string()))?
            .to_string();

        store.save(&self.category, &record)?;

        self.records.insert(id, record.clone());
        self.validate_all();
        Ok(record)
    }

    /// Deletes a record from the store and the session.
    pub fn delete(&mut self, store: &RecordStore, id: &str) -> Result<Record, AppError> {
        if !self.records.contains_key(id) {
            return Err(AppError::NotFound(format!("Record {} not found", id)));
        }

        store.delete(&self.category, id)?;

        let removed = self
            .records
            .remove(id)
            .ok_or_else(|| AppError::NotFound(format!("Record {} not found", id)))?;
        self.validate_all();
        Ok(removed)
    }

    /// Severity of one cell, for background colouring.
    pub fn cell_severity(&self, id: &str, header: &str) -> Option<CellSeverity> {
        cell_severity(self.diagnostics(id)?, header)
    }

    /// Required headers are rendered bold.
    pub fn header_is_required(&self, header: &str) -> bool {
        header_is_required(self.validator.required_fields(), header)
    }

    pub fn summary(&self) -> String {
        self.report.summary()
    }
}

fn empty_report(category: &str) -> CategoryReport {
    CategoryReport {
        category: category.to_string(),
        generated_at: Utc::now().to_rfc3339(),
        total: 0,
        valid: 0,
        reports: BTreeMap::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::SearchMode;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn schema() -> Value {
        json!({
            "type": "object",
            "required": ["opendb_id", "name"],
            "properties": {
                "opendb_id": {"type": "string"},
                "name": {"type": "string"},
                "value": {"type": "number"},
                "specs": {
                    "type": "object",
                    "required": ["package"],
                    "properties": {"package": {"type": "string"}}
                }
            }
        })
    }

    fn session() -> CategorySession {
        CategorySession::new(
            "resistors",
            schema(),
            vec![
                record(json!({"opendb_id": "b", "name": "R2", "value": "ten", "specs": {"package": "0603"}})),
                record(json!({"opendb_id": "a", "name": "R1", "value": 10, "specs": {"package": "0402"}})),
                record(json!({"name": "anonymous"})),
            ],
        )
    }

    #[test]
    fn test_new_keys_by_id_and_validates() {
        let s = session();
        assert_eq!(s.len(), 2);
        assert_eq!(s.report().total, 2);
        assert_eq!(s.report().valid, 1);
        assert_eq!(s.summary(), "Validation: 1/2 entries are valid");
        assert!(s.diagnostics("a").unwrap().is_valid);
    }

    #[test]
    fn test_new_skips_blank_ids_and_keeps_last_duplicate() {
        let s = CategorySession::new(
            "resistors",
            schema(),
            vec![
                record(json!({"opendb_id": "y", "name": "first"})),
                record(json!({"opendb_id": "", "name": "blank id"})),
                record(json!({"opendb_id": "y", "name": "second"})),
            ],
        );
        assert_eq!(s.len(), 1);
        assert_eq!(s.record("y").unwrap()["name"], json!("second"));
        assert_eq!(s.report().total, 1);
    }

    #[test]
    fn test_headers_and_rows() {
        let s = session();
        assert_eq!(s.headers(), ["opendb_id", "name", "value", "specs", "specs.package"]);
        let rows = s.rows();
        assert_eq!(rows[0]["opendb_id"], json!("a"));
        assert_eq!(rows[1]["specs.package"], json!("0603"));
    }

    #[test]
    fn test_visible_rows_filters() {
        let s = session();
        let rows = s.visible_rows(&SearchQuery::new("0603", SearchMode::Exact));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0]["name"], json!("R2"));
        assert_eq!(s.visible_rows(&SearchQuery::default()).len(), 2);
    }

    #[test]
    fn test_cell_severity_and_bold_headers() {
        let s = session();
        assert_eq!(s.cell_severity("b", "value"), Some(CellSeverity::TypeMismatch));
        assert_eq!(s.cell_severity("a", "value"), None);
        assert_eq!(s.cell_severity("missing", "value"), None);
        assert!(s.header_is_required("name"));
        assert!(s.header_is_required("specs.package"));
        assert!(!s.header_is_required("value"));
    }

    #[test]
    fn test_new_record_has_fresh_id() {
        let s = session();
        let r = s.new_record();
        let id = record_id(&r).unwrap();
        assert!(uuid::Uuid::parse_str(id).is_ok());
        assert!(s.record(id).is_none());
    }
}
