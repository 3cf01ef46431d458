//! Record store: `<data_dir>/<category>/<opendb_id>.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{check_file_stem, ensure_dir, list_files, read_json, write_json};
use crate::errors::{AppError, LoadIssue};
use crate::models::{record_id, Record};

/// Records of one category, plus the files that failed to load.
#[derive(Debug, Default)]
pub struct RecordSet {
    pub records: Vec<Record>,
    pub issues: Vec<LoadIssue>,
}

/// Root directory of per-category record directories.
#[derive(Debug, Clone)]
pub struct RecordStore {
    root: PathBuf,
}

impl RecordStore {
    /// Opens the store, creating the root directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, AppError> {
        let root = root.into();
        ensure_dir(&root)?;
        Ok(Self { root })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn category_dir(&self, category: &str) -> PathBuf {
        self.root.join(category)
    }

    pub fn path_for(&self, category: &str, id: &str) -> PathBuf {
        self.category_dir(category).join(format!("{}.json", id))
    }

    /// Loads every record of a category.
    ///
    /// Unparseable files are reported and skipped; records without an
    /// `opendb_id` are skipped.
    pub fn load_category(&self, category: &str) -> Result<RecordSet, AppError> {
        check_file_stem("category", category)?;
        let dir = self.category_dir(category);
        ensure_dir(&dir)?;

        let mut set = RecordSet::default();
        for path in list_files(&dir, ".json")? {
            match read_json(&path) {
                Ok(Value::Object(record)) => {
                    if record_id(&record).is_some() {
                        set.records.push(record);
                    } else {
                        tracing::warn!("Skipping {}: no opendb_id", path.display());
                    }
                }
                Ok(_) => {
                    tracing::warn!("Record {} is not a JSON object", path.display());
                    set.issues
                        .push(LoadIssue::new(&path, "Record must be a JSON object"));
                }
                Err(e) => {
                    tracing::warn!("Failed to load data {}: {}", path.display(), e);
                    set.issues.push(LoadIssue::new(&path, e.message()));
                }
            }
        }

        tracing::info!(
            "Loaded {} entries for category {} ({} failed)",
            set.records.len(),
            category,
            set.issues.len()
        );
        Ok(set)
    }

    /// Writes a record to `<id>.json`. The record must already carry its id.
    pub fn save(&self, category: &str, record: &Record) -> Result<PathBuf, AppError> {
        check_file_stem("category", category)?;
        let id = record_id(record)
            .ok_or_else(|| AppError::BadRequest("Record has no opendb_id".to_string()))?;
        check_file_stem("record", id)?;

        ensure_dir(&self.category_dir(category))?;
        let path = self.path_for(category, id);
        write_json(&path, &Value::Object(record.clone()))?;

        tracing::info!("Saved entry {}", id);
        Ok(path)
    }

    /// Deletes a record file. Returns `false` if there was none.
    pub fn delete(&self, category: &str, id: &str) -> Result<bool, AppError> {
        check_file_stem("category", category)?;
        check_file_stem("record", id)?;

        match fs::remove_file(self.path_for(category, id)) {
            Ok(()) => {
                tracing::info!("Deleted entry {}", id);
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(AppError::Io(format!("Failed to delete file: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_save_and_load_category() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path()).unwrap();

        let path = store
            .save("resistors", &record(json!({"opendb_id": "b", "name": "R2"})))
            .unwrap();
        assert!(path.ends_with("resistors/b.json"));
        store
            .save("resistors", &record(json!({"opendb_id": "a", "name": "R1"})))
            .unwrap();

        let set = store.load_category("resistors").unwrap();
        assert!(set.issues.is_empty());
        let ids: Vec<_> = set.records.iter().filter_map(record_id).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[test]
    fn test_load_skips_bad_files() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path()).unwrap();
        store
            .save("caps", &record(json!({"opendb_id": "ok", "name": "C1"})))
            .unwrap();

        let dir = store.category_dir("caps");
        fs::write(dir.join("broken.json"), "{").unwrap();
        fs::write(dir.join("array.json"), "[]").unwrap();
        fs::write(dir.join("anon.json"), r#"{"name": "no id"}"#).unwrap();

        let set = store.load_category("caps").unwrap();
        assert_eq!(set.records.len(), 1);
        assert_eq!(set.issues.len(), 2);
    }

    #[test]
    fn test_load_creates_missing_category_dir() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path()).unwrap();

        let set = store.load_category("fresh").unwrap();
        assert!(set.records.is_empty());
        assert!(store.category_dir("fresh").is_dir());
    }

    #[test]
    fn test_save_requires_id() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path()).unwrap();

        let err = store.save("caps", &record(json!({"name": "C1"}))).unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
        let err = store
            .save("caps", &record(json!({"opendb_id": "../x"})))
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_delete() {
        let temp_dir = TempDir::new().unwrap();
        let store = RecordStore::open(temp_dir.path()).unwrap();
        store
            .save("caps", &record(json!({"opendb_id": "gone"})))
            .unwrap();

        assert!(store.delete("caps", "gone").unwrap());
        assert!(!store.delete("caps", "gone").unwrap());
        assert!(!store.path_for("caps", "gone").exists());
    }
}
