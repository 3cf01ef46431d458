//! Schema store: one `<category>.schema.json` per category.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde_json::Value;

use super::{check_file_stem, ensure_dir, list_files, read_json, write_json};
use crate::errors::{AppError, LoadIssue};
use crate::schema::authoring::check_schema_document;

pub const SCHEMA_SUFFIX: &str = ".schema.json";

/// Every schema found in the store, plus the files that failed to load.
#[derive(Debug, Default)]
pub struct SchemaSet {
    pub schemas: BTreeMap<String, Value>,
    pub issues: Vec<LoadIssue>,
}

/// Directory of category schemas.
#[derive(Debug, Clone)]
pub struct SchemaStore {
    dir: PathBuf,
}

impl SchemaStore {
    /// Opens the store, creating the directory if needed.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, AppError> {
        let dir = dir.into();
        ensure_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, category: &str) -> PathBuf {
        self.dir.join(format!("{}{}", category, SCHEMA_SUFFIX))
    }

    pub fn exists(&self, category: &str) -> bool {
        self.path_for(category).is_file()
    }

    /// Loads every schema. A file that fails to parse is reported and skipped.
    pub fn load_all(&self) -> Result<SchemaSet, AppError> {
        let mut set = SchemaSet::default();

        for path in list_files(&self.dir, SCHEMA_SUFFIX)? {
            let Some(category) = category_name(&path) else {
                continue;
            };

            match read_json(&path) {
                Ok(schema) if schema.is_object() => {
                    set.schemas.insert(category, schema);
                }
                Ok(_) => {
                    tracing::warn!("Schema {} is not a JSON object", path.display());
                    set.issues
                        .push(LoadIssue::new(&path, "Schema must be a JSON object"));
                }
                Err(e) => {
                    tracing::warn!("Failed to load schema {}: {}", path.display(), e);
                    set.issues.push(LoadIssue::new(&path, e.message()));
                }
            }
        }

        tracing::info!(
            "Loaded {} schemas from {:?} ({} failed)",
            set.schemas.len(),
            self.dir,
            set.issues.len()
        );
        Ok(set)
    }

    /// Loads one category's schema.
    pub fn load(&self, category: &str) -> Result<Value, AppError> {
        check_file_stem("category", category)?;
        let path = self.path_for(category);
        if !path.is_file() {
            return Err(AppError::NotFound(format!(
                "Schema for category {} not found",
                category
            )));
        }
        read_json(&path)
    }

    /// Checks and writes a schema, replacing any existing one.
    pub fn save(&self, category: &str, schema: &Value) -> Result<PathBuf, AppError> {
        check_schema_document(category, schema)?;
        let path = self.path_for(category);
        write_json(&path, schema)?;
        tracing::info!("Saved schema {}", category);
        Ok(path)
    }
}

/// `resistors.schema.json` -> `resistors` (everything before the first dot).
fn category_name(path: &Path) -> Option<String> {
    let name = path.file_name()?.to_str()?;
    let category = name.split('.').next()?;
    if category.is_empty() {
        None
    } else {
        Some(category.to_string())
    }
}
