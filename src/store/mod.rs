//! File-backed persistence for schemas and records.
//!
//! The filesystem is the source of truth: one `<category>.schema.json` per
//! category and one `<opendb_id>.json` per record.

mod records;
mod schemas;

pub use records::*;
pub use schemas::*;

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::errors::AppError;

/// Ensure a store directory exists.
pub(crate) fn ensure_dir(dir: &Path) -> Result<(), AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::Io(format!("Failed to create {}: {}", dir.display(), e)))
}

/// Read and parse one JSON file.
pub(crate) fn read_json(path: &Path) -> Result<Value, AppError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Write pretty-printed JSON through a temporary sibling file so a failed
/// write never truncates the existing file.
pub(crate) fn write_json(path: &Path, value: &Value) -> Result<(), AppError> {
    let mut content = serde_json::to_string_pretty(value)?;
    content.push('\n');

    let tmp: PathBuf = path.with_extension("json.tmp");
    fs::write(&tmp, content)
        .map_err(|e| AppError::Io(format!("Failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        AppError::Io(format!("Failed to replace {}: {}", path.display(), e))
    })
}

/// File names in `dir` ending with `suffix`, sorted.
pub(crate) fn list_files(dir: &Path, suffix: &str) -> Result<Vec<PathBuf>, AppError> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let matches = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(suffix));
        if matches && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Rejects names that would escape their directory.
pub(crate) fn check_file_stem(kind: &str, stem: &str) -> Result<(), AppError> {
    if stem.is_empty() || stem.contains(&['/', '\\'][..]) || stem == "." || stem == ".." {
        return Err(AppError::BadRequest(format!("Invalid {} name: {:?}", kind, stem)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read_preserves_unicode() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("x.json");
        write_json(&path, &json!({"name": "Widerstand Ω"})).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Ω"));
        assert!(raw.contains("\n  \"name\""));
        assert_eq!(read_json(&path).unwrap(), json!({"name": "Widerstand Ω"}));
        assert!(!temp_dir.path().join("x.json.tmp").exists());
    }

    #[test]
    fn test_list_files_filters_and_sorts() {
        let temp_dir = TempDir::new().unwrap();
        for name in ["b.json", "a.json", "c.txt", "d.json.tmp"] {
            fs::write(temp_dir.path().join(name), "{}").unwrap();
        }
        fs::create_dir(temp_dir.path().join("dir.json")).unwrap();

        let files = list_files(temp_dir.path(), ".json").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.json", "b.json"]);
    }

    #[test]
    fn test_check_file_stem() {
        assert!(check_file_stem("record", "0b5e-11").is_ok());
        assert!(check_file_stem("record", "../etc").is_err());
        assert!(check_file_stem("record", "").is_err());
        assert!(check_file_stem("record", "..").is_err());
    }
}
