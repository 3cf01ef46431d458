//! Error handling module for the OpenDB form engine.
//!
//! Provides a single error type with stable error codes for the UI layer.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Error codes as constants to avoid stringly-typed errors.
pub mod codes {
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const VALIDATION_ERROR: &str = "VALIDATION_ERROR";
    pub const IO_ERROR: &str = "IO_ERROR";
    pub const SERIALIZATION_ERROR: &str = "SERIALIZATION_ERROR";
    pub const SCHEMA_ERROR: &str = "SCHEMA_ERROR";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// Record or category not found
    NotFound(String),
    /// User-supplied data rejected (schema authoring, missing names)
    Validation(String),
    /// Filesystem failure
    Io(String),
    /// JSON encode/decode failure
    Serialization(String),
    /// Schema document unusable
    Schema(String),
    /// Malformed input to an operation
    BadRequest(String),
}

impl AppError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => codes::NOT_FOUND,
            AppError::Validation(_) => codes::VALIDATION_ERROR,
            AppError::Io(_) => codes::IO_ERROR,
            AppError::Serialization(_) => codes::SERIALIZATION_ERROR,
            AppError::Schema(_) => codes::SCHEMA_ERROR,
            AppError::BadRequest(_) => codes::BAD_REQUEST,
        }
    }

    /// Get the error message.
    pub fn message(&self) -> String {
        match self {
            AppError::NotFound(msg) => msg.clone(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Io(msg) => msg.clone(),
            AppError::Serialization(msg) => msg.clone(),
            AppError::Schema(msg) => msg.clone(),
            AppError::BadRequest(msg) => msg.clone(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.error_code(), self.message())
    }
}

impl std::error::Error for AppError {}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        tracing::error!("IO error: {:?}", err);
        AppError::Io(format!("IO error: {}", err))
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        tracing::error!("JSON error: {:?}", err);
        AppError::Serialization(format!("JSON error: {}", err))
    }
}

/// A file that could not be loaded. Loading continues past it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LoadIssue {
    pub path: PathBuf,
    pub message: String,
}

impl LoadIssue {
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for LoadIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Failed to load {}: {}", self.path.display(), self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_code() {
        let err = AppError::NotFound("Record abc not found".to_string());
        assert_eq!(err.to_string(), "NOT_FOUND: Record abc not found");
    }

    #[test]
    fn test_json_error_maps_to_serialization() {
        let err: AppError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        assert_eq!(err.error_code(), codes::SERIALIZATION_ERROR);
    }
}
