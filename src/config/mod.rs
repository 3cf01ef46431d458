//! Configuration module for the OpenDB form engine.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::path::PathBuf;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

impl LogFormat {
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Text,
        }
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding `<category>.schema.json` files
    pub schema_dir: PathBuf,
    /// Root directory of the per-category record directories
    pub data_dir: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Log output format
    pub log_format: LogFormat,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let schema_dir = env::var("OPENDB_SCHEMA_DIR")
            .unwrap_or_else(|_| "./schemas".to_string())
            .into();

        let data_dir = env::var("OPENDB_DATA_DIR")
            .unwrap_or_else(|_| "./open-db".to_string())
            .into();

        let log_level = env::var("OPENDB_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_format = env::var("OPENDB_LOG_FORMAT")
            .map(|s| LogFormat::from_str(&s))
            .unwrap_or(LogFormat::Text);

        Self {
            schema_dir,
            data_dir,
            log_level,
            log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;
    use std::sync::Mutex;

    static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

    const VARS: [&str; 4] = [
        "OPENDB_SCHEMA_DIR",
        "OPENDB_DATA_DIR",
        "OPENDB_LOG_LEVEL",
        "OPENDB_LOG_FORMAT",
    ];

    #[test]
    fn test_default_config() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        for var in VARS {
            env::remove_var(var);
        }

        let config = Config::from_env();

        assert_eq!(config.schema_dir, PathBuf::from("./schemas"));
        assert_eq!(config.data_dir, PathBuf::from("./open-db"));
        assert_eq!(config.log_level, "info");
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_config_overrides() {
        let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
        env::set_var("OPENDB_SCHEMA_DIR", "/tmp/s");
        env::set_var("OPENDB_DATA_DIR", "/tmp/d");
        env::set_var("OPENDB_LOG_LEVEL", "debug");
        env::set_var("OPENDB_LOG_FORMAT", "JSON");

        let config = Config::from_env();

        assert_eq!(config.schema_dir, PathBuf::from("/tmp/s"));
        assert_eq!(config.data_dir, PathBuf::from("/tmp/d"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.log_format, LogFormat::Json);

        for var in VARS {
            env::remove_var(var);
        }
    }
}
