//! OpenDB form engine launcher.
//!
//! Loads every category from the configured directories, validates it and
//! logs the results. The interactive editor drives the same library.

use opendb_forms::config::{Config, LogFormat};
use opendb_forms::{CategorySession, RecordStore, SchemaStore};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env();

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(env_filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
    }

    tracing::info!("Starting OpenDB form engine");
    tracing::info!("Schema directory: {:?}", config.schema_dir);
    tracing::info!("Data directory: {:?}", config.data_dir);

    let schemas = SchemaStore::open(&config.schema_dir)?;
    let records = RecordStore::open(&config.data_dir)?;

    let set = schemas.load_all()?;
    for issue in &set.issues {
        tracing::warn!("{}", issue);
    }
    if set.schemas.is_empty() {
        tracing::warn!("No schemas found in {:?}", config.schema_dir);
    }

    for (category, schema) in set.schemas {
        let (session, issues) = match CategorySession::load(&records, &category, schema) {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::error!("Failed to load category {}: {}", category, e);
                continue;
            }
        };
        for issue in &issues {
            tracing::warn!("{}", issue);
        }

        for (id, report) in &session.report().reports {
            if !report.is_valid {
                tracing::info!("{} {}: {}", category, id, report.describe().join(" "));
            }
        }
        tracing::info!("{}: {}", category, session.summary());
    }

    Ok(())
}
