//! Metrics source implementations.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info};

use crate::interfaces::MetricsSource;

pub mod memory;
#[cfg(feature = "sqlite")]
pub mod schema;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::InMemoryMetricsSource;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteMetricsSource;

/// Database file used by the sqlite backend when no path is configured.
pub const DEFAULT_SQLITE_PATH: &str = "./data/metrics.db";

/// Storage configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage type (memory, sqlite).
    #[serde(rename = "type")]
    pub storage_type: String,
    /// Database file for sqlite, snapshot file for memory.
    ///
    /// An empty path yields an empty dataset with the memory backend and
    /// `DEFAULT_SQLITE_PATH` with the sqlite backend.
    pub path: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: "memory".to_string(),
            path: String::new(),
        }
    }
}

/// Initialize the metrics source based on configuration.
pub async fn init_source(
    config: &StorageConfig,
) -> Result<Arc<dyn MetricsSource>, Box<dyn std::error::Error>> {
    info!("Metrics source: {} at {}", config.storage_type, config.path);

    match config.storage_type.as_str() {
        "memory" => {
            if config.path.is_empty() {
                return Ok(Arc::new(InMemoryMetricsSource::new()));
            }
            Ok(Arc::new(InMemoryMetricsSource::from_file(&config.path)?))
        }
        #[cfg(feature = "sqlite")]
        "sqlite" => {
            let path = if config.path.is_empty() {
                DEFAULT_SQLITE_PATH
            } else {
                config.path.as_str()
            };
            if let Some(parent) = std::path::Path::new(path).parent() {
                std::fs::create_dir_all(parent)?;
            }

            let pool = sqlx::SqlitePool::connect(&format!("sqlite:{}?mode=rwc", path)).await?;

            let source = SqliteMetricsSource::new(pool);
            source.init().await?;

            Ok(Arc::new(source))
        }
        #[cfg(not(feature = "sqlite"))]
        "sqlite" => {
            error!("SQLite storage requested but 'sqlite' feature is not enabled");
            Err("SQLite feature not enabled".into())
        }
        other => {
            error!("Unknown storage type: {}", other);
            Err(format!("Unknown storage type: {}", other).into())
        }
    }
}
