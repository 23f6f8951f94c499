//! Application configuration.
//!
//! Aggregates configuration from all modules into a single Config struct
//! that can be loaded from YAML files or environment variables.

mod engine;

pub use engine::{EngineConfig, DEFAULT_LIST_LIMIT, DEFAULT_QUERY_TIMEOUT_SECS};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE: &str = "metrics.yaml";
/// Environment variable for configuration file path.
pub const CONFIG_ENV_VAR: &str = "METRICS_CONFIG";
/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "METRICS";
/// Environment variable for logging configuration.
pub const LOG_ENV_VAR: &str = "METRICS_LOG";

/// Environment variable selecting the CLI report.
pub const REPORT_ENV_VAR: &str = "METRICS_REPORT";
/// Environment variable for the CLI timeframe.
pub const TIMEFRAME_ENV_VAR: &str = "METRICS_TIMEFRAME";
/// Environment variable for the CLI trend bucket width.
pub const GROUP_BY_ENV_VAR: &str = "METRICS_GROUP_BY";

use serde::Deserialize;

use crate::storage::StorageConfig;

/// Main application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine configuration.
    pub engine: EngineConfig,
    /// Storage configuration.
    pub storage: StorageConfig,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to load config: {0}")]
    Load(#[from] ::config::ConfigError),
}

impl Config {
    /// Load configuration from file and environment.
    ///
    /// Configuration sources (in order of priority, later overrides earlier):
    /// 1. `metrics.yaml` in current directory (if exists)
    /// 2. File specified by `path` argument (if provided)
    /// 3. File specified by `CONFIG_ENV_VAR` environment variable (if set)
    /// 4. Environment variables with `CONFIG_ENV_PREFIX` prefix
    pub fn load(path: Option<&str>) -> Result<Self, ConfigError> {
        use ::config::{Config as ConfigLib, Environment, File, FileFormat};

        let mut builder = ConfigLib::builder()
            .add_source(File::new(DEFAULT_CONFIG_FILE, FileFormat::Yaml).required(false));

        if let Some(config_path) = path {
            builder = builder.add_source(File::new(config_path, FileFormat::Yaml).required(true));
        }

        if let Ok(config_path) = std::env::var(CONFIG_ENV_VAR) {
            builder = builder.add_source(File::new(&config_path, FileFormat::Yaml).required(true));
        }

        let config = builder
            .add_source(
                Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let config: Config = config.try_deserialize()?;
        Ok(config)
    }

    /// Create config for testing.
    pub fn for_test() -> Self {
        Self {
            engine: EngineConfig::for_test(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;

    use crate::metrics::Timeframe;

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.storage.storage_type, "memory");
        assert!(config.storage.path.is_empty());
        assert_eq!(config.engine.query_timeout_secs, 30);
    }

    #[test]
    fn test_config_for_test() {
        let config = Config::for_test();
        assert_eq!(config.engine.query_timeout_secs, 5);
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
engine:
  default_timeframe: 90d
  default_group_by: month
  query_timeout_secs: 12
  segments:
    vip_spend_threshold: 75000

storage:
  type: sqlite
  path: /tmp/metrics.db
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.engine.default_timeframe, Timeframe::NinetyDays);
        assert_eq!(config.engine.query_timeout_secs, 12);
        assert_eq!(
            config.engine.segments.vip_spend_threshold,
            rust_decimal::Decimal::from(75_000)
        );
        assert_eq!(config.storage.storage_type, "sqlite");
        assert_eq!(config.storage.path, "/tmp/metrics.db");
    }

    #[test]
    #[serial]
    fn test_load_from_file_with_env_override() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "engine:\n  top_products_limit: 3\nstorage:\n  type: memory").unwrap();

        std::env::set_var("METRICS__ENGINE__QUERY_TIMEOUT_SECS", "7");
        let config = Config::load(file.path().to_str());
        std::env::remove_var("METRICS__ENGINE__QUERY_TIMEOUT_SECS");

        let config = config.unwrap();
        assert_eq!(config.engine.top_products_limit, 3);
        assert_eq!(config.engine.query_timeout_secs, 7);
    }

    #[test]
    #[serial]
    fn test_load_missing_required_file_fails() {
        assert!(Config::load(Some("/nonexistent/metrics.yaml")).is_err());
    }
}
