//! Bootstrap utilities for storefront-metrics binaries.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::{Config, LOG_ENV_VAR};
use crate::interfaces::MetricsSource;
use crate::storage::init_source;

/// Initialize tracing with the METRICS_LOG environment variable.
///
/// Defaults to "info" level if METRICS_LOG is not set.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_env(LOG_ENV_VAR)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Load configuration and open the configured metrics source.
pub async fn load_source(
    config_path: Option<&str>,
) -> Result<(Config, Arc<dyn MetricsSource>), Box<dyn std::error::Error>> {
    let config = Config::load(config_path)?;
    let source = init_source(&config.storage).await?;
    Ok((config, source))
}
