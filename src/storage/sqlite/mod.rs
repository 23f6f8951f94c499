//! SQLite implementation of the metrics source.

mod metrics_source;

pub use metrics_source::SqliteMetricsSource;
