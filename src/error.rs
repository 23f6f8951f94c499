//! Errors surfaced by the metrics services.

use std::time::Duration;

use crate::interfaces::SourceError;

/// Result type for service operations.
pub type Result<T> = std::result::Result<T, MetricsError>;

/// A failed metrics composition.
///
/// Services never return partial results: any failed record query or an
/// exceeded deadline fails the whole response.
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Metrics source failed: {0}")]
    Source(#[from] SourceError),

    #[error("Metrics composition timed out after {elapsed:?}")]
    Timeout { elapsed: Duration },
}

impl MetricsError {
    /// Whether the caller may retry the same request.
    pub fn is_retryable(&self) -> bool {
        match self {
            MetricsError::Source(e) => e.is_retryable(),
            MetricsError::Timeout { .. } => true,
        }
    }
}
