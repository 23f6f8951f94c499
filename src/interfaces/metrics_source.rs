//! Read-side query interface over transactional records.

use async_trait::async_trait;

use crate::metrics::Period;
use crate::model::{
    CustomerRecord, OrderItemRecord, OrderRecord, ProductRecord, ServiceRequestRecord,
};

/// Result type for metrics source operations.
pub type Result<T> = std::result::Result<T, SourceError>;

/// Errors from reading records.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("Metrics source unavailable: {0}")]
    Unavailable(String),

    #[cfg(feature = "sqlite")]
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Failed to decode record: {0}")]
    Decode(String),
}

impl SourceError {
    /// Whether retrying the same query could succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            SourceError::Unavailable(_) => true,
            #[cfg(feature = "sqlite")]
            SourceError::Database(e) => matches!(
                e,
                sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)
            ),
            SourceError::Decode(_) => false,
        }
    }
}

/// Read-only access to orders, items, customers, service requests and products.
///
/// Time-range methods take a half-open [`Period`]: a record matches when
/// `period.start <= created_at < period.end`. Implementations may be slow
/// (a database round trip per call); services issue independent calls
/// concurrently.
///
/// Implementations:
/// - `InMemoryMetricsSource`: dataset held in memory, with failure injection for tests
/// - `SqliteMetricsSource`: SQLite storage (`sqlite` feature)
#[async_trait]
pub trait MetricsSource: Send + Sync {
    /// Orders created in `period`, every status.
    async fn orders_between(&self, period: &Period) -> Result<Vec<OrderRecord>>;

    /// Items whose parent order was created in `period`, every status.
    async fn order_items_between(&self, period: &Period) -> Result<Vec<OrderItemRecord>>;

    /// Every order ever placed.
    async fn all_orders(&self) -> Result<Vec<OrderRecord>>;

    /// Every registered customer.
    async fn customers(&self) -> Result<Vec<CustomerRecord>>;

    /// Customers registered in `period`.
    async fn customers_created_between(&self, period: &Period) -> Result<Vec<CustomerRecord>>;

    /// Service requests created in `period`, every status.
    async fn service_requests_between(&self, period: &Period)
        -> Result<Vec<ServiceRequestRecord>>;

    /// The full product catalog.
    async fn products(&self) -> Result<Vec<ProductRecord>>;
}
