//! Metrics services.
//!
//! Each service fetches the record sets a response needs concurrently,
//! folds them with the pure functions in [`crate::metrics`], and enforces
//! the configured deadline around the whole composition.

pub mod analytics;
pub mod dashboard;

pub use analytics::AnalyticsService;
pub use dashboard::DashboardService;

use std::future::Future;
use std::time::Duration;

use tracing::error;

use crate::error::{MetricsError, Result};
use crate::metrics::{growth_decimal, OrderTotals};
use crate::report::SalesSummary;

/// Run `composition`, failing with [`MetricsError::Timeout`] if it does not
/// finish within `deadline`.
pub(crate) async fn with_deadline<T, F>(operation: &str, deadline: Duration, composition: F) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(deadline, composition).await {
        Ok(result) => result,
        Err(_) => {
            error!(operation = %operation, deadline = ?deadline, "Metrics composition timed out");
            Err(MetricsError::Timeout { elapsed: deadline })
        }
    }
}

/// Sales summary over revenue-eligible orders, with revenue growth.
pub(crate) fn sales_summary(current: &OrderTotals, previous: &OrderTotals) -> SalesSummary {
    SalesSummary {
        total_revenue: current.revenue,
        total_orders: current.revenue_eligible_orders,
        average_order_value: current.average_order_value(),
        revenue_growth: growth_decimal(current.revenue, previous.revenue),
    }
}
