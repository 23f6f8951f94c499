//! Storefront Metrics - business metrics aggregation engine
//!
//! Turns orders, order items, customers, service requests and products
//! into dashboard KPIs: revenue/order/customer growth, sales trends,
//! category and product breakdowns, customer segments, inventory alerts
//! and geographic distribution.

pub mod config;
pub mod error;
pub mod interfaces;
pub mod metrics;
pub mod model;
pub mod report;
pub mod services;
pub mod storage;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
pub mod utils;

pub use error::{MetricsError, Result};
pub use interfaces::{MetricsSource, SourceError};
pub use services::{AnalyticsService, DashboardService};
