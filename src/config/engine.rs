//! Engine settings: defaults, list limits and the composition deadline.

use std::time::Duration;

use serde::Deserialize;

use crate::metrics::{Granularity, SegmentRules, Timeframe};
use crate::model::DEFAULT_MINIMUM_STOCK;

/// Default deadline for one composed response.
pub const DEFAULT_QUERY_TIMEOUT_SECS: u64 = 30;

/// Default length of every top-N list.
pub const DEFAULT_LIST_LIMIT: usize = 10;

/// Metrics engine configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Timeframe used when a request does not name one.
    pub default_timeframe: Timeframe,

    /// Trend bucket width used when a request does not name one.
    pub default_group_by: Granularity,

    /// Deadline for a whole composed response, in seconds.
    ///
    /// Exceeding it fails the request; nothing partial is returned.
    pub query_timeout_secs: u64,

    /// Number of products in the top-products list.
    pub top_products_limit: usize,

    /// Number of regions in the geographic distribution.
    pub top_regions_limit: usize,

    /// Number of customers in the top-customers list.
    pub top_customers_limit: usize,

    /// Number of orders in the recent-orders list.
    pub recent_orders_limit: usize,

    /// Reorder point for products without one.
    pub default_minimum_stock: u32,

    /// Customer segmentation thresholds.
    pub segments: SegmentRules,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_timeframe: Timeframe::default(),
            default_group_by: Granularity::default(),
            query_timeout_secs: DEFAULT_QUERY_TIMEOUT_SECS,
            top_products_limit: DEFAULT_LIST_LIMIT,
            top_regions_limit: DEFAULT_LIST_LIMIT,
            top_customers_limit: DEFAULT_LIST_LIMIT,
            recent_orders_limit: DEFAULT_LIST_LIMIT,
            default_minimum_stock: DEFAULT_MINIMUM_STOCK,
            segments: SegmentRules::default(),
        }
    }
}

impl EngineConfig {
    pub fn query_timeout(&self) -> Duration {
        Duration::from_secs(self.query_timeout_secs)
    }

    /// Settings for tests: defaults with a short deadline.
    pub fn for_test() -> Self {
        Self {
            query_timeout_secs: 5,
            ..Default::default()
        }
    }
}
