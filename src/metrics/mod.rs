//! Pure aggregation over in-memory record slices.
//!
//! Nothing here performs I/O; the services fetch records and hand slices to
//! these functions.

pub mod aggregate;
pub mod bucket;
pub mod growth;
pub mod inventory;
pub mod period;
pub mod segment;
pub mod service_requests;

pub use aggregate::{
    aggregate, category_distribution, order_status_breakdown, recent_orders, region_distribution,
    top_products, totals_in, CategoryDistributionRow, CountingMode, OrderStatusShare, OrderTotals,
    ProductSales, RecentOrder, RegionSales,
};
pub use bucket::{bucket, Granularity, SalesBucket};
pub use growth::{
    growth, growth_count, growth_decimal, growth_raw, percentage, percentage_decimal, round2,
    round_money,
};
pub use inventory::{alert_status, inventory_alerts, AlertStatus, InventoryAlert};
pub use period::{comparison_period, resolve_period, Period, Timeframe};
pub use segment::{
    classify, customer_activity, summarize_segments, top_customers, CustomerActivity, Segment,
    SegmentRules, SegmentSummary, TopCustomer,
};
pub use service_requests::{service_stats, ServiceStatusShare};
