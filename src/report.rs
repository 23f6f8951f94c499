//! Serializable response structures returned by the services.
//!
//! Field names serialize in camelCase to match what the admin UI consumes.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::metrics::{
    CategoryDistributionRow, Granularity, InventoryAlert, OrderStatusShare, Period, ProductSales,
    RecentOrder, RegionSales, SalesBucket, SegmentSummary, ServiceStatusShare, Timeframe,
    TopCustomer,
};

/// Headline KPIs for the dashboard with growth against the comparison period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Revenue from non-cancelled orders in the period.
    pub total_revenue: Decimal,
    /// Orders placed in the period, every status.
    pub total_orders: u64,
    /// Customers registered in the period.
    pub total_customers: u64,
    /// Service requests created in the period, every status.
    pub total_services: u64,
    pub revenue_growth: f64,
    pub order_growth: f64,
    pub customer_growth: f64,
}

/// Sales totals over revenue-eligible orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesSummary {
    pub total_revenue: Decimal,
    /// Revenue-eligible orders only.
    pub total_orders: u64,
    pub average_order_value: Decimal,
    pub revenue_growth: f64,
}

/// The full admin dashboard.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub timeframe: Timeframe,
    pub period: Period,
    pub comparison_period: Period,
    pub generated_at: DateTime<Utc>,
    pub summary: DashboardSummary,
    pub sales: Vec<SalesBucket>,
    pub categories: Vec<CategoryDistributionRow>,
    pub top_products: Vec<ProductSales>,
    pub segments: Vec<SegmentSummary>,
    pub service_stats: Vec<ServiceStatusShare>,
    pub geography: Vec<RegionSales>,
    pub inventory_alerts: Vec<InventoryAlert>,
    pub order_status: Vec<OrderStatusShare>,
    pub recent_orders: Vec<RecentOrder>,
}

/// Business analytics for one timeframe.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BusinessMetrics {
    pub timeframe: Timeframe,
    pub period: Period,
    pub summary: SalesSummary,
    pub categories: Vec<CategoryDistributionRow>,
    pub top_products: Vec<ProductSales>,
    pub segments: Vec<SegmentSummary>,
    pub top_customers: Vec<TopCustomer>,
    pub geography: Vec<RegionSales>,
}

/// A bucketed sales series and its totals.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesTrends {
    pub timeframe: Timeframe,
    pub group_by: Granularity,
    pub period: Period,
    pub sales: Vec<SalesBucket>,
    pub summary: SalesSummary,
}
