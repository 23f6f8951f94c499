//! Step definitions for the service composition scenarios.

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{DateTime, Duration, Utc};
use cucumber::{given, then, when, World};
use rust_decimal::Decimal;

use storefront_metrics::config::EngineConfig;
use storefront_metrics::metrics::{Granularity, Timeframe};
use storefront_metrics::model::{Dataset, OrderStatus};
use storefront_metrics::report::{BusinessMetrics, DashboardResponse, SalesTrends};
use storefront_metrics::storage::InMemoryMetricsSource;
use storefront_metrics::test_utils::{item, order, product, sample_dataset};
use storefront_metrics::{AnalyticsService, DashboardService, MetricsError};

use super::instant;

/// Test context for service scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct DashboardWorld {
    now: DateTime<Utc>,
    dataset: Dataset,
    failing: bool,
    latency: Option<StdDuration>,
    config: EngineConfig,
    dashboard: Option<DashboardResponse>,
    business: Option<BusinessMetrics>,
    trends: Option<SalesTrends>,
    last_error: Option<MetricsError>,
}

impl DashboardWorld {
    fn new() -> Self {
        Self {
            now: Utc::now(),
            dataset: Dataset::default(),
            failing: false,
            latency: None,
            config: EngineConfig::for_test(),
            dashboard: None,
            business: None,
            trends: None,
            last_error: None,
        }
    }

    async fn source(&self) -> Arc<InMemoryMetricsSource> {
        let source = Arc::new(InMemoryMetricsSource::from_dataset(self.dataset.clone()));
        source.set_fail_on_read(self.failing).await;
        source.set_latency(self.latency).await;
        source
    }

    fn dashboard(&self) -> &DashboardResponse {
        self.dashboard.as_ref().expect("Dashboard not composed")
    }
}

// --- Given steps ---

#[given(expr = "the sample storefront at {string}")]
async fn given_sample_storefront(world: &mut DashboardWorld, now: String) {
    world.now = instant(&now);
    world.dataset = sample_dataset(world.now);
}

#[given(expr = "an empty storefront at {string}")]
async fn given_empty_storefront(world: &mut DashboardWorld, now: String) {
    world.now = instant(&now);
    world.dataset = Dataset::default();
}

#[given(expr = "products {string} and {string} each sold {int} yesterday")]
async fn given_tied_products(world: &mut DashboardWorld, first: String, second: String, amount: i64) {
    let yesterday = world.now - Duration::days(1);
    for (n, product_id) in [first, second].iter().enumerate() {
        let order_id = format!("tie-{}", n);
        world.dataset.orders.push(order(
            &order_id,
            "c1",
            amount,
            OrderStatus::Delivered,
            yesterday,
        ));
        world
            .dataset
            .order_items
            .push(item(&order_id, product_id, 1, amount));
        world
            .dataset
            .products
            .push(product(product_id, product_id, Some("Tools"), 50, None));
    }
}

#[given("the metrics source is failing")]
async fn given_failing_source(world: &mut DashboardWorld) {
    world.failing = true;
}

#[given(expr = "the metrics source answers after {int} milliseconds")]
async fn given_slow_source(world: &mut DashboardWorld, millis: u64) {
    world.latency = Some(StdDuration::from_millis(millis));
}

#[given(expr = "the query timeout is {int} seconds")]
async fn given_query_timeout(world: &mut DashboardWorld, secs: u64) {
    world.config.query_timeout_secs = secs;
}

// --- When steps ---

#[when(expr = "the {string} dashboard is requested")]
async fn when_dashboard_requested(world: &mut DashboardWorld, token: String) {
    let service = DashboardService::new(world.source().await, world.config.clone());
    match service
        .get_dashboard_stats(Timeframe::parse(&token), world.now)
        .await
    {
        Ok(dashboard) => world.dashboard = Some(dashboard),
        Err(e) => world.last_error = Some(e),
    }
}

#[when(expr = "the {string} sales trend by {string} is requested")]
async fn when_trend_requested(world: &mut DashboardWorld, token: String, group_by: String) {
    let service = AnalyticsService::new(world.source().await, world.config.clone());
    let trends = service
        .get_sales_trends(
            Timeframe::parse(&token),
            Granularity::parse(&group_by),
            world.now,
        )
        .await
        .expect("Sales trends failed");
    world.trends = Some(trends);
}

#[when(expr = "the {string} business metrics are requested")]
async fn when_business_requested(world: &mut DashboardWorld, token: String) {
    let service = AnalyticsService::new(world.source().await, world.config.clone());
    let metrics = service
        .get_business_metrics(Timeframe::parse(&token), world.now)
        .await
        .expect("Business metrics failed");
    world.business = Some(metrics);
}

// --- Then steps ---

#[then(expr = "the dashboard total revenue is {int}")]
async fn then_total_revenue(world: &mut DashboardWorld, revenue: i64) {
    assert_eq!(world.dashboard().summary.total_revenue, Decimal::from(revenue));
}

#[then(expr = "the dashboard total orders is {int}")]
async fn then_total_orders(world: &mut DashboardWorld, orders: u64) {
    assert_eq!(world.dashboard().summary.total_orders, orders);
}

#[then(expr = "the dashboard total customers is {int}")]
async fn then_total_customers(world: &mut DashboardWorld, customers: u64) {
    assert_eq!(world.dashboard().summary.total_customers, customers);
}

#[then(expr = "the dashboard total services is {int}")]
async fn then_total_services(world: &mut DashboardWorld, services: u64) {
    assert_eq!(world.dashboard().summary.total_services, services);
}

#[then(expr = "the dashboard revenue growth is {int}")]
async fn then_revenue_growth(world: &mut DashboardWorld, growth: i64) {
    assert_eq!(world.dashboard().summary.revenue_growth, growth as f64);
}

#[then("every dashboard section is present")]
async fn then_every_section_present(world: &mut DashboardWorld) {
    let json = serde_json::to_value(world.dashboard()).expect("Serialize dashboard");
    for key in [
        "summary",
        "sales",
        "categories",
        "topProducts",
        "segments",
        "serviceStats",
        "geography",
        "inventoryAlerts",
        "orderStatus",
        "recentOrders",
        "period",
        "comparisonPeriod",
    ] {
        assert!(json.get(key).is_some(), "Missing section {}", key);
    }
    assert_eq!(json["timeframe"], serde_json::json!("30d"));
}

#[then(expr = "the service stats are {string}")]
async fn then_service_stats(world: &mut DashboardWorld, statuses: String) {
    let actual: Vec<&str> = world
        .dashboard()
        .service_stats
        .iter()
        .map(|s| s.status.as_str())
        .collect();
    assert_eq!(actual.join(", "), statuses);
}

#[then(expr = "the regions are {string}")]
async fn then_regions(world: &mut DashboardWorld, regions: String) {
    let actual: Vec<&str> = world
        .dashboard()
        .geography
        .iter()
        .map(|r| r.region.as_str())
        .collect();
    assert_eq!(actual.join(", "), regions);
}

#[then(expr = "the {string} segment has {int} customer(s)")]
async fn then_segment_count(world: &mut DashboardWorld, segment: String, count: u64) {
    let summary = world
        .dashboard()
        .segments
        .iter()
        .find(|s| s.segment.as_str() == segment)
        .expect("Segment missing from dashboard");
    assert_eq!(summary.count, count);
}

#[then(expr = "the top products are {string}")]
async fn then_top_products(world: &mut DashboardWorld, ids: String) {
    let actual: Vec<&str> = world
        .dashboard()
        .top_products
        .iter()
        .map(|p| p.id.as_str())
        .collect();
    assert_eq!(actual.join(", "), ids);
}

#[then("the request fails with a source error")]
async fn then_fails_with_source_error(world: &mut DashboardWorld) {
    assert!(world.dashboard.is_none(), "Expected no partial dashboard");
    assert!(matches!(world.last_error, Some(MetricsError::Source(_))));
}

#[then("the request fails with a timeout")]
async fn then_fails_with_timeout(world: &mut DashboardWorld) {
    assert!(world.dashboard.is_none(), "Expected no partial dashboard");
    assert!(matches!(
        world.last_error,
        Some(MetricsError::Timeout { .. })
    ));
}

#[then("the failure is retryable")]
async fn then_failure_retryable(world: &mut DashboardWorld) {
    let error = world.last_error.as_ref().expect("Request did not fail");
    assert!(error.is_retryable());
}

#[then(expr = "the trend has {int} buckets")]
async fn then_trend_buckets(world: &mut DashboardWorld, count: usize) {
    let trends = world.trends.as_ref().expect("Trend not requested");
    assert_eq!(trends.sales.len(), count);
}

#[then("the trend bucket orders sum to the summary order count")]
async fn then_trend_counts_match(world: &mut DashboardWorld) {
    let trends = world.trends.as_ref().expect("Trend not requested");
    let bucketed: u64 = trends.sales.iter().map(|b| b.orders).sum();
    assert_eq!(bucketed, trends.summary.total_orders);
}

#[then(expr = "the trend summary revenue is {int}")]
async fn then_trend_revenue(world: &mut DashboardWorld, revenue: i64) {
    let trends = world.trends.as_ref().expect("Trend not requested");
    assert_eq!(trends.summary.total_revenue, Decimal::from(revenue));
}

#[then(expr = "the top customers are {string}")]
async fn then_top_customers(world: &mut DashboardWorld, ids: String) {
    let metrics = world.business.as_ref().expect("Business metrics not requested");
    let actual: Vec<&str> = metrics
        .top_customers
        .iter()
        .map(|c| c.id.as_str())
        .collect();
    assert_eq!(actual.join(", "), ids);
}

#[then(expr = "the sales summary average order value is {int}")]
async fn then_average_order_value(world: &mut DashboardWorld, value: i64) {
    let metrics = world.business.as_ref().expect("Business metrics not requested");
    assert_eq!(metrics.summary.average_order_value, Decimal::from(value));
}
