//! Admin dashboard composition.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::with_deadline;
use crate::config::EngineConfig;
use crate::error::Result;
use crate::interfaces::MetricsSource;
use crate::metrics::{
    bucket, category_distribution, growth_count, growth_decimal, inventory_alerts,
    order_status_breakdown, recent_orders, region_distribution, resolve_period, service_stats,
    summarize_segments, top_products, totals_in, CountingMode, Granularity, Period, Timeframe,
};
use crate::report::{DashboardResponse, DashboardSummary};

/// Dashboard service.
///
/// Builds the full admin dashboard for a timeframe: headline KPIs with
/// growth, sales trend, category mix, top products, customer segments,
/// service request stats, geography, inventory alerts, order status and
/// recent orders.
pub struct DashboardService {
    source: Arc<dyn MetricsSource>,
    config: EngineConfig,
}

impl DashboardService {
    pub fn new(source: Arc<dyn MetricsSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Dashboard with the configured default trend granularity.
    pub async fn get_dashboard_stats(
        &self,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse> {
        self.get_dashboard_stats_grouped(timeframe, self.config.default_group_by, now)
            .await
    }

    pub async fn get_dashboard_stats_now(&self, timeframe: Timeframe) -> Result<DashboardResponse> {
        self.get_dashboard_stats(timeframe, Utc::now()).await
    }

    /// Dashboard with the sales trend bucketed by `group_by`.
    pub async fn get_dashboard_stats_grouped(
        &self,
        timeframe: Timeframe,
        group_by: Granularity,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse> {
        let period = resolve_period(timeframe, now);
        info!(
            timeframe = %timeframe,
            group_by = %group_by,
            period = %period,
            "GetDashboardStats"
        );

        with_deadline(
            "dashboard",
            self.config.query_timeout(),
            self.compose(timeframe, group_by, period, now),
        )
        .await
    }

    async fn compose(
        &self,
        timeframe: Timeframe,
        group_by: Granularity,
        period: Period,
        now: DateTime<Utc>,
    ) -> Result<DashboardResponse> {
        let comparison = period.comparison();
        let source = self.source.as_ref();

        let (
            orders,
            previous_orders,
            items,
            lifetime_orders,
            customers,
            new_customers,
            previous_new_customers,
            requests,
            products,
        ) = tokio::try_join!(
            source.orders_between(&period),
            source.orders_between(&comparison),
            source.order_items_between(&period),
            source.all_orders(),
            source.customers(),
            source.customers_created_between(&period),
            source.customers_created_between(&comparison),
            source.service_requests_between(&period),
            source.products(),
        )?;

        debug!(
            orders = orders.len(),
            previous_orders = previous_orders.len(),
            items = items.len(),
            customers = customers.len(),
            service_requests = requests.len(),
            products = products.len(),
            "Fetched dashboard records"
        );

        let current = totals_in(&orders, &period);
        let previous = totals_in(&previous_orders, &comparison);
        let total_customers = new_customers.len() as u64;
        let previous_customers = previous_new_customers.len() as u64;

        let summary = DashboardSummary {
            total_revenue: current.revenue,
            total_orders: current.count(CountingMode::AllOrders),
            total_customers,
            total_services: requests.len() as u64,
            revenue_growth: growth_decimal(current.revenue, previous.revenue),
            order_growth: growth_count(
                current.count(CountingMode::AllOrders),
                previous.count(CountingMode::AllOrders),
            ),
            customer_growth: growth_count(total_customers, previous_customers),
        };

        Ok(DashboardResponse {
            timeframe,
            period,
            comparison_period: comparison,
            generated_at: now,
            summary,
            sales: bucket(&orders, &period, group_by),
            categories: category_distribution(&orders, &items, &products, &period),
            top_products: top_products(
                &orders,
                &items,
                &products,
                &period,
                self.config.top_products_limit,
            ),
            segments: summarize_segments(&customers, &lifetime_orders, now, &self.config.segments),
            service_stats: service_stats(&requests, &period),
            geography: region_distribution(&orders, &period, self.config.top_regions_limit),
            inventory_alerts: inventory_alerts(&products, self.config.default_minimum_stock),
            order_status: order_status_breakdown(&orders, &period),
            recent_orders: recent_orders(&orders, &period, self.config.recent_orders_limit),
        })
    }
}
