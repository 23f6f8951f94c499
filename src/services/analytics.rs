//! Business analytics service.
//!
//! Unlike the dashboard, analytics sections are individually callable so a
//! page can load only what it shows.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use super::{sales_summary, with_deadline};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::interfaces::MetricsSource;
use crate::metrics::{
    bucket, category_distribution, inventory_alerts, region_distribution, resolve_period,
    service_stats, summarize_segments, top_customers, top_products, totals_in, Granularity,
    InventoryAlert, RegionSales, SegmentSummary, ServiceStatusShare, Timeframe,
};
use crate::report::{BusinessMetrics, SalesTrends};

/// Analytics service.
pub struct AnalyticsService {
    source: Arc<dyn MetricsSource>,
    config: EngineConfig,
}

impl AnalyticsService {
    pub fn new(source: Arc<dyn MetricsSource>, config: EngineConfig) -> Self {
        Self { source, config }
    }

    /// Sales summary, category mix, top products, segments, top customers
    /// and geography for `timeframe`.
    pub async fn get_business_metrics(
        &self,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<BusinessMetrics> {
        let period = resolve_period(timeframe, now);
        let comparison = period.comparison();
        info!(timeframe = %timeframe, period = %period, "GetBusinessMetrics");

        with_deadline("business_metrics", self.config.query_timeout(), async {
            let source = self.source.as_ref();
            let (orders, previous_orders, items, lifetime_orders, customers, products) = tokio::try_join!(
                source.orders_between(&period),
                source.orders_between(&comparison),
                source.order_items_between(&period),
                source.all_orders(),
                source.customers(),
                source.products(),
            )?;
            debug!(
                orders = orders.len(),
                items = items.len(),
                customers = customers.len(),
                "Fetched business metrics records"
            );

            let current = totals_in(&orders, &period);
            let previous = totals_in(&previous_orders, &comparison);
            let rules = &self.config.segments;

            Ok(BusinessMetrics {
                timeframe,
                period,
                summary: sales_summary(&current, &previous),
                categories: category_distribution(&orders, &items, &products, &period),
                top_products: top_products(
                    &orders,
                    &items,
                    &products,
                    &period,
                    self.config.top_products_limit,
                ),
                segments: summarize_segments(&customers, &lifetime_orders, now, rules),
                top_customers: top_customers(
                    &customers,
                    &lifetime_orders,
                    &period,
                    now,
                    rules,
                    self.config.top_customers_limit,
                ),
                geography: region_distribution(&orders, &period, self.config.top_regions_limit),
            })
        })
        .await
    }

    pub async fn get_business_metrics_now(&self, timeframe: Timeframe) -> Result<BusinessMetrics> {
        self.get_business_metrics(timeframe, Utc::now()).await
    }

    /// Revenue-eligible orders in `timeframe` bucketed by `group_by`.
    ///
    /// The summary covers the bucketed population, so its order count
    /// excludes cancellations.
    pub async fn get_sales_trends(
        &self,
        timeframe: Timeframe,
        group_by: Granularity,
        now: DateTime<Utc>,
    ) -> Result<SalesTrends> {
        let period = resolve_period(timeframe, now);
        let comparison = period.comparison();
        info!(timeframe = %timeframe, group_by = %group_by, period = %period, "GetSalesTrends");

        with_deadline("sales_trends", self.config.query_timeout(), async {
            let (orders, previous_orders) = tokio::try_join!(
                self.source.orders_between(&period),
                self.source.orders_between(&comparison),
            )?;
            debug!(orders = orders.len(), previous_orders = previous_orders.len(), "Fetched orders");

            let current = totals_in(&orders, &period);
            let previous = totals_in(&previous_orders, &comparison);

            Ok(SalesTrends {
                timeframe,
                group_by,
                period,
                sales: bucket(&orders, &period, group_by),
                summary: sales_summary(&current, &previous),
            })
        })
        .await
    }

    pub async fn get_sales_trends_now(
        &self,
        timeframe: Timeframe,
        group_by: Granularity,
    ) -> Result<SalesTrends> {
        self.get_sales_trends(timeframe, group_by, Utc::now()).await
    }

    /// Every customer classified by lifetime activity as of `now`.
    pub async fn get_customer_segments(&self, now: DateTime<Utc>) -> Result<Vec<SegmentSummary>> {
        info!("GetCustomerSegments");

        with_deadline("customer_segments", self.config.query_timeout(), async {
            let (customers, orders) =
                tokio::try_join!(self.source.customers(), self.source.all_orders())?;
            Ok(summarize_segments(
                &customers,
                &orders,
                now,
                &self.config.segments,
            ))
        })
        .await
    }

    pub async fn get_customer_segments_now(&self) -> Result<Vec<SegmentSummary>> {
        self.get_customer_segments(Utc::now()).await
    }

    pub async fn get_inventory_alerts(&self) -> Result<Vec<InventoryAlert>> {
        info!("GetInventoryAlerts");

        with_deadline("inventory_alerts", self.config.query_timeout(), async {
            let products = self.source.products().await?;
            Ok(inventory_alerts(&products, self.config.default_minimum_stock))
        })
        .await
    }

    pub async fn get_service_stats(
        &self,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Vec<ServiceStatusShare>> {
        let period = resolve_period(timeframe, now);
        info!(timeframe = %timeframe, period = %period, "GetServiceStats");

        with_deadline("service_stats", self.config.query_timeout(), async {
            let requests = self.source.service_requests_between(&period).await?;
            Ok(service_stats(&requests, &period))
        })
        .await
    }

    pub async fn get_service_stats_now(&self, timeframe: Timeframe) -> Result<Vec<ServiceStatusShare>> {
        self.get_service_stats(timeframe, Utc::now()).await
    }

    pub async fn get_geographic_distribution(
        &self,
        timeframe: Timeframe,
        now: DateTime<Utc>,
    ) -> Result<Vec<RegionSales>> {
        let period = resolve_period(timeframe, now);
        info!(timeframe = %timeframe, period = %period, "GetGeographicDistribution");

        with_deadline("geographic_distribution", self.config.query_timeout(), async {
            let orders = self.source.orders_between(&period).await?;
            Ok(region_distribution(&orders, &period, self.config.top_regions_limit))
        })
        .await
    }

    pub async fn get_geographic_distribution_now(
        &self,
        timeframe: Timeframe,
    ) -> Result<Vec<RegionSales>> {
        self.get_geographic_distribution(timeframe, Utc::now()).await
    }
}
