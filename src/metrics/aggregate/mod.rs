//! Folding order records into totals and per-key breakdowns.
//!
//! Revenue never includes cancelled orders. Order counts come in two
//! flavours, selected with [`CountingMode`]: "orders placed" counts every
//! status, "revenue-eligible orders" skips cancellations.

mod lines;

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use super::growth::{percentage, percentage_decimal, round_money};
use super::period::Period;
use crate::model::{OrderRecord, OrderStatus};

pub use lines::{category_distribution, top_products, CategoryDistributionRow, ProductSales};

/// Which orders an order count includes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountingMode {
    /// Every order placed, whatever its status.
    AllOrders,
    /// Orders that count toward revenue (not cancelled).
    RevenueEligibleOrders,
}

/// Revenue and order counts for a set of orders.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrderTotals {
    pub revenue: Decimal,
    pub all_orders: u64,
    pub revenue_eligible_orders: u64,
}

impl OrderTotals {
    pub fn add(&mut self, order: &OrderRecord) {
        self.all_orders += 1;
        if order.is_revenue_eligible() {
            self.revenue += order.total_amount;
            self.revenue_eligible_orders += 1;
        }
    }

    pub fn count(&self, mode: CountingMode) -> u64 {
        match mode {
            CountingMode::AllOrders => self.all_orders,
            CountingMode::RevenueEligibleOrders => self.revenue_eligible_orders,
        }
    }

    /// Revenue per revenue-eligible order, 0 when there are none.
    pub fn average_order_value(&self) -> Decimal {
        average(self.revenue, self.revenue_eligible_orders)
    }
}

/// Revenue divided by a count, rounded for display. Zero count yields zero.
pub fn average(revenue: Decimal, count: u64) -> Decimal {
    if count == 0 {
        return Decimal::ZERO;
    }
    round_money(revenue / Decimal::from(count))
}

/// Fold every order accepted by `predicate`.
pub fn aggregate<F>(orders: &[OrderRecord], predicate: F) -> OrderTotals
where
    F: Fn(&OrderRecord) -> bool,
{
    orders
        .iter()
        .filter(|o| predicate(o))
        .fold(OrderTotals::default(), |mut totals, order| {
            totals.add(order);
            totals
        })
}

/// Totals for orders created inside `period`.
pub fn totals_in(orders: &[OrderRecord], period: &Period) -> OrderTotals {
    aggregate(orders, |o| period.contains(o.created_at))
}

/// Revenue and order count for one region.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegionSales {
    pub region: String,
    pub orders: u64,
    pub revenue: Decimal,
    /// Share of in-period revenue across all regions.
    pub percentage: f64,
}

/// Revenue by wilaya for revenue-eligible orders in `period`.
///
/// Sorted by revenue descending, ties by region name, truncated to `limit`.
/// Percentages are relative to revenue over every region, including those
/// cut by the limit.
pub fn region_distribution(
    orders: &[OrderRecord],
    period: &Period,
    limit: usize,
) -> Vec<RegionSales> {
    let mut by_region: HashMap<&str, OrderTotals> = HashMap::new();
    let mut total_revenue = Decimal::ZERO;

    for order in orders
        .iter()
        .filter(|o| period.contains(o.created_at) && o.is_revenue_eligible())
    {
        by_region.entry(order.region()).or_default().add(order);
        total_revenue += order.total_amount;
    }

    let mut rows: Vec<RegionSales> = by_region
        .into_iter()
        .map(|(region, totals)| RegionSales {
            region: region.to_string(),
            orders: totals.revenue_eligible_orders,
            revenue: totals.revenue,
            percentage: percentage_decimal(totals.revenue, total_revenue),
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.region.cmp(&b.region)));
    rows.truncate(limit);
    rows
}

/// Count of orders in one status.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusShare {
    pub status: OrderStatus,
    pub count: u64,
    pub percentage: f64,
}

/// Orders placed in `period`, by status.
///
/// Includes cancelled orders; percentages are of all orders placed. Only
/// statuses with at least one order appear, in lifecycle order.
pub fn order_status_breakdown(orders: &[OrderRecord], period: &Period) -> Vec<OrderStatusShare> {
    let mut counts: HashMap<OrderStatus, u64> = HashMap::new();
    let mut total = 0u64;
    for order in orders.iter().filter(|o| period.contains(o.created_at)) {
        *counts.entry(order.status).or_default() += 1;
        total += 1;
    }

    OrderStatus::ALL
        .into_iter()
        .filter_map(|status| {
            counts.get(&status).map(|&count| OrderStatusShare {
                status,
                count,
                percentage: percentage(count as f64, total as f64),
            })
        })
        .collect()
}

/// Summary line for the recent-orders list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentOrder {
    pub id: String,
    pub customer_id: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

/// The newest `limit` orders placed in `period`, any status.
///
/// Ties on creation time are broken by order id so output is stable.
pub fn recent_orders(orders: &[OrderRecord], period: &Period, limit: usize) -> Vec<RecentOrder> {
    let mut in_period: Vec<&OrderRecord> = orders
        .iter()
        .filter(|o| period.contains(o.created_at))
        .collect();
    in_period.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| a.id.cmp(&b.id)));

    in_period
        .into_iter()
        .take(limit)
        .map(|o| RecentOrder {
            id: o.id.clone(),
            customer_id: o.customer_id.clone(),
            total_amount: o.total_amount,
            status: o.status,
            created_at: o.created_at,
        })
        .collect()
}
