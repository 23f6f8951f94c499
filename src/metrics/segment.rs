//! Customer segmentation by lifetime spend and order recency.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::aggregate::average;
use super::growth::percentage_decimal;
use super::period::Period;
use crate::model::{CustomerRecord, OrderRecord};

/// Days-since-last-order reported for customers with no qualifying order.
pub const NO_ORDER_SENTINEL_DAYS: i64 = 999;

/// Mutually exclusive customer classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Segment {
    New,
    Regular,
    Vip,
    AtRisk,
    Lost,
}

impl Segment {
    pub const ALL: [Segment; 5] = [
        Segment::New,
        Segment::Regular,
        Segment::Vip,
        Segment::AtRisk,
        Segment::Lost,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Segment::New => "NEW",
            Segment::Regular => "REGULAR",
            Segment::Vip => "VIP",
            Segment::AtRisk => "AT_RISK",
            Segment::Lost => "LOST",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Thresholds for [`classify`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentRules {
    /// Lifetime spend above which a customer is VIP.
    pub vip_spend_threshold: Decimal,
    /// Inactivity (days) above which a customer is at risk.
    pub at_risk_after_days: i64,
    /// Inactivity (days) above which a customer is lost.
    pub lost_after_days: i64,
}

impl Default for SegmentRules {
    fn default() -> Self {
        Self {
            vip_spend_threshold: Decimal::from(50_000),
            at_risk_after_days: 90,
            lost_after_days: 180,
        }
    }
}

/// Lifetime activity of one customer, folded from their orders.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CustomerActivity {
    /// Sum of non-cancelled order totals.
    pub total_spent: Decimal,
    /// Number of non-cancelled orders.
    pub order_count: u64,
    pub last_order_at: Option<DateTime<Utc>>,
}

impl CustomerActivity {
    pub fn add(&mut self, order: &OrderRecord) {
        if !order.is_revenue_eligible() {
            return;
        }
        self.total_spent += order.total_amount;
        self.order_count += 1;
        self.last_order_at = Some(match self.last_order_at {
            Some(last) if last >= order.created_at => last,
            _ => order.created_at,
        });
    }

    /// Whole days since the last qualifying order, or the 999 sentinel.
    pub fn days_since_last_order(&self, now: DateTime<Utc>) -> i64 {
        self.last_order_at
            .map(|last| (now - last).num_days())
            .unwrap_or(NO_ORDER_SENTINEL_DAYS)
    }
}

/// Fold orders into per-customer activity.
pub fn customer_activity<'a>(
    orders: impl IntoIterator<Item = &'a OrderRecord>,
) -> HashMap<String, CustomerActivity> {
    let mut activity: HashMap<String, CustomerActivity> = HashMap::new();
    for order in orders.into_iter().filter(|o| o.is_revenue_eligible()) {
        activity
            .entry(order.customer_id.clone())
            .or_default()
            .add(order);
    }
    activity
}

/// Assign a customer to exactly one segment.
///
/// Rules are checked in order and the first match wins: spend, then lost,
/// then at risk, then repeat buyer, otherwise new. A big spender stays VIP
/// however long they have been inactive.
pub fn classify(activity: &CustomerActivity, now: DateTime<Utc>, rules: &SegmentRules) -> Segment {
    let days_since_last_order = activity.days_since_last_order(now);

    if activity.total_spent > rules.vip_spend_threshold {
        Segment::Vip
    } else if days_since_last_order > rules.lost_after_days {
        Segment::Lost
    } else if days_since_last_order > rules.at_risk_after_days {
        Segment::AtRisk
    } else if activity.order_count > 1 {
        Segment::Regular
    } else {
        Segment::New
    }
}

/// Per-segment rollup.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentSummary {
    pub segment: Segment,
    pub count: u64,
    pub total_revenue: Decimal,
    pub average_order_value: Decimal,
    /// Share of revenue across all segments.
    pub percentage: f64,
}

#[derive(Default)]
struct SegmentTotals {
    count: u64,
    revenue: Decimal,
    orders: u64,
}

/// Classify every customer and summarize each segment.
///
/// All five segments are always present, in [`Segment::ALL`] order, so the
/// counts sum to the number of customers.
pub fn summarize_segments(
    customers: &[CustomerRecord],
    orders: &[OrderRecord],
    now: DateTime<Utc>,
    rules: &SegmentRules,
) -> Vec<SegmentSummary> {
    let activity = customer_activity(orders);
    let mut totals: HashMap<Segment, SegmentTotals> = HashMap::new();
    let mut all_revenue = Decimal::ZERO;

    for customer in customers {
        let customer_activity = activity.get(&customer.id).copied().unwrap_or_default();
        let segment = classify(&customer_activity, now, rules);
        let entry = totals.entry(segment).or_default();
        entry.count += 1;
        entry.revenue += customer_activity.total_spent;
        entry.orders += customer_activity.order_count;
        all_revenue += customer_activity.total_spent;
    }

    Segment::ALL
        .into_iter()
        .map(|segment| {
            let t = totals.remove(&segment).unwrap_or_default();
            SegmentSummary {
                segment,
                count: t.count,
                total_revenue: t.revenue,
                average_order_value: average(t.revenue, t.orders),
                percentage: percentage_decimal(t.revenue, all_revenue),
            }
        })
        .collect()
}

/// A customer ranked by spend in a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TopCustomer {
    pub id: String,
    pub name: String,
    pub total_spent: Decimal,
    pub orders: u64,
    pub last_order_at: Option<DateTime<Utc>>,
    /// Lifetime segment.
    pub segment: Segment,
}

/// The `limit` customers with the highest revenue-eligible spend in `period`.
///
/// Customers with no spend in the period are omitted. Ties are ordered by
/// customer id.
pub fn top_customers(
    customers: &[CustomerRecord],
    orders: &[OrderRecord],
    period: &Period,
    now: DateTime<Utc>,
    rules: &SegmentRules,
    limit: usize,
) -> Vec<TopCustomer> {
    let lifetime = customer_activity(orders);
    let period_activity =
        customer_activity(orders.iter().filter(|o| period.contains(o.created_at)));

    let mut rows: Vec<TopCustomer> = customers
        .iter()
        .filter_map(|customer| {
            let spent = period_activity.get(&customer.id)?;
            let lifetime_activity = lifetime.get(&customer.id).copied().unwrap_or_default();
            Some(TopCustomer {
                id: customer.id.clone(),
                name: customer.name.clone(),
                total_spent: spent.total_spent,
                orders: spent.order_count,
                last_order_at: spent.last_order_at,
                segment: classify(&lifetime_activity, now, rules),
            })
        })
        .collect();

    rows.sort_by(|a, b| b.total_spent.cmp(&a.total_spent).then_with(|| a.id.cmp(&b.id)));
    rows.truncate(limit);
    rows
}
