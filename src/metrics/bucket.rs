//! Grouping orders into day, week or month buckets for trend charts.
//!
//! Only buckets containing at least one revenue-eligible order are emitted.
//! Callers wanting a continuous series must zero-fill gaps themselves.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, Duration, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::aggregate::{average, OrderTotals};
use super::period::Period;
use crate::model::OrderRecord;

/// Bucket width for a trend series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Granularity {
    #[default]
    Day,
    Week,
    Month,
}

impl Granularity {
    /// Parse a `groupBy` value. Unknown values fall back to `day`.
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "day" => Granularity::Day,
            "week" => Granularity::Week,
            "month" => Granularity::Month,
            other => {
                warn!(group_by = %other, "Unrecognized groupBy, defaulting to day");
                Granularity::Day
            }
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::Day => "day",
            Granularity::Week => "week",
            Granularity::Month => "month",
        }
    }

    /// First day of the bucket containing `date`.
    ///
    /// Weeks start on Monday.
    pub fn bucket_start(&self, date: NaiveDate) -> NaiveDate {
        match self {
            Granularity::Day => date,
            Granularity::Week => {
                date - Duration::days(i64::from(date.weekday().num_days_from_monday()))
            }
            Granularity::Month => date.with_day(1).unwrap_or(date),
        }
    }

    /// Display key for a bucket start: `YYYY-MM-DD`, or `YYYY-MM` for months.
    pub fn key(&self, bucket_start: NaiveDate) -> String {
        match self {
            Granularity::Day | Granularity::Week => bucket_start.format("%Y-%m-%d").to_string(),
            Granularity::Month => bucket_start.format("%Y-%m").to_string(),
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for Granularity {
    fn from(value: String) -> Self {
        Granularity::parse(&value)
    }
}

impl From<Granularity> for String {
    fn from(granularity: Granularity) -> Self {
        granularity.as_str().to_string()
    }
}

/// One row of a sales trend series.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesBucket {
    /// Bucket key (see [`Granularity::key`]).
    pub date: String,
    pub revenue: Decimal,
    pub orders: u64,
    pub average_order_value: Decimal,
}

/// Bucket revenue-eligible orders created inside `period`.
///
/// Rows are sorted chronologically. Bucket boundaries use the UTC date of
/// each order.
pub fn bucket(orders: &[OrderRecord], period: &Period, granularity: Granularity) -> Vec<SalesBucket> {
    let mut buckets: BTreeMap<NaiveDate, OrderTotals> = BTreeMap::new();

    for order in orders
        .iter()
        .filter(|o| period.contains(o.created_at) && o.is_revenue_eligible())
    {
        let start = granularity.bucket_start(order.created_at.date_naive());
        buckets.entry(start).or_default().add(order);
    }

    buckets
        .into_iter()
        .map(|(start, totals)| SalesBucket {
            date: granularity.key(start),
            revenue: totals.revenue,
            orders: totals.revenue_eligible_orders,
            average_order_value: average(totals.revenue, totals.revenue_eligible_orders),
        })
        .collect()
}
