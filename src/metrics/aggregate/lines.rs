//! Breakdowns over order items joined to their parent order and product.
//!
//! An item contributes only when its parent order was created inside the
//! period and is revenue-eligible; a cancelled order's items exist but add
//! nothing.

use std::collections::{HashMap, HashSet};

use rust_decimal::Decimal;
use serde::Serialize;
use tracing::warn;

use crate::metrics::growth::percentage_decimal;
use crate::metrics::period::Period;
use crate::model::{
    OrderItemRecord, OrderRecord, ProductRecord, UNCATEGORIZED, UNKNOWN_PRODUCT,
};

/// Revenue share of one product category.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDistributionRow {
    pub name: String,
    #[serde(rename = "value")]
    pub revenue: Decimal,
    #[serde(rename = "percentage")]
    pub percentage_of_total: f64,
    #[serde(rename = "orders")]
    pub distinct_order_count: u64,
}

/// Sales figures for one product.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSales {
    pub id: String,
    pub name: String,
    pub category: String,
    pub revenue: Decimal,
    pub units_sold: u64,
    pub orders: u64,
    pub stock: u32,
}

/// An item together with what it joined to.
struct JoinedLine<'a> {
    item: &'a OrderItemRecord,
    product: Option<&'a ProductRecord>,
}

impl JoinedLine<'_> {
    fn category(&self) -> &str {
        self.product.map(|p| p.category()).unwrap_or(UNCATEGORIZED)
    }
}

/// Join items to orders and products, keeping only revenue-bearing lines.
fn revenue_lines<'a>(
    orders: &'a [OrderRecord],
    items: &'a [OrderItemRecord],
    products: &'a [ProductRecord],
    period: &Period,
) -> Vec<JoinedLine<'a>> {
    let orders_by_id: HashMap<&str, &OrderRecord> =
        orders.iter().map(|o| (o.id.as_str(), o)).collect();
    let products_by_id: HashMap<&str, &ProductRecord> =
        products.iter().map(|p| (p.id.as_str(), p)).collect();
    let mut missing: HashSet<&str> = HashSet::new();

    let lines = items
        .iter()
        .filter(|item| {
            orders_by_id
                .get(item.order_id.as_str())
                .is_some_and(|o| period.contains(o.created_at) && o.is_revenue_eligible())
        })
        .map(|item| {
            let product = products_by_id.get(item.product_id.as_str()).copied();
            if product.is_none() {
                missing.insert(item.product_id.as_str());
            }
            JoinedLine { item, product }
        })
        .collect();

    if !missing.is_empty() {
        warn!(
            count = missing.len(),
            "Order items reference products missing from the catalog"
        );
    }

    lines
}

#[derive(Default)]
struct LineTotals<'a> {
    revenue: Decimal,
    units: u64,
    orders: HashSet<&'a str>,
}

impl<'a> LineTotals<'a> {
    fn add(&mut self, item: &'a OrderItemRecord) {
        self.revenue += item.total_price;
        self.units += u64::from(item.quantity);
        self.orders.insert(item.order_id.as_str());
    }
}

/// Revenue by category for items of revenue-eligible orders in `period`.
///
/// Sorted by revenue descending, ties by category name.
pub fn category_distribution(
    orders: &[OrderRecord],
    items: &[OrderItemRecord],
    products: &[ProductRecord],
    period: &Period,
) -> Vec<CategoryDistributionRow> {
    let lines = revenue_lines(orders, items, products, period);

    let mut by_category: HashMap<&str, LineTotals> = HashMap::new();
    let mut total_revenue = Decimal::ZERO;
    for line in &lines {
        by_category.entry(line.category()).or_default().add(line.item);
        total_revenue += line.item.total_price;
    }

    let mut rows: Vec<CategoryDistributionRow> = by_category
        .into_iter()
        .map(|(name, totals)| CategoryDistributionRow {
            name: name.to_string(),
            revenue: totals.revenue,
            percentage_of_total: percentage_decimal(totals.revenue, total_revenue),
            distinct_order_count: totals.orders.len() as u64,
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    rows
}

/// The `limit` best-selling products by item revenue in `period`.
///
/// Ranked by revenue descending; equal revenue is ordered by product id so
/// the ranking is deterministic.
pub fn top_products(
    orders: &[OrderRecord],
    items: &[OrderItemRecord],
    products: &[ProductRecord],
    period: &Period,
    limit: usize,
) -> Vec<ProductSales> {
    let lines = revenue_lines(orders, items, products, period);

    let mut by_product: HashMap<&str, (Option<&ProductRecord>, LineTotals)> = HashMap::new();
    for line in &lines {
        by_product
            .entry(line.item.product_id.as_str())
            .or_insert_with(|| (line.product, LineTotals::default()))
            .1
            .add(line.item);
    }

    let mut rows: Vec<ProductSales> = by_product
        .into_iter()
        .map(|(id, (product, totals))| ProductSales {
            id: id.to_string(),
            name: product
                .map(|p| p.name.clone())
                .unwrap_or_else(|| UNKNOWN_PRODUCT.to_string()),
            category: product
                .map(|p| p.category().to_string())
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            revenue: totals.revenue,
            units_sold: totals.units,
            orders: totals.orders.len() as u64,
            stock: product.map(|p| p.stock_quantity).unwrap_or(0),
        })
        .collect();

    rows.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.id.cmp(&b.id)));
    rows.truncate(limit);
    rows
}
