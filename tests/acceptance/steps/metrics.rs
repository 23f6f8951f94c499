//! Step definitions for the pure aggregation scenarios.

use chrono::{DateTime, Duration, Utc};
use cucumber::{given, then, when, World};
use rust_decimal::Decimal;

use storefront_metrics::metrics::{
    bucket, classify, growth, inventory_alerts, resolve_period, summarize_segments, totals_in,
    CountingMode, CustomerActivity, Granularity, InventoryAlert, OrderTotals, Period,
    SalesBucket, Segment, SegmentRules, SegmentSummary, Timeframe,
};
use storefront_metrics::model::{
    CustomerRecord, OrderRecord, OrderStatus, ProductRecord, DEFAULT_MINIMUM_STOCK,
};
use storefront_metrics::test_utils::{order, product, sample_dataset};

use super::instant;

/// Test context for aggregation scenarios.
#[derive(Debug, World)]
#[world(init = Self::new)]
pub struct MetricsWorld {
    now: DateTime<Utc>,
    period: Option<Period>,
    growth: Option<f64>,
    orders: Vec<OrderRecord>,
    totals: Option<OrderTotals>,
    granularity: Granularity,
    buckets: Vec<SalesBucket>,
    activity: Option<CustomerActivity>,
    segment: Option<Segment>,
    customers: Vec<CustomerRecord>,
    segments: Vec<SegmentSummary>,
    products: Vec<ProductRecord>,
    alerts: Vec<InventoryAlert>,
}

impl MetricsWorld {
    fn new() -> Self {
        Self {
            now: Utc::now(),
            period: None,
            growth: None,
            orders: Vec::new(),
            totals: None,
            granularity: Granularity::Day,
            buckets: Vec::new(),
            activity: None,
            segment: None,
            customers: Vec::new(),
            segments: Vec::new(),
            products: Vec::new(),
            alerts: Vec::new(),
        }
    }

    fn period(&self) -> Period {
        self.period.expect("No period resolved")
    }

    fn totals(&self) -> OrderTotals {
        self.totals.expect("Orders not aggregated")
    }
}

// --- Given steps ---

#[given(expr = "the clock reads {string}")]
async fn given_clock(world: &mut MetricsWorld, now: String) {
    world.now = instant(&now);
}

#[given(expr = "an order of {int} with status {string} placed {int} day(s) ago")]
async fn given_order(world: &mut MetricsWorld, amount: i64, status: String, days: i64) {
    let status = OrderStatus::parse(&status).expect("Unknown order status");
    let id = format!("o{}", world.orders.len() + 1);
    world.orders.push(order(
        &id,
        "c1",
        amount,
        status,
        world.now - Duration::days(days),
    ));
}

#[given(expr = "a customer who spent {int} over {int} orders, last ordering {int} days ago")]
async fn given_customer_activity(world: &mut MetricsWorld, spent: i64, orders: u64, days: i64) {
    world.activity = Some(CustomerActivity {
        total_spent: Decimal::from(spent),
        order_count: orders,
        last_order_at: Some(world.now - Duration::days(days)),
    });
}

#[given("a customer with no orders")]
async fn given_customer_without_orders(world: &mut MetricsWorld) {
    world.activity = Some(CustomerActivity::default());
}

#[given("the sample storefront")]
async fn given_sample_storefront(world: &mut MetricsWorld) {
    let dataset = sample_dataset(world.now);
    world.orders = dataset.orders;
    world.customers = dataset.customers;
}

#[given(expr = "a product with stock {int} and no minimum stock")]
async fn given_product_default_minimum(world: &mut MetricsWorld, stock: u32) {
    let id = format!("p{}", world.products.len() + 1);
    world.products.push(product(&id, &id, None, stock, None));
}

#[given(expr = "a product with stock {int} and minimum stock {int}")]
async fn given_product_with_minimum(world: &mut MetricsWorld, stock: u32, minimum: u32) {
    let id = format!("p{}", world.products.len() + 1);
    world
        .products
        .push(product(&id, &id, None, stock, Some(minimum)));
}

// --- When steps ---

#[when(expr = "the period for timeframe {string} is resolved")]
async fn when_period_resolved(world: &mut MetricsWorld, token: String) {
    world.period = Some(resolve_period(Timeframe::parse(&token), world.now));
}

#[when(regex = r"^growth is computed from (-?\d+(?:\.\d+)?) to (-?\d+(?:\.\d+)?)$")]
async fn when_growth_computed(world: &mut MetricsWorld, previous: f64, current: f64) {
    world.growth = Some(growth(current, previous));
}

#[when(expr = "the orders of the last {string} are aggregated")]
async fn when_orders_aggregated(world: &mut MetricsWorld, token: String) {
    let period = resolve_period(Timeframe::parse(&token), world.now);
    world.totals = Some(totals_in(&world.orders, &period));
    world.period = Some(period);
}

#[when(expr = "the orders of the last {string} are bucketed by {string}")]
async fn when_orders_bucketed(world: &mut MetricsWorld, token: String, group_by: String) {
    let period = resolve_period(Timeframe::parse(&token), world.now);
    world.granularity = Granularity::parse(&group_by);
    world.buckets = bucket(&world.orders, &period, world.granularity);
    world.totals = Some(totals_in(&world.orders, &period));
    world.period = Some(period);
}

#[when("the customer is classified")]
async fn when_customer_classified(world: &mut MetricsWorld) {
    let activity = world.activity.expect("No customer activity");
    world.segment = Some(classify(&activity, world.now, &SegmentRules::default()));
}

#[when("the customers are segmented")]
async fn when_customers_segmented(world: &mut MetricsWorld) {
    world.segments = summarize_segments(
        &world.customers,
        &world.orders,
        world.now,
        &SegmentRules::default(),
    );
}

#[when("inventory alerts are computed")]
async fn when_inventory_alerts(world: &mut MetricsWorld) {
    world.alerts = inventory_alerts(&world.products, DEFAULT_MINIMUM_STOCK);
}

// --- Then steps ---

#[then(expr = "the period is {string} to {string}")]
async fn then_period_is(world: &mut MetricsWorld, start: String, end: String) {
    let period = world.period();
    assert_eq!(period.start, instant(&start));
    assert_eq!(period.end, instant(&end));
}

#[then(expr = "the comparison period is {string} to {string}")]
async fn then_comparison_is(world: &mut MetricsWorld, start: String, end: String) {
    let comparison = world.period().comparison();
    assert_eq!(comparison.start, instant(&start));
    assert_eq!(comparison.end, instant(&end));
}

#[then(expr = "the period spans {int} days")]
async fn then_period_spans(world: &mut MetricsWorld, days: i64) {
    let period = world.period();
    assert_eq!(period.duration(), Duration::days(days));
    assert_eq!(period.end, world.now);
}

#[then("the comparison period ends where the period starts")]
async fn then_comparison_adjacent(world: &mut MetricsWorld) {
    let period = world.period();
    assert_eq!(period.comparison().end, period.start);
}

#[then("the comparison period has the same length as the period")]
async fn then_comparison_same_length(world: &mut MetricsWorld) {
    let period = world.period();
    assert_eq!(period.comparison().duration(), period.duration());
}

#[then(regex = r"^the growth is (-?\d+(?:\.\d+)?)$")]
async fn then_growth_is(world: &mut MetricsWorld, expected: f64) {
    assert_eq!(world.growth.expect("Growth not computed"), expected);
}

#[then(expr = "the revenue is {int}")]
async fn then_revenue_is(world: &mut MetricsWorld, revenue: i64) {
    assert_eq!(world.totals().revenue, Decimal::from(revenue));
}

#[then(expr = "the orders placed count is {int}")]
async fn then_orders_placed(world: &mut MetricsWorld, count: u64) {
    assert_eq!(world.totals().count(CountingMode::AllOrders), count);
}

#[then(expr = "the revenue-eligible order count is {int}")]
async fn then_revenue_eligible_orders(world: &mut MetricsWorld, count: u64) {
    assert_eq!(
        world.totals().count(CountingMode::RevenueEligibleOrders),
        count
    );
}

#[then(expr = "the average order value is {word}")]
async fn then_average_order_value(world: &mut MetricsWorld, expected: String) {
    let expected: Decimal = expected.parse().expect("Invalid decimal in scenario");
    assert_eq!(world.totals().average_order_value(), expected);
}

#[then("the bucket order counts sum to the revenue-eligible order count")]
async fn then_bucket_counts_sum(world: &mut MetricsWorld) {
    let bucketed: u64 = world.buckets.iter().map(|b| b.orders).sum();
    assert_eq!(
        bucketed,
        world.totals().count(CountingMode::RevenueEligibleOrders)
    );
    let bucketed_revenue: Decimal = world.buckets.iter().map(|b| b.revenue).sum();
    assert_eq!(bucketed_revenue, world.totals().revenue);
}

#[then("the buckets are in chronological order")]
async fn then_buckets_chronological(world: &mut MetricsWorld) {
    assert!(world.buckets.windows(2).all(|w| w[0].date < w[1].date));
}

#[then("bucketing the same orders again gives the same buckets")]
async fn then_bucketing_idempotent(world: &mut MetricsWorld) {
    let again = bucket(&world.orders, &world.period(), world.granularity);
    assert_eq!(again, world.buckets);
}

#[then(expr = "there are {int} buckets")]
async fn then_bucket_count(world: &mut MetricsWorld, count: usize) {
    assert_eq!(world.buckets.len(), count);
}

#[then(expr = "the bucket keys are {string}")]
async fn then_bucket_keys(world: &mut MetricsWorld, keys: String) {
    let actual: Vec<&str> = world.buckets.iter().map(|b| b.date.as_str()).collect();
    let expected: Vec<&str> = keys.split(", ").collect();
    assert_eq!(actual, expected);
}

#[then(expr = "the segment is {string}")]
async fn then_segment_is(world: &mut MetricsWorld, expected: String) {
    let segment = world.segment.expect("Customer not classified");
    assert_eq!(segment.as_str(), expected);
}

#[then("the segment counts sum to the number of customers")]
async fn then_segment_counts_sum(world: &mut MetricsWorld) {
    let total: u64 = world.segments.iter().map(|s| s.count).sum();
    assert_eq!(total, world.customers.len() as u64);
}

#[then("every segment is reported")]
async fn then_every_segment_reported(world: &mut MetricsWorld) {
    let reported: Vec<Segment> = world.segments.iter().map(|s| s.segment).collect();
    assert_eq!(reported, Segment::ALL.to_vec());
}

#[then("segmenting again gives the same result")]
async fn then_segmenting_deterministic(world: &mut MetricsWorld) {
    let again = summarize_segments(
        &world.customers,
        &world.orders,
        world.now,
        &SegmentRules::default(),
    );
    assert_eq!(again, world.segments);
}

#[then(expr = "the alert status is {string}")]
async fn then_alert_status(world: &mut MetricsWorld, expected: String) {
    if expected == "NONE" {
        assert!(world.alerts.is_empty(), "Expected no alert: {:?}", world.alerts);
        return;
    }
    assert_eq!(world.alerts.len(), 1);
    let status = serde_json::to_value(world.alerts[0].status).expect("Serialize alert status");
    assert_eq!(status, serde_json::Value::String(expected));
}

#[then(expr = "the alert stocks are {string}")]
async fn then_alert_stocks(world: &mut MetricsWorld, stocks: String) {
    let actual: Vec<String> = world
        .alerts
        .iter()
        .map(|a| a.current_stock.to_string())
        .collect();
    assert_eq!(actual.join(", "), stocks);
}
