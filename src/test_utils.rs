//! Record builders and a sample dataset for tests.
//!
//! Shared by unit tests, the acceptance suite and the storage contract test.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;

use crate::model::{
    CustomerRecord, Dataset, OrderItemRecord, OrderRecord, OrderStatus, ProductRecord,
    ServiceRequestRecord, ServiceStatus,
};
use crate::storage::InMemoryMetricsSource;

/// Order without a region.
pub fn order(
    id: &str,
    customer_id: &str,
    amount: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
) -> OrderRecord {
    OrderRecord {
        id: id.to_string(),
        customer_id: customer_id.to_string(),
        total_amount: Decimal::from(amount),
        status,
        created_at,
        wilaya: None,
    }
}

/// Order shipped to `wilaya`.
pub fn order_in(
    id: &str,
    customer_id: &str,
    amount: i64,
    status: OrderStatus,
    created_at: DateTime<Utc>,
    wilaya: &str,
) -> OrderRecord {
    OrderRecord {
        wilaya: Some(wilaya.to_string()),
        ..order(id, customer_id, amount, status, created_at)
    }
}

/// Line item; `total_price` is `unit_price * quantity`.
pub fn item(order_id: &str, product_id: &str, quantity: u32, unit_price: i64) -> OrderItemRecord {
    OrderItemRecord {
        order_id: order_id.to_string(),
        product_id: product_id.to_string(),
        quantity,
        unit_price: Decimal::from(unit_price),
        total_price: Decimal::from(unit_price) * Decimal::from(quantity),
    }
}

pub fn customer(id: &str, name: &str, created_at: DateTime<Utc>) -> CustomerRecord {
    CustomerRecord {
        id: id.to_string(),
        name: name.to_string(),
        created_at,
    }
}

pub fn service_request(
    id: &str,
    status: ServiceStatus,
    created_at: DateTime<Utc>,
) -> ServiceRequestRecord {
    ServiceRequestRecord {
        id: id.to_string(),
        status,
        created_at,
    }
}

pub fn product(
    id: &str,
    name: &str,
    category: Option<&str>,
    stock_quantity: u32,
    minimum_stock: Option<u32>,
) -> ProductRecord {
    ProductRecord {
        id: id.to_string(),
        name: name.to_string(),
        category_name: category.map(str::to_string),
        stock_quantity,
        minimum_stock,
    }
}

/// A small storefront with activity in the current and previous 30 days.
///
/// Relative to `now` with the default 30d timeframe:
/// - current period: 3 delivered orders (1000, 2000, 3000), 1 cancelled (500)
/// - previous period: 2 delivered orders (1500, 1500)
/// - `c-vip` spent 60000 two hundred days ago, and nothing since
/// - two customers registered in the current period, one in the previous
pub fn sample_dataset(now: DateTime<Utc>) -> Dataset {
    let days = |n: i64| now - Duration::days(n);

    Dataset {
        orders: vec![
            order_in("o1", "c-alice", 1000, OrderStatus::Delivered, days(1), "Alger"),
            order_in("o2", "c-alice", 2000, OrderStatus::Shipped, days(3), "Oran"),
            order_in("o3", "c-bob", 3000, OrderStatus::Delivered, days(10), "Alger"),
            order_in("o4", "c-bob", 500, OrderStatus::Cancelled, days(12), "Oran"),
            order("o5", "c-carol", 1500, OrderStatus::Delivered, days(40)),
            order("o6", "c-alice", 1500, OrderStatus::Delivered, days(45)),
            order("o7", "c-vip", 60_000, OrderStatus::Delivered, days(200)),
        ],
        order_items: vec![
            item("o1", "p-fridge", 1, 1000),
            item("o2", "p-fan", 4, 500),
            item("o3", "p-fridge", 3, 1000),
            item("o4", "p-fan", 1, 500),
            item("o5", "p-fan", 3, 500),
        ],
        customers: vec![
            customer("c-alice", "Alice", days(100)),
            customer("c-bob", "Bob", days(20)),
            customer("c-carol", "Carol", days(50)),
            customer("c-vip", "Victor", days(400)),
            customer("c-dan", "Dan", days(5)),
        ],
        service_requests: vec![
            service_request("s1", ServiceStatus::Completed, days(2)),
            service_request("s2", ServiceStatus::Cancelled, days(4)),
            service_request("s3", ServiceStatus::Pending, days(6)),
            service_request("s4", ServiceStatus::Completed, days(35)),
        ],
        products: vec![
            product("p-fridge", "Fridge", Some("Appliances"), 20, None),
            product("p-fan", "Fan", Some("Cooling"), 4, None),
            product("p-filter", "Filter", None, 0, Some(3)),
        ],
    }
}

/// In-memory source loaded with [`sample_dataset`].
pub fn sample_source(now: DateTime<Utc>) -> Arc<InMemoryMetricsSource> {
    Arc::new(InMemoryMetricsSource::from_dataset(sample_dataset(now)))
}
