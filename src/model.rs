//! Read-only record types consumed by the metrics engine.
//!
//! These mirror the rows owned by the order-management side of the
//! platform. The engine never mutates them; every derived structure is
//! rebuilt per call from these values.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Minimum stock used when a product has no reorder point of its own.
pub const DEFAULT_MINIMUM_STOCK: u32 = 10;

/// Region label for orders shipped without a wilaya.
pub const UNKNOWN_REGION: &str = "Unknown";

/// Category label for products without a category.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Product label for order items whose product is no longer in the catalog.
pub const UNKNOWN_PRODUCT: &str = "Unknown product";

/// Order lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
    Refunded,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Confirmed => "CONFIRMED",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
            OrderStatus::Refunded => "REFUNDED",
        }
    }

    /// Parse a stored status string.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }

    /// Whether an order in this status counts toward revenue.
    ///
    /// Only cancelled orders are excluded. Refunded orders still count,
    /// matching the order-management side's own revenue reports.
    pub fn is_revenue_eligible(&self) -> bool {
        !matches!(self, OrderStatus::Cancelled)
    }
}

/// Service request (technician visit) status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServiceStatus {
    Pending,
    Scheduled,
    InProgress,
    Completed,
    Cancelled,
}

impl ServiceStatus {
    pub const ALL: [ServiceStatus; 5] = [
        ServiceStatus::Pending,
        ServiceStatus::Scheduled,
        ServiceStatus::InProgress,
        ServiceStatus::Completed,
        ServiceStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ServiceStatus::Pending => "PENDING",
            ServiceStatus::Scheduled => "SCHEDULED",
            ServiceStatus::InProgress => "IN_PROGRESS",
            ServiceStatus::Completed => "COMPLETED",
            ServiceStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == value)
    }
}

/// A placed order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    pub id: String,
    pub customer_id: String,
    pub total_amount: Decimal,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
    /// Shipping region.
    #[serde(default)]
    pub wilaya: Option<String>,
}

impl OrderRecord {
    pub fn is_revenue_eligible(&self) -> bool {
        self.status.is_revenue_eligible()
    }

    pub fn region(&self) -> &str {
        self.wilaya.as_deref().unwrap_or(UNKNOWN_REGION)
    }
}

/// One line of an order.
///
/// `total_price` is authoritative: it may differ from
/// `unit_price * quantity` when a discount was applied at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemRecord {
    pub order_id: String,
    pub product_id: String,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub total_price: Decimal,
}

/// A registered customer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A field-service request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceRequestRecord {
    pub id: String,
    pub status: ServiceStatus,
    pub created_at: DateTime<Utc>,
}

/// A catalog product with its stock level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category_name: Option<String>,
    pub stock_quantity: u32,
    /// Reorder point; `None` falls back to the configured default.
    #[serde(default)]
    pub minimum_stock: Option<u32>,
}

impl ProductRecord {
    pub fn category(&self) -> &str {
        self.category_name.as_deref().unwrap_or(UNCATEGORIZED)
    }

    pub fn minimum_stock_or(&self, default: u32) -> u32 {
        self.minimum_stock.unwrap_or(default)
    }
}

/// A full snapshot of every record type.
///
/// Used to seed in-memory sources and as the on-disk snapshot format.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Dataset {
    pub orders: Vec<OrderRecord>,
    pub order_items: Vec<OrderItemRecord>,
    pub customers: Vec<CustomerRecord>,
    pub service_requests: Vec<ServiceRequestRecord>,
    pub products: Vec<ProductRecord>,
}
