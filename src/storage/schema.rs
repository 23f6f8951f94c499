//! Database schema definitions using sea-query.
//!
//! These define the table and column identifiers for type-safe query building.
//! Money is stored as decimal TEXT and instants as fixed-width RFC 3339 TEXT
//! (`YYYY-MM-DDTHH:MM:SS.fffffffffZ`) so range filters compare lexically.

use sea_query::Iden;

/// Orders table schema.
#[derive(Iden)]
pub enum Orders {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "customer_id"]
    CustomerId,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "status"]
    Status,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "wilaya"]
    Wilaya,
}

/// Order items table schema.
#[derive(Iden)]
pub enum OrderItems {
    Table,
    #[iden = "order_id"]
    OrderId,
    #[iden = "product_id"]
    ProductId,
    #[iden = "quantity"]
    Quantity,
    #[iden = "unit_price"]
    UnitPrice,
    #[iden = "total_price"]
    TotalPrice,
}

/// Customers table schema.
#[derive(Iden)]
pub enum Customers {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "created_at"]
    CreatedAt,
}

/// Service requests table schema.
#[derive(Iden)]
pub enum ServiceRequests {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "status"]
    Status,
    #[iden = "created_at"]
    CreatedAt,
}

/// Products table schema.
#[derive(Iden)]
pub enum Products {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "name"]
    Name,
    #[iden = "category_name"]
    CategoryName,
    #[iden = "stock_quantity"]
    StockQuantity,
    #[iden = "minimum_stock"]
    MinimumStock,
}

/// SQL for creating the orders table.
pub const CREATE_ORDERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS orders (
    id TEXT PRIMARY KEY,
    customer_id TEXT NOT NULL,
    total_amount TEXT NOT NULL,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL,
    wilaya TEXT
)
"#;

pub const CREATE_ORDERS_CREATED_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_orders_created_at ON orders(created_at)";

/// SQL for creating the order items table.
pub const CREATE_ORDER_ITEMS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS order_items (
    order_id TEXT NOT NULL,
    product_id TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    unit_price TEXT NOT NULL,
    total_price TEXT NOT NULL
)
"#;

pub const CREATE_ORDER_ITEMS_ORDER_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items(order_id)";

/// SQL for creating the customers table.
pub const CREATE_CUSTOMERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS customers (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL for creating the service requests table.
pub const CREATE_SERVICE_REQUESTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS service_requests (
    id TEXT PRIMARY KEY,
    status TEXT NOT NULL,
    created_at TEXT NOT NULL
)
"#;

/// SQL for creating the products table.
pub const CREATE_PRODUCTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    category_name TEXT,
    stock_quantity INTEGER NOT NULL,
    minimum_stock INTEGER
)
"#;

/// Every schema statement, in creation order.
pub const SCHEMA: &[&str] = &[
    CREATE_ORDERS_TABLE,
    CREATE_ORDERS_CREATED_INDEX,
    CREATE_ORDER_ITEMS_TABLE,
    CREATE_ORDER_ITEMS_ORDER_INDEX,
    CREATE_CUSTOMERS_TABLE,
    CREATE_SERVICE_REQUESTS_TABLE,
    CREATE_PRODUCTS_TABLE,
];
