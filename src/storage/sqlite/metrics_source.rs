//! SQLite MetricsSource implementation.

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rust_decimal::Decimal;
use sea_query::{Expr, Order, Query, SqliteQueryBuilder};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::interfaces::metrics_source::{MetricsSource, Result, SourceError};
use crate::metrics::Period;
use crate::model::{
    CustomerRecord, Dataset, OrderItemRecord, OrderRecord, OrderStatus, ProductRecord,
    ServiceRequestRecord, ServiceStatus,
};
use crate::storage::schema::{Customers, OrderItems, Orders, Products, ServiceRequests, SCHEMA};

/// SQLite implementation of MetricsSource.
pub struct SqliteMetricsSource {
    pool: SqlitePool,
}

/// Fixed-width timestamp text so stored instants compare lexically.
fn timestamp(instant: DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| SourceError::Decode(format!("invalid timestamp '{}': {}", value, e)))
}

fn parse_decimal(value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .map_err(|e| SourceError::Decode(format!("invalid amount '{}': {}", value, e)))
}

fn parse_count(value: i64, column: &str) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| SourceError::Decode(format!("{} out of range: {}", column, value)))
}

fn order_from_row(row: &SqliteRow) -> Result<OrderRecord> {
    let status: String = row.try_get("status")?;
    Ok(OrderRecord {
        id: row.try_get("id")?,
        customer_id: row.try_get("customer_id")?,
        total_amount: parse_decimal(&row.try_get::<String, _>("total_amount")?)?,
        status: OrderStatus::parse(&status)
            .ok_or_else(|| SourceError::Decode(format!("unknown order status '{}'", status)))?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        wilaya: row.try_get("wilaya")?,
    })
}

fn item_from_row(row: &SqliteRow) -> Result<OrderItemRecord> {
    Ok(OrderItemRecord {
        order_id: row.try_get("order_id")?,
        product_id: row.try_get("product_id")?,
        quantity: parse_count(row.try_get("quantity")?, "quantity")?,
        unit_price: parse_decimal(&row.try_get::<String, _>("unit_price")?)?,
        total_price: parse_decimal(&row.try_get::<String, _>("total_price")?)?,
    })
}

fn customer_from_row(row: &SqliteRow) -> Result<CustomerRecord> {
    Ok(CustomerRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}

fn service_request_from_row(row: &SqliteRow) -> Result<ServiceRequestRecord> {
    let status: String = row.try_get("status")?;
    Ok(ServiceRequestRecord {
        id: row.try_get("id")?,
        status: ServiceStatus::parse(&status)
            .ok_or_else(|| SourceError::Decode(format!("unknown service status '{}'", status)))?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
    })
}

fn product_from_row(row: &SqliteRow) -> Result<ProductRecord> {
    let minimum_stock: Option<i64> = row.try_get("minimum_stock")?;
    Ok(ProductRecord {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        category_name: row.try_get("category_name")?,
        stock_quantity: parse_count(row.try_get("stock_quantity")?, "stock_quantity")?,
        minimum_stock: minimum_stock
            .map(|m| parse_count(m, "minimum_stock"))
            .transpose()?,
    })
}

fn order_columns() -> [Orders; 6] {
    [
        Orders::Id,
        Orders::CustomerId,
        Orders::TotalAmount,
        Orders::Status,
        Orders::CreatedAt,
        Orders::Wilaya,
    ]
}

impl SqliteMetricsSource {
    /// Create a new SQLite metrics source.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create tables and indexes if they do not exist.
    pub async fn init(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    async fn fetch<T>(&self, sql: String, decode: fn(&SqliteRow) -> Result<T>) -> Result<Vec<T>> {
        let rows = sqlx::query(&sql).fetch_all(&self.pool).await?;
        debug!(rows = rows.len(), "Fetched rows");
        rows.iter().map(decode).collect()
    }

    /// Load a full dataset in one transaction.
    ///
    /// Used to seed databases from snapshots and in tests; the metrics
    /// engine itself never writes.
    pub async fn insert_dataset(&self, dataset: &Dataset) -> Result<()> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("BEGIN IMMEDIATE").execute(&mut *conn).await?;

        match Self::insert_all(&mut conn, dataset).await {
            Ok(()) => {
                sqlx::query("COMMIT").execute(&mut *conn).await?;
                Ok(())
            }
            Err(e) => {
                let _ = sqlx::query("ROLLBACK").execute(&mut *conn).await;
                Err(e)
            }
        }
    }

    async fn insert_all(conn: &mut SqliteConnection, dataset: &Dataset) -> Result<()> {
        for order in &dataset.orders {
            let query = Query::insert()
                .into_table(Orders::Table)
                .columns(order_columns())
                .values_panic([
                    order.id.clone().into(),
                    order.customer_id.clone().into(),
                    order.total_amount.to_string().into(),
                    order.status.as_str().into(),
                    timestamp(order.created_at).into(),
                    order.wilaya.clone().into(),
                ])
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
        }

        for item in &dataset.order_items {
            let query = Query::insert()
                .into_table(OrderItems::Table)
                .columns([
                    OrderItems::OrderId,
                    OrderItems::ProductId,
                    OrderItems::Quantity,
                    OrderItems::UnitPrice,
                    OrderItems::TotalPrice,
                ])
                .values_panic([
                    item.order_id.clone().into(),
                    item.product_id.clone().into(),
                    item.quantity.into(),
                    item.unit_price.to_string().into(),
                    item.total_price.to_string().into(),
                ])
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
        }

        for customer in &dataset.customers {
            let query = Query::insert()
                .into_table(Customers::Table)
                .columns([Customers::Id, Customers::Name, Customers::CreatedAt])
                .values_panic([
                    customer.id.clone().into(),
                    customer.name.clone().into(),
                    timestamp(customer.created_at).into(),
                ])
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
        }

        for request in &dataset.service_requests {
            let query = Query::insert()
                .into_table(ServiceRequests::Table)
                .columns([
                    ServiceRequests::Id,
                    ServiceRequests::Status,
                    ServiceRequests::CreatedAt,
                ])
                .values_panic([
                    request.id.clone().into(),
                    request.status.as_str().into(),
                    timestamp(request.created_at).into(),
                ])
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
        }

        for product in &dataset.products {
            let query = Query::insert()
                .into_table(Products::Table)
                .columns([
                    Products::Id,
                    Products::Name,
                    Products::CategoryName,
                    Products::StockQuantity,
                    Products::MinimumStock,
                ])
                .values_panic([
                    product.id.clone().into(),
                    product.name.clone().into(),
                    product.category_name.clone().into(),
                    product.stock_quantity.into(),
                    product.minimum_stock.into(),
                ])
                .to_string(SqliteQueryBuilder);
            sqlx::query(&query).execute(&mut *conn).await?;
        }

        Ok(())
    }
}

#[async_trait]
impl MetricsSource for SqliteMetricsSource {
    async fn orders_between(&self, period: &Period) -> Result<Vec<OrderRecord>> {
        let query = Query::select()
            .columns(order_columns())
            .from(Orders::Table)
            .and_where(Expr::col(Orders::CreatedAt).gte(timestamp(period.start)))
            .and_where(Expr::col(Orders::CreatedAt).lt(timestamp(period.end)))
            .order_by(Orders::CreatedAt, Order::Asc)
            .to_string(SqliteQueryBuilder);
        self.fetch(query, order_from_row).await
    }

    async fn order_items_between(&self, period: &Period) -> Result<Vec<OrderItemRecord>> {
        let query = Query::select()
            .columns([
                (OrderItems::Table, OrderItems::OrderId),
                (OrderItems::Table, OrderItems::ProductId),
                (OrderItems::Table, OrderItems::Quantity),
                (OrderItems::Table, OrderItems::UnitPrice),
                (OrderItems::Table, OrderItems::TotalPrice),
            ])
            .from(OrderItems::Table)
            .inner_join(
                Orders::Table,
                Expr::col((Orders::Table, Orders::Id))
                    .equals((OrderItems::Table, OrderItems::OrderId)),
            )
            .and_where(
                Expr::col((Orders::Table, Orders::CreatedAt)).gte(timestamp(period.start)),
            )
            .and_where(Expr::col((Orders::Table, Orders::CreatedAt)).lt(timestamp(period.end)))
            .to_string(SqliteQueryBuilder);
        self.fetch(query, item_from_row).await
    }

    async fn all_orders(&self) -> Result<Vec<OrderRecord>> {
        let query = Query::select()
            .columns(order_columns())
            .from(Orders::Table)
            .order_by(Orders::CreatedAt, Order::Asc)
            .to_string(SqliteQueryBuilder);
        self.fetch(query, order_from_row).await
    }

    async fn customers(&self) -> Result<Vec<CustomerRecord>> {
        let query = Query::select()
            .columns([Customers::Id, Customers::Name, Customers::CreatedAt])
            .from(Customers::Table)
            .to_string(SqliteQueryBuilder);
        self.fetch(query, customer_from_row).await
    }

    async fn customers_created_between(&self, period: &Period) -> Result<Vec<CustomerRecord>> {
        let query = Query::select()
            .columns([Customers::Id, Customers::Name, Customers::CreatedAt])
            .from(Customers::Table)
            .and_where(Expr::col(Customers::CreatedAt).gte(timestamp(period.start)))
            .and_where(Expr::col(Customers::CreatedAt).lt(timestamp(period.end)))
            .to_string(SqliteQueryBuilder);
        self.fetch(query, customer_from_row).await
    }

    async fn service_requests_between(
        &self,
        period: &Period,
    ) -> Result<Vec<ServiceRequestRecord>> {
        let query = Query::select()
            .columns([
                ServiceRequests::Id,
                ServiceRequests::Status,
                ServiceRequests::CreatedAt,
            ])
            .from(ServiceRequests::Table)
            .and_where(Expr::col(ServiceRequests::CreatedAt).gte(timestamp(period.start)))
            .and_where(Expr::col(ServiceRequests::CreatedAt).lt(timestamp(period.end)))
            .to_string(SqliteQueryBuilder);
        self.fetch(query, service_request_from_row).await
    }

    async fn products(&self) -> Result<Vec<ProductRecord>> {
        let query = Query::select()
            .columns([
                Products::Id,
                Products::Name,
                Products::CategoryName,
                Products::StockQuantity,
                Products::MinimumStock,
            ])
            .from(Products::Table)
            .order_by(Products::Id, Order::Asc)
            .to_string(SqliteQueryBuilder);
        self.fetch(query, product_from_row).await
    }
}
