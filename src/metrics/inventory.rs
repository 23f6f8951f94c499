//! Low-stock alerts.

use serde::Serialize;

use crate::model::ProductRecord;

/// Stock at or below this level is critical.
pub const CRITICAL_STOCK_LEVEL: u32 = 5;

/// Alert severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertStatus {
    OutOfStock,
    Critical,
    LowStock,
}

/// A product at or below its reorder point.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryAlert {
    pub product_id: String,
    pub product_name: String,
    pub current_stock: u32,
    pub minimum_stock: u32,
    pub status: AlertStatus,
}

/// Severity for a stock level, or `None` when stock is above `minimum_stock`.
pub fn alert_status(stock: u32, minimum_stock: u32) -> Option<AlertStatus> {
    if stock > minimum_stock {
        return None;
    }
    Some(match stock {
        0 => AlertStatus::OutOfStock,
        s if s <= CRITICAL_STOCK_LEVEL => AlertStatus::Critical,
        _ => AlertStatus::LowStock,
    })
}

/// Alerts for every product at or below its reorder point.
///
/// Products without a reorder point use `default_minimum_stock`. Sorted by
/// stock ascending, ties by product id.
pub fn inventory_alerts(products: &[ProductRecord], default_minimum_stock: u32) -> Vec<InventoryAlert> {
    let mut alerts: Vec<InventoryAlert> = products
        .iter()
        .filter_map(|p| {
            let minimum_stock = p.minimum_stock_or(default_minimum_stock);
            alert_status(p.stock_quantity, minimum_stock).map(|status| InventoryAlert {
                product_id: p.id.clone(),
                product_name: p.name.clone(),
                current_stock: p.stock_quantity,
                minimum_stock,
                status,
            })
        })
        .collect();

    alerts.sort_by(|a, b| {
        a.current_stock
            .cmp(&b.current_stock)
            .then_with(|| a.product_id.cmp(&b.product_id))
    });
    alerts
}
