//! Stock alerts for the inventory screen.
//!
//! A product is either short (restock) or sitting on too much stock with no
//! recent sales (discount it). Low stock wins when both could apply.

use serde::Serialize;

use glowmart_core::ProductId;

/// At or below this many units a product needs restocking.
pub const LOW_STOCK_THRESHOLD: i32 = 5;

/// Above this many units an unsold product is dead stock.
pub const HIGH_STOCK_THRESHOLD: i32 = 20;

/// Window for "recent" sales, in days.
pub const DEAD_STOCK_DAYS: i64 = 30;

/// Stock and recent sales for one active product.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct StockSnapshot {
    pub product_id: ProductId,
    pub name: String,
    pub stock_quantity: i32,
    pub recent_sales: i64,
}

/// Why a product is on the alert list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AlertKind {
    LowStock,
    DeadStock,
}

impl AlertKind {
    /// Severity shown next to the alert.
    #[must_use]
    pub const fn level(self) -> &'static str {
        match self {
            Self::LowStock => "critical",
            Self::DeadStock => "warning",
        }
    }

    /// Suggested action.
    #[must_use]
    pub const fn suggestion(self) -> &'static str {
        match self {
            Self::LowStock => "Restock now",
            Self::DeadStock => "Discount / flash sale",
        }
    }
}

/// One inventory alert.
#[derive(Debug, Clone, Serialize)]
pub struct StockAlert {
    pub product_id: ProductId,
    pub name: String,
    pub stock_quantity: i32,
    pub recent_sales: i64,
    pub kind: AlertKind,
    pub level: &'static str,
    pub suggestion: &'static str,
}

/// Alerts plus per-kind totals.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryReport {
    pub alerts: Vec<StockAlert>,
    pub total_low: usize,
    pub total_dead: usize,
}

fn classify(snapshot: &StockSnapshot) -> Option<AlertKind> {
    if snapshot.stock_quantity <= LOW_STOCK_THRESHOLD {
        Some(AlertKind::LowStock)
    } else if snapshot.stock_quantity > HIGH_STOCK_THRESHOLD && snapshot.recent_sales == 0 {
        Some(AlertKind::DeadStock)
    } else {
        None
    }
}

/// Build the alert list, keeping the input order.
#[must_use]
pub fn build_alerts(snapshots: &[StockSnapshot]) -> InventoryReport {
    let mut report = InventoryReport::default();

    for snapshot in snapshots {
        let Some(kind) = classify(snapshot) else {
            continue;
        };
        match kind {
            AlertKind::LowStock => report.total_low += 1,
            AlertKind::DeadStock => report.total_dead += 1,
        }
        report.alerts.push(StockAlert {
            product_id: snapshot.product_id,
            name: snapshot.name.clone(),
            stock_quantity: snapshot.stock_quantity,
            recent_sales: snapshot.recent_sales,
            kind,
            level: kind.level(),
            suggestion: kind.suggestion(),
        });
    }

    report
}
