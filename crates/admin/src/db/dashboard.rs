//! Headline counts for the dashboard.

use serde::Serialize;
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;
use crate::services::inventory::{HIGH_STOCK_THRESHOLD, LOW_STOCK_THRESHOLD};

/// Dashboard numbers.
///
/// `dead_stock_risk` only looks at stock levels; the inventory page also
/// checks recent sales.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct DashboardCounts {
    pub customers: i64,
    pub products: i64,
    pub orders: i64,
    pub low_stock: i64,
    pub dead_stock_risk: i64,
}

/// Repository for dashboard aggregates.
pub struct DashboardRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> DashboardRepository<'a> {
    /// Create a new dashboard repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Count customers, products, orders and active products at either stock extreme.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn counts(&self) -> Result<DashboardCounts, RepositoryError> {
        let counts = sqlx::query_as::<_, DashboardCounts>(
            "SELECT
                 (SELECT COUNT(*) FROM shop.customer_profile) AS customers,
                 (SELECT COUNT(*) FROM shop.product) AS products,
                 (SELECT COUNT(*) FROM shop.customer_order) AS orders,
                 (SELECT COUNT(*) FROM shop.product
                  WHERE status AND stock_quantity <= $1) AS low_stock,
                 (SELECT COUNT(*) FROM shop.product
                  WHERE status AND stock_quantity > $2) AS dead_stock_risk",
        )
        .bind(LOW_STOCK_THRESHOLD)
        .bind(HIGH_STOCK_THRESHOLD)
        .fetch_one(self.pool)
        .await?;

        Ok(counts)
    }
}
