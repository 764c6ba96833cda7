//! Stock levels joined with recent sales.

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tracing::instrument;

use super::RepositoryError;
use crate::services::inventory::StockSnapshot;

/// Repository for inventory reads.
pub struct InventoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> InventoryRepository<'a> {
    /// Create a new inventory repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Every active product with the units sold on orders placed since `since`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn active_stock(
        &self,
        since: DateTime<Utc>,
    ) -> Result<Vec<StockSnapshot>, RepositoryError> {
        let rows = sqlx::query_as::<_, StockSnapshot>(
            "SELECT p.id AS product_id, p.name, p.stock_quantity,
                    COALESCE(SUM(oi.quantity) FILTER (WHERE o.created_at >= $1), 0)::BIGINT
                        AS recent_sales
             FROM shop.product p
             LEFT JOIN shop.order_item oi ON oi.product_id = p.id
             LEFT JOIN shop.customer_order o ON o.id = oi.order_id
             WHERE p.status
             GROUP BY p.id
             ORDER BY p.id",
        )
        .bind(since)
        .fetch_all(self.pool)
        .await?;

        Ok(rows)
    }
}
