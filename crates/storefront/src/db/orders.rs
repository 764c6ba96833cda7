//! Order persistence.

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{OrderId, OrderStatus};

use super::RepositoryError;
use crate::models::{NewOrder, NewOrderLine};
use crate::services::checkout::OrderWriter;

/// Repository for placed orders.
#[derive(Clone, Copy)]
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Insert an order header and its lines in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if any insert fails. Nothing is
    /// persisted in that case.
    #[instrument(skip(self, order, lines), fields(code = %order.code, lines = lines.len()))]
    pub async fn create(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<OrderId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let order_id: OrderId = sqlx::query_scalar(
            "INSERT INTO shop.customer_order (
                 order_code, user_id, fullname, phone, address,
                 total_money, shipping_fee, final_money,
                 payment_method, note, status
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING id",
        )
        .bind(order.code.as_str())
        .bind(order.user_id)
        .bind(&order.shipping.fullname)
        .bind(&order.shipping.phone)
        .bind(&order.shipping.address)
        .bind(order.total_money)
        .bind(order.shipping_fee)
        .bind(order.final_money)
        .bind(order.payment_method.to_string())
        .bind(&order.note)
        .bind(OrderStatus::Pending.to_string())
        .fetch_one(&mut *tx)
        .await?;

        for line in lines {
            sqlx::query(
                "INSERT INTO shop.order_item (order_id, product_id, product_name, price, quantity)
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(order_id)
            .bind(line.product_id)
            .bind(&line.product_name)
            .bind(line.price)
            .bind(line.quantity)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        tracing::info!(order_id = %order_id, "Order created");
        Ok(order_id)
    }
}

impl OrderWriter for OrderRepository<'_> {
    async fn write_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> Result<OrderId, RepositoryError> {
        self.create(order, lines).await
    }
}
