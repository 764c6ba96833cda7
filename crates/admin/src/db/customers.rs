//! Customer profiles and their order history.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{CustomerProfileId, OrderId};

use super::RepositoryError;
use crate::models::{Customer, OrderSummary};

const CUSTOMER_COLUMNS: &str = "c.id, c.user_id, u.username, u.email, c.fullname, c.phone, c.created_at";

/// Orders shown on a customer's detail page.
pub const RECENT_ORDER_LIMIT: i64 = 10;

#[derive(Debug, sqlx::FromRow)]
struct OrderSummaryRow {
    id: OrderId,
    order_code: String,
    final_money: Decimal,
    payment_method: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderSummaryRow> for OrderSummary {
    type Error = RepositoryError;

    fn try_from(row: OrderSummaryRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            order_code: row.order_code,
            final_money: row.final_money,
            payment_method: row
                .payment_method
                .parse()
                .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", row.id)))?,
            status: row
                .status
                .parse()
                .map_err(|e| RepositoryError::DataCorruption(format!("order {}: {e}", row.id)))?,
            created_at: row.created_at,
        })
    }
}

/// Repository for customer reads.
pub struct CustomerRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CustomerRepository<'a> {
    /// Create a new customer repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All customers, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Customer>, RepositoryError> {
        let customers = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS}
             FROM shop.customer_profile c
             JOIN shop.app_user u ON u.id = c.user_id
             ORDER BY c.created_at DESC"
        ))
        .fetch_all(self.pool)
        .await?;

        Ok(customers)
    }

    /// Get a customer by profile ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(customer_id = %id))]
    pub async fn get(&self, id: CustomerProfileId) -> Result<Option<Customer>, RepositoryError> {
        let customer = sqlx::query_as::<_, Customer>(&format!(
            "SELECT {CUSTOMER_COLUMNS}
             FROM shop.customer_profile c
             JOIN shop.app_user u ON u.id = c.user_id
             WHERE c.id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(customer)
    }

    /// The customer's most recent orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored status or payment method is unknown.
    #[instrument(skip(self), fields(user_id = %customer.user_id))]
    pub async fn recent_orders(
        &self,
        customer: &Customer,
        limit: i64,
    ) -> Result<Vec<OrderSummary>, RepositoryError> {
        let rows = sqlx::query_as::<_, OrderSummaryRow>(
            "SELECT id, order_code, final_money, payment_method, status, created_at
             FROM shop.customer_order
             WHERE user_id = $1
             ORDER BY created_at DESC
             LIMIT $2",
        )
        .bind(customer.user_id)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(TryInto::try_into).collect()
    }
}
