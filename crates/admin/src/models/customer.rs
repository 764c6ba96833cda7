//! Customers and their orders.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use glowmart_core::{CustomerProfileId, OrderId, OrderStatus, PaymentMethod, UserId};

/// A customer profile joined with its account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: CustomerProfileId,
    pub user_id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub fullname: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// One order in a customer's history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderSummary {
    pub id: OrderId,
    pub order_code: String,
    pub final_money: Decimal,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}
