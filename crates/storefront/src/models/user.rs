//! User and address types.

use chrono::{DateTime, Utc};
use serde::Serialize;

use glowmart_core::{AddressId, UserId, UserRole};

/// A storefront account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: Option<String>,
    pub role: UserRole,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
}

/// A saved delivery address belonging to one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Address {
    pub id: AddressId,
    pub user_id: UserId,
    pub receiver_name: String,
    pub phone: String,
    pub detail_address: String,
    pub district: String,
    pub city: String,
    pub is_default: bool,
}

impl Address {
    /// Render as a single delivery line: `detail, district, city`.
    #[must_use]
    pub fn one_line(&self) -> String {
        format!("{}, {}, {}", self.detail_address, self.district, self.city)
    }
}
