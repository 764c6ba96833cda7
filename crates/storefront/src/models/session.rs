//! Session-related types.
//!
//! Types stored in the session for authentication and cart state.

use serde::{Deserialize, Serialize};

use glowmart_core::{UserId, UserRole};

/// Session-stored user identity.
///
/// Minimal data stored in the session to identify the logged-in user.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentUser {
    /// User's database ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Superusers reach the back-office regardless of role.
    #[serde(default)]
    pub is_superuser: bool,
}

impl CurrentUser {
    /// Whether this user should land in the back-office after login.
    #[must_use]
    pub const fn is_back_office(&self) -> bool {
        self.is_superuser || self.role.is_back_office()
    }
}

/// Session keys.
pub mod keys {
    /// Key for storing the current logged-in user.
    pub const CURRENT_USER: &str = "current_user";

    /// Key for the cart mapping `{ product_id: { quantity, price } }`.
    pub const CART: &str = "cart";

    /// Key for pending one-shot flash messages.
    pub const FLASH: &str = "flash";
}
