//! Session-related types for admin authentication.

use serde::{Deserialize, Serialize};

use glowmart_core::{UserId, UserRole};

/// Session-stored back-office identity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CurrentAdmin {
    /// User's database ID.
    pub id: UserId,
    /// Login name.
    pub username: String,
    /// Account role.
    pub role: UserRole,
    /// Superusers pass every back-office check.
    pub is_superuser: bool,
}

impl CurrentAdmin {
    /// Whether this identity may use the back-office at all.
    ///
    /// Checked again on every request so a demoted account loses access as
    /// soon as its session is read.
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        self.is_superuser || self.role.is_back_office()
    }
}

/// Session keys for admin data.
pub mod keys {
    /// Key for storing the current logged-in admin.
    pub const CURRENT_ADMIN: &str = "current_admin";

    /// Key for pending one-shot flash messages.
    pub const FLASH: &str = "flash";
}
