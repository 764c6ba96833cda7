//! Business logic services for admin.
//!
//! # Services
//!
//! - `auth` - Staff login and account creation
//! - `inventory` - Low-stock and dead-stock alerts
//! - `moderation` - Re-scan of stored reviews
//! - `review_stats` - Review summary figures
//! - `spam` - Cached active spam keywords

pub mod auth;
pub mod inventory;
pub mod moderation;
pub mod review_stats;
pub mod spam;

pub use auth::{AdminAuthError, AdminAuthService, hash_password};
pub use inventory::{InventoryReport, StockAlert, StockSnapshot, build_alerts};
pub use moderation::{NewlyFlagged, rescan};
pub use review_stats::ReviewStats;
pub use spam::KeywordCache;
