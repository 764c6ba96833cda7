//! Database operations for storefront `PostgreSQL`.
//!
//! # Schema: `shop`
//!
//! The storefront and admin binaries share one database. The storefront reads
//! the catalog and writes customer-owned data:
//!
//! ## Tables
//!
//! - `product`, `category`, `brand` - Catalog (read-only here)
//! - `app_user`, `user_password`, `customer_profile` - Accounts
//! - `user_address` - Saved delivery addresses
//! - `customer_order`, `order_item` - Placed orders
//! - `review` - Product reviews with moderation annotations
//! - `spam_keyword` - Blocked keywords (read-only here)
//! - `tower_sessions.session` - Tower-sessions storage
//!
//! # Migrations
//!
//! Migrations are stored in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p glowmart-cli -- migrate
//! ```

pub mod addresses;
pub mod orders;
pub mod products;
pub mod reviews;
pub mod spam_keywords;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use addresses::AddressRepository;
pub use orders::OrderRepository;
pub use products::{ProductRepository, ShopFilter};
pub use reviews::ReviewRepository;
pub use spam_keywords::SpamKeywordRepository;
pub use users::UserRepository;

/// Errors that can occur during repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// Requested entity was not found.
    #[error("not found")]
    NotFound,

    /// Constraint violation (e.g., unique username).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
