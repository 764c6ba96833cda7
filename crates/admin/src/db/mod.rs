//! Database operations for the back-office.
//!
//! # Schema: `shop`
//!
//! Shared with the storefront. The back-office owns the catalog and the
//! spam keyword list, reads customers and orders, and annotates reviews.
//!
//! # Migrations
//!
//! Migrations live in `crates/storefront/migrations/` and run via:
//! ```bash
//! cargo run -p glowmart-cli -- migrate
//! ```

pub mod brands;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod products;
pub mod reviews;
pub mod spam_keywords;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

pub use brands::BrandRepository;
pub use categories::CategoryRepository;
pub use customers::CustomerRepository;
pub use dashboard::{DashboardCounts, DashboardRepository};
pub use inventory::InventoryRepository;
pub use products::ProductRepository;
pub use reviews::ReviewRepository;
pub use spam_keywords::{KeywordStats, SpamKeywordRepository};
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

    /// Constraint violation (e.g., duplicate keyword).
    #[error("constraint violation: {0}")]
    Conflict(String),
}

/// Map unique and foreign key violations to `Conflict`.
pub(crate) fn map_constraint(e: sqlx::Error, what: &str) -> RepositoryError {
    if let sqlx::Error::Database(ref db_err) = e {
        if db_err.is_unique_violation() {
            return RepositoryError::Conflict(format!("{what} already exists"));
        }
        if db_err.is_foreign_key_violation() {
            return RepositoryError::Conflict(format!("{what} is still referenced"));
        }
    }
    RepositoryError::Database(e)
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
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
