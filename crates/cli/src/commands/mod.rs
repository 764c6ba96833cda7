//! CLI subcommand implementations.

pub mod admin;
pub mod migrate;

use sqlx::PgPool;

/// Environment variables tried, in order, for the database URL.
const DATABASE_URL_VARS: [&str; 3] = [
    "STOREFRONT_DATABASE_URL",
    "ADMIN_DATABASE_URL",
    "DATABASE_URL",
];

/// Errors shared by every command.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    /// No database URL in the environment.
    #[error("Missing environment variable: one of {}", DATABASE_URL_VARS.join(", "))]
    MissingDatabaseUrl,

    /// Database connection error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Connect to the shop database named by the environment.
///
/// # Errors
///
/// Returns `CommandError::MissingDatabaseUrl` if none of the variables is set.
pub async fn connect() -> Result<PgPool, CommandError> {
    dotenvy::dotenv().ok();

    let database_url = DATABASE_URL_VARS
        .iter()
        .find_map(|var| std::env::var(var).ok())
        .ok_or(CommandError::MissingDatabaseUrl)?;

    tracing::info!("Connecting to database...");
    Ok(PgPool::connect(&database_url).await?)
}
