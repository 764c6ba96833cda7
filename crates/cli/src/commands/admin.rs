//! Staff account commands.
//!
//! # Usage
//!
//! ```bash
//! # Create a staff account
//! glowmart-cli admin create -u linh -p 'mat-khau-dai' -n "Nguyễn Linh" -r staff
//!
//! # Give an existing account back-office access
//! glowmart-cli admin promote -u linh -r admin
//! ```

use glowmart_admin::db::{RepositoryError, UserRepository};
use glowmart_admin::services::{AdminAuthError, AdminAuthService};
use glowmart_core::{UserId, UserRole};
use thiserror::Error;

use super::{CommandError, connect};

/// Errors that can occur during staff account operations.
#[derive(Debug, Error)]
pub enum AdminError {
    #[error(transparent)]
    Command(#[from] CommandError),

    /// Invalid role.
    #[error("Invalid role: {0}. Valid roles: admin, staff, customer")]
    InvalidRole(String),

    /// Creating a plain customer is the storefront's job.
    #[error("Staff accounts need the admin or staff role")]
    NotBackOfficeRole,

    #[error("{0}")]
    Auth(#[from] AdminAuthError),

    /// No account with this username.
    #[error("No user named {0}")]
    UnknownUser(String),

    #[error("Database error: {0}")]
    Repository(#[from] RepositoryError),
}

fn parse_role(role: &str) -> Result<UserRole, AdminError> {
    role.trim()
        .to_lowercase()
        .parse()
        .map_err(|_| AdminError::InvalidRole(role.to_owned()))
}

/// Create a staff account with a password.
///
/// # Errors
///
/// Returns `AdminError` for an unknown or customer role, a weak password, a
/// taken username or a database failure.
pub async fn create_user(
    username: &str,
    password: &str,
    fullname: &str,
    role: &str,
) -> Result<UserId, AdminError> {
    let role = parse_role(role)?;
    if !role.is_back_office() {
        return Err(AdminError::NotBackOfficeRole);
    }

    let pool = connect().await?;
    tracing::info!("Creating staff account: {} ({})", username, role);

    let user_id = AdminAuthService::new(&pool)
        .create_staff(username, password, fullname, role)
        .await?;

    tracing::info!("Staff account created. ID: {}, Role: {}", user_id, role);
    Ok(user_id)
}

/// Change an existing account's role.
///
/// # Errors
///
/// Returns `AdminError::UnknownUser` if no account has this username.
pub async fn promote(username: &str, role: &str) -> Result<UserId, AdminError> {
    let role = parse_role(role)?;
    let pool = connect().await?;

    let user_id = UserRepository::new(&pool)
        .set_role(username.trim(), role)
        .await
        .map_err(|e| match e {
            RepositoryError::NotFound => AdminError::UnknownUser(username.to_owned()),
            other => AdminError::Repository(other),
        })?;

    tracing::info!("User {} ({}) now has role {}", username, user_id, role);
    Ok(user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_role() {
        assert!(matches!(parse_role(" Staff "), Ok(UserRole::Staff)));
        assert!(matches!(parse_role("admin"), Ok(UserRole::Admin)));
        assert!(matches!(
            parse_role("super_admin"),
            Err(AdminError::InvalidRole(_))
        ));
    }
}
