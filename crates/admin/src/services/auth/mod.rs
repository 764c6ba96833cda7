//! Back-office authentication.
//!
//! Staff sign in with the same username and password as on the storefront.
//! Only admin and staff roles, or superusers, get a back-office session.

mod error;

pub use error::AdminAuthError;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{UserId, UserRole};

use crate::db::{RepositoryError, UserRepository};
use crate::models::CurrentAdmin;

/// Minimum password length for staff accounts.
const MIN_PASSWORD_LENGTH: usize = 8;

/// Admin authentication service.
pub struct AdminAuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AdminAuthService<'a> {
    /// Create a new admin authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Check a username and password and return the back-office identity.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::InvalidCredentials` if the username/password is wrong.
    /// Returns `AdminAuthError::NotStaff` if the account is a customer.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<CurrentAdmin, AdminAuthError> {
        let (admin, password_hash) = self
            .users
            .login_record(username.trim())
            .await?
            .ok_or(AdminAuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        if !admin.is_allowed() {
            return Err(AdminAuthError::NotStaff);
        }

        Ok(admin)
    }

    /// Create a staff account.
    ///
    /// # Errors
    ///
    /// Returns `AdminAuthError::WeakPassword` for a short password.
    /// Returns `AdminAuthError::UserAlreadyExists` if the username is taken.
    #[instrument(skip(self, password))]
    pub async fn create_staff(
        &self,
        username: &str,
        password: &str,
        fullname: &str,
        role: UserRole,
    ) -> Result<UserId, AdminAuthError> {
        validate_password(password)?;
        let password_hash = hash_password(password)?;

        self.users
            .create_staff(username.trim(), fullname.trim(), role, &password_hash)
            .await
            .map_err(|e| match e {
                RepositoryError::Conflict(_) => AdminAuthError::UserAlreadyExists,
                other => AdminAuthError::Repository(other),
            })
    }
}

fn validate_password(password: &str) -> Result<(), AdminAuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AdminAuthError::WeakPassword(format!(
            "password must be at least {MIN_PASSWORD_LENGTH} characters"
        )));
    }
    Ok(())
}

/// Hash a password using Argon2id.
///
/// # Errors
///
/// Returns `AdminAuthError::PasswordHash` if hashing fails.
pub fn hash_password(password: &str) -> Result<String, AdminAuthError> {
    let salt = SaltString::generate(&mut OsRng);

    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AdminAuthError::PasswordHash)
}

fn verify_password(password: &str, hash: &str) -> Result<(), AdminAuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AdminAuthError::InvalidCredentials)?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AdminAuthError::InvalidCredentials)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("quan-tri-2026").unwrap();
        assert!(verify_password("quan-tri-2026", &hash).is_ok());
        assert!(matches!(
            verify_password("quan-tri-2025", &hash),
            Err(AdminAuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_short_password_rejected() {
        assert!(matches!(
            validate_password("abc"),
            Err(AdminAuthError::WeakPassword(_))
        ));
        assert!(validate_password("long-enough").is_ok());
    }
}
