//! Back-office accounts.
//!
//! Staff live in the same `app_user` table as customers; only the role and
//! superuser flag set them apart.

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{UserId, UserRole};

use super::RepositoryError;
use crate::models::CurrentAdmin;

#[derive(sqlx::FromRow)]
struct LoginRow {
    id: UserId,
    username: String,
    role: i16,
    is_superuser: bool,
    password_hash: String,
}

/// Repository for back-office account operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get an account and its password hash by username, whatever its role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored role is unknown.
    pub async fn login_record(
        &self,
        username: &str,
    ) -> Result<Option<(CurrentAdmin, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, LoginRow>(
            "SELECT u.id, u.username, u.role, u.is_superuser, p.password_hash
             FROM shop.app_user u
             JOIN shop.user_password p ON p.user_id = u.id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| {
            let role = UserRole::try_from(r.role)
                .map_err(|e| RepositoryError::DataCorruption(format!("user {}: {e}", r.id)))?;
            let admin = CurrentAdmin {
                id: r.id,
                username: r.username,
                role,
                is_superuser: r.is_superuser,
            };
            Ok((admin, r.password_hash))
        })
        .transpose()
    }

    /// Create a back-office account with a password and profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username is taken.
    #[instrument(skip(self, password_hash))]
    pub async fn create_staff(
        &self,
        username: &str,
        fullname: &str,
        role: UserRole,
        password_hash: &str,
    ) -> Result<UserId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let user_id: UserId = sqlx::query_scalar(
            "INSERT INTO shop.app_user (username, role)
             VALUES ($1, $2)
             RETURNING id",
        )
        .bind(username)
        .bind(role.as_i16())
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e
                && db_err.is_unique_violation()
            {
                return RepositoryError::Conflict("username already exists".to_owned());
            }
            RepositoryError::Database(e)
        })?;

        sqlx::query("INSERT INTO shop.user_password (user_id, password_hash) VALUES ($1, $2)")
            .bind(user_id)
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query("INSERT INTO shop.customer_profile (user_id, fullname) VALUES ($1, $2)")
            .bind(user_id)
            .bind(fullname)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(user_id)
    }

    /// Change an existing account's role.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no account has this username.
    #[instrument(skip(self))]
    pub async fn set_role(&self, username: &str, role: UserRole) -> Result<UserId, RepositoryError> {
        let id: Option<UserId> =
            sqlx::query_scalar("UPDATE shop.app_user SET role = $2 WHERE username = $1 RETURNING id")
                .bind(username)
                .bind(role.as_i16())
                .fetch_optional(self.pool)
                .await?;

        id.ok_or(RepositoryError::NotFound)
    }
}
