//! User repository: accounts, password hashes and customer profiles.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use glowmart_core::{UserId, UserRole};

use super::RepositoryError;
use crate::models::User;

/// Fields collected by the registration form.
#[derive(Debug, Clone)]
pub struct NewCustomer<'a> {
    pub username: &'a str,
    pub email: Option<&'a str>,
    pub fullname: &'a str,
}

#[derive(sqlx::FromRow)]
struct UserRow {
    id: UserId,
    username: String,
    email: Option<String>,
    role: i16,
    is_superuser: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = RepositoryError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::try_from(row.role).map_err(|e| {
            RepositoryError::DataCorruption(format!("user {}: {e}", row.id))
        })?;

        Ok(Self {
            id: row.id,
            username: row.username,
            email: row.email,
            role,
            is_superuser: row.is_superuser,
            created_at: row.created_at,
        })
    }
}

#[derive(sqlx::FromRow)]
struct UserWithHashRow {
    #[sqlx(flatten)]
    user: UserRow,
    password_hash: String,
}

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Create a customer account with its password and profile.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username already exists.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_customer(
        &self,
        customer: &NewCustomer<'_>,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let row = sqlx::query_as::<_, UserRow>(
            "INSERT INTO shop.app_user (username, email, role)
             VALUES ($1, $2, $3)
             RETURNING id, username, email, role, is_superuser, created_at",
        )
        .bind(customer.username)
        .bind(customer.email)
        .bind(UserRole::Customer.as_i16())
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

        let user = User::try_from(row)?;

        sqlx::query(
            "INSERT INTO shop.user_password (user_id, password_hash)
             VALUES ($1, $2)",
        )
        .bind(user.id)
        .bind(password_hash)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO shop.customer_profile (user_id, fullname)
             VALUES ($1, $2)",
        )
        .bind(user.id)
        .bind(customer.fullname)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user and their password hash by username.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_password_hash(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        let row = sqlx::query_as::<_, UserWithHashRow>(
            "SELECT u.id, u.username, u.email, u.role, u.is_superuser, u.created_at,
                    p.password_hash
             FROM shop.app_user u
             JOIN shop.user_password p ON p.user_id = u.id
             WHERE u.username = $1",
        )
        .bind(username)
        .fetch_optional(self.pool)
        .await?;

        row.map(|r| Ok((User::try_from(r.user)?, r.password_hash)))
            .transpose()
    }
}
