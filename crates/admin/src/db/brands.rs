//! Brand management.

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::BrandId;

use super::{RepositoryError, map_constraint};
use crate::models::{Brand, BrandInput};

/// Repository for brands.
pub struct BrandRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> BrandRepository<'a> {
    /// Create a new brand repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All brands by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list(&self) -> Result<Vec<Brand>, RepositoryError> {
        let brands = sqlx::query_as::<_, Brand>(
            "SELECT id, name, category_id, origin, logo_url
             FROM shop.brand
             ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(brands)
    }

    /// Insert a brand.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category is unknown.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &BrandInput) -> Result<BrandId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO shop.brand (name, category_id, origin, logo_url)
             VALUES ($1, $2, $3, $4)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(input.category_id)
        .bind(&input.origin)
        .bind(&input.logo_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "brand"))?;

        Ok(id)
    }

    /// Delete a brand, returning its name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no brand has this ID.
    #[instrument(skip(self), fields(brand_id = %id))]
    pub async fn delete(&self, id: BrandId) -> Result<String, RepositoryError> {
        let name: Option<String> =
            sqlx::query_scalar("DELETE FROM shop.brand WHERE id = $1 RETURNING name")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| map_constraint(e, "brand"))?;

        name.ok_or(RepositoryError::NotFound)
    }
}
