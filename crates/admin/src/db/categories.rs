//! Category management.

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::CategoryId;

use super::{RepositoryError, map_constraint};
use crate::models::{Category, CategoryInput};

/// Repository for categories.
pub struct CategoryRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> CategoryRepository<'a> {
    /// Create a new category repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// All categories with product counts, grouped under their parents.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn list_with_counts(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.slug, c.parent_id, c.description, c.image_url,
                    COUNT(p.id) AS product_count
             FROM shop.category c
             LEFT JOIN shop.product p ON p.category_id = c.id
             GROUP BY c.id
             ORDER BY c.parent_id NULLS FIRST, c.name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Get a category by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CategoryId) -> Result<Option<Category>, RepositoryError> {
        let category = sqlx::query_as::<_, Category>(
            "SELECT c.id, c.name, c.slug, c.parent_id, c.description, c.image_url,
                    (SELECT COUNT(*) FROM shop.product p WHERE p.category_id = c.id)
                        AS product_count
             FROM shop.category c
             WHERE c.id = $1",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(category)
    }

    /// Insert a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the slug is taken or the parent is unknown.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &CategoryInput) -> Result<CategoryId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO shop.category (name, slug, parent_id, description, image_url)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(&input.description)
        .bind(&input.image_url)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "category"))?;

        Ok(id)
    }

    /// Replace a category's fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this ID.
    /// Returns `RepositoryError::Conflict` if the slug is taken or the parent is unknown.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update(&self, id: CategoryId, input: &CategoryInput) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.category
             SET name = $2, slug = $3, parent_id = $4, description = $5,
                 image_url = COALESCE($6, image_url)
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.slug)
        .bind(input.parent_id)
        .bind(&input.description)
        .bind(&input.image_url)
        .execute(self.pool)
        .await
        .map_err(|e| map_constraint(e, "category"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }

    /// Delete a category. Products and brands filed under it keep existing
    /// with no category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no category has this ID.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete(&self, id: CategoryId) -> Result<String, RepositoryError> {
        let name: Option<String> =
            sqlx::query_scalar("DELETE FROM shop.category WHERE id = $1 RETURNING name")
                .bind(id)
                .fetch_optional(self.pool)
                .await
                .map_err(|e| map_constraint(e, "category"))?;

        name.ok_or(RepositoryError::NotFound)
    }
}
