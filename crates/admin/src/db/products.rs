//! Product management.

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::ProductId;

use super::{RepositoryError, map_constraint};
use crate::models::{Product, ProductInput};

const PRODUCT_COLUMNS: &str = "id, name, description, price, sale_price, stock_quantity, status, \
                               image_url, category_id, brand_id, created_at, updated_at";

/// Repository for product writes and back-office listings.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// One page of products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn page(&self, limit: i64, offset: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             ORDER BY id DESC
             LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Total number of products.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar("SELECT COUNT(*) FROM shop.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Insert a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the category or brand does not exist.
    /// Returns `RepositoryError::Database` if the insert fails otherwise.
    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(&self, input: &ProductInput) -> Result<ProductId, RepositoryError> {
        let id = sqlx::query_scalar(
            "INSERT INTO shop.product (
                 name, description, price, sale_price, stock_quantity, status,
                 image_url, category_id, brand_id
             )
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
             RETURNING id",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_price)
        .bind(input.stock_quantity)
        .bind(input.status)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(input.brand_id)
        .fetch_one(self.pool)
        .await
        .map_err(|e| map_constraint(e, "product"))?;

        Ok(id)
    }

    /// Replace a product's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no product has this ID.
    /// Returns `RepositoryError::Conflict` if the category or brand does not exist.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update(&self, id: ProductId, input: &ProductInput) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE shop.product
             SET name = $2, description = $3, price = $4, sale_price = $5,
                 stock_quantity = $6, status = $7, image_url = $8,
                 category_id = $9, brand_id = $10, updated_at = NOW()
             WHERE id = $1",
        )
        .bind(id)
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.price)
        .bind(input.sale_price)
        .bind(input.stock_quantity)
        .bind(input.status)
        .bind(&input.image_url)
        .bind(input.category_id)
        .bind(input.brand_id)
        .execute(self.pool)
        .await
        .map_err(|e| map_constraint(e, "product"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }
        Ok(())
    }
}
