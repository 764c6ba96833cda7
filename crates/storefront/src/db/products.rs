//! Catalog repository: products, categories and brands.

use std::collections::BTreeMap;

use sqlx::PgPool;
use tracing::instrument;

use glowmart_core::{BrandId, CategoryId, ProductId};

use super::RepositoryError;
use crate::cart::CatalogLookup;
use crate::models::{Brand, Category, Product};

const PRODUCT_COLUMNS: &str = "id, name, description, price, sale_price, stock_quantity, status, \
                               image_url, category_id, brand_id, created_at";

/// Optional filters for the shop listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShopFilter {
    pub category: Option<CategoryId>,
    pub brand: Option<BrandId>,
}

/// Repository for catalog reads.
#[derive(Clone, Copy)]
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a product by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn get(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?;

        Ok(product)
    }

    /// Get every product whose ID is in `ids`. Unknown IDs are skipped.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self), fields(count = ids.len()))]
    pub async fn get_many(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw: Vec<i32> = ids.iter().map(ProductId::as_i32).collect();
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product WHERE id = ANY($1)"
        ))
        .bind(raw)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Newest active products first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn newest(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE status
             ORDER BY id DESC
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Active products with a positive sale price.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn on_sale(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE status AND sale_price > 0
             ORDER BY id
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Active products in catalog order, with no filter and no sale condition.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn first(&self, limit: i64) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE status
             ORDER BY id
             LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// One page of the shop listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn shop_page(
        &self,
        filter: ShopFilter,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE status
               AND ($1::INT IS NULL OR category_id = $1)
               AND ($2::INT IS NULL OR brand_id = $2)
             ORDER BY id DESC
             LIMIT $3 OFFSET $4"
        ))
        .bind(filter.category)
        .bind(filter.brand)
        .bind(limit)
        .bind(offset)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Number of products matching the shop filter.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn shop_count(&self, filter: ShopFilter) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM shop.product
             WHERE status
               AND ($1::INT IS NULL OR category_id = $1)
               AND ($2::INT IS NULL OR brand_id = $2)",
        )
        .bind(filter.category)
        .bind(filter.brand)
        .fetch_one(self.pool)
        .await?;

        Ok(count)
    }

    /// Other products in the same category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn related(
        &self,
        category_id: CategoryId,
        exclude: ProductId,
        limit: i64,
    ) -> Result<Vec<Product>, RepositoryError> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE category_id = $1 AND id <> $2 AND status
             ORDER BY id DESC
             LIMIT $3"
        ))
        .bind(category_id)
        .bind(exclude)
        .bind(limit)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// Case-insensitive name search.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    #[instrument(skip(self))]
    pub async fn search(&self, term: &str) -> Result<Vec<Product>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(term));
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM shop.product
             WHERE name ILIKE $1 ESCAPE '\\'
             ORDER BY id DESC"
        ))
        .bind(pattern)
        .fetch_all(self.pool)
        .await?;

        Ok(products)
    }

    /// All categories, parents first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let categories = sqlx::query_as::<_, Category>(
            "SELECT id, name, slug, parent_id, description, image_url
             FROM shop.category
             ORDER BY parent_id NULLS FIRST, name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(categories)
    }

    /// Distinct brands that have at least one product in each category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn brands_by_category(
        &self,
    ) -> Result<BTreeMap<CategoryId, Vec<Brand>>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryBrandRow>(
            "SELECT DISTINCT p.category_id AS owner_category_id,
                    b.id, b.name, b.category_id, b.origin, b.logo_url
             FROM shop.brand b
             JOIN shop.product p ON p.brand_id = b.id
             WHERE p.category_id IS NOT NULL
             ORDER BY b.name",
        )
        .fetch_all(self.pool)
        .await?;

        let mut grouped: BTreeMap<CategoryId, Vec<Brand>> = BTreeMap::new();
        for row in rows {
            grouped
                .entry(row.owner_category_id)
                .or_default()
                .push(Brand {
                    id: row.id,
                    name: row.name,
                    category_id: row.category_id,
                    origin: row.origin,
                    logo_url: row.logo_url,
                });
        }

        Ok(grouped)
    }
}

impl CatalogLookup for ProductRepository<'_> {
    async fn products_by_ids(&self, ids: &[ProductId]) -> Result<Vec<Product>, RepositoryError> {
        self.get_many(ids).await
    }
}

#[derive(sqlx::FromRow)]
struct CategoryBrandRow {
    owner_category_id: CategoryId,
    id: BrandId,
    name: String,
    category_id: Option<CategoryId>,
    origin: String,
    logo_url: Option<String>,
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("son môi"), "son môi");
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
