//! Catalog records as the back-office manages them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use glowmart_core::{BrandId, CategoryId, ProductId};

/// A product row.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_price: Decimal,
    pub stock_quantity: i32,
    pub status: bool,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable product fields, validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub sale_price: Decimal,
    pub stock_quantity: i32,
    pub status: bool,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
}

/// A category with the number of products filed under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub description: String,
    pub image_url: Option<String>,
    pub product_count: i64,
}

/// Editable category fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryInput {
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub description: String,
    pub image_url: Option<String>,
}

/// A brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub origin: String,
    pub logo_url: Option<String>,
}

/// Editable brand fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrandInput {
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub origin: String,
    pub logo_url: Option<String>,
}
