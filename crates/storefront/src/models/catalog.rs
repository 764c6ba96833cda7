//! Catalog types: products, categories and brands.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

use glowmart_core::{BrandId, CategoryId, ProductId, effective_unit_price};

/// A product as sold in the shop.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    /// Discounted price; only meaningful when strictly positive.
    pub sale_price: Decimal,
    pub stock_quantity: i32,
    /// Whether the product is currently on sale in the shop.
    pub status: bool,
    pub image_url: Option<String>,
    pub category_id: Option<CategoryId>,
    pub brand_id: Option<BrandId>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    /// Price a shopper pays if they add this product now.
    #[must_use]
    pub fn current_price(&self) -> Decimal {
        effective_unit_price(self.price, self.sale_price)
    }

    /// Whether a positive sale price is set.
    #[must_use]
    pub fn is_on_sale(&self) -> bool {
        self.sale_price > Decimal::ZERO
    }
}

/// A product category. Categories form a two-level tree via `parent_id`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: Option<String>,
    pub parent_id: Option<CategoryId>,
    pub description: String,
    pub image_url: Option<String>,
}

/// A cosmetics brand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct Brand {
    pub id: BrandId,
    pub name: String,
    pub category_id: Option<CategoryId>,
    pub origin: String,
    pub logo_url: Option<String>,
}
