//! Product management routes.

use std::str::FromStr;

use axum::{
    Form, Json,
    extract::{Path, Query, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use glowmart_core::ProductId;

use super::{Page, checkbox, flash_redirect, non_empty, optional_id, page, write_failed};
use crate::db::{BrandRepository, CategoryRepository, ProductRepository};
use crate::error::Result;
use crate::flash::FlashLevel;
use crate::middleware::RequireAdminAuth;
use crate::models::{Brand, Category, Product, ProductInput};
use crate::state::AppState;

/// Products per admin listing page.
const PAGE_SIZE: i64 = 10;

/// `?page=` query; junk falls back to the first page.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
}

/// Product listing body.
#[derive(Debug, Serialize)]
pub struct ProductsView {
    pub products: Vec<Product>,
    pub page: i64,
    pub total_pages: i64,
    pub total: i64,
    pub categories: Vec<Category>,
    pub brands: Vec<Brand>,
}

/// Product create/edit form as posted.
#[derive(Debug, Default, Deserialize)]
pub struct ProductForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: String,
    #[serde(default)]
    pub sale_price: String,
    #[serde(default)]
    pub stock_quantity: String,
    pub status: Option<String>,
    pub image_url: Option<String>,
    pub category: Option<String>,
    pub brand: Option<String>,
}

impl TryFrom<ProductForm> for ProductInput {
    type Error = String;

    fn try_from(form: ProductForm) -> std::result::Result<Self, Self::Error> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err("Product name is required".to_string());
        }

        let price = non_negative_money(&form.price, "Price")?;
        let sale_price = if form.sale_price.trim().is_empty() {
            Decimal::ZERO
        } else {
            non_negative_money(&form.sale_price, "Sale price")?
        };

        let stock_quantity = match form.stock_quantity.trim() {
            "" => 0,
            raw => raw
                .parse::<i32>()
                .map_err(|_| "Stock must be a whole number".to_string())?,
        };
        if stock_quantity < 0 {
            return Err("Stock cannot be negative".to_string());
        }

        Ok(Self {
            name,
            description: form.description.trim().to_string(),
            price,
            sale_price,
            stock_quantity,
            status: checkbox(form.status.as_deref()),
            image_url: non_empty(form.image_url.as_deref()),
            category_id: optional_id(form.category.as_deref(), "category")?,
            brand_id: optional_id(form.brand.as_deref(), "brand")?,
        })
    }
}

fn non_negative_money(raw: &str, field: &str) -> std::result::Result<Decimal, String> {
    let value =
        Decimal::from_str(raw.trim()).map_err(|_| format!("{field} must be a number"))?;
    if value < Decimal::ZERO {
        return Err(format!("{field} cannot be negative"));
    }
    Ok(value)
}

/// Requested page clamped to `1..=total_pages`.
fn clamp_page(requested: Option<&str>, total: i64) -> (i64, i64) {
    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let page = requested
        .and_then(|p| p.trim().parse::<i64>().ok())
        .unwrap_or(1)
        .clamp(1, total_pages);
    (page, total_pages)
}

/// Product listing, newest first.
#[instrument(skip(state, session, _admin, query))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Query(query): Query<PageQuery>,
) -> Result<Json<Page<ProductsView>>> {
    let repo = ProductRepository::new(state.pool());
    let total = repo.count().await?;
    let (current, total_pages) = clamp_page(query.page.as_deref(), total);
    let products = repo.page(PAGE_SIZE, (current - 1) * PAGE_SIZE).await?;

    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;
    let brands = BrandRepository::new(state.pool()).list().await?;

    let view = ProductsView {
        products,
        page: current,
        total_pages,
        total,
        categories,
        brands,
    };
    Ok(page(&session, view).await)
}

/// Create a product.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let input = match ProductInput::try_from(form) {
        Ok(input) => input,
        Err(msg) => {
            warn!(error = %msg, "Product form rejected");
            return flash_redirect(&session, FlashLevel::Error, msg, "/products").await;
        }
    };

    match ProductRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            info!(product_id = %id, "Product created");
            flash_redirect(
                &session,
                FlashLevel::Success,
                format!("Added product \"{}\"", input.name),
                "/products",
            )
            .await
        }
        Err(e) => write_failed(&session, e, "/products").await,
    }
}

/// Edit a product.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username, product_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ProductForm>,
) -> Result<Redirect> {
    let input = match ProductInput::try_from(form) {
        Ok(input) => input,
        Err(msg) => {
            warn!(error = %msg, "Product form rejected");
            return flash_redirect(&session, FlashLevel::Error, msg, "/products").await;
        }
    };

    match ProductRepository::new(state.pool()).update(id, &input).await {
        Ok(()) => {
            info!("Product updated");
            flash_redirect(
                &session,
                FlashLevel::Success,
                format!("Updated product \"{}\"", input.name),
                "/products",
            )
            .await
        }
        Err(e) => write_failed(&session, e, "/products").await,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn form(name: &str, price: &str, sale: &str, stock: &str) -> ProductForm {
        ProductForm {
            name: name.to_string(),
            price: price.to_string(),
            sale_price: sale.to_string(),
            stock_quantity: stock.to_string(),
            status: Some("on".to_string()),
            category: Some(String::new()),
            ..ProductForm::default()
        }
    }

    #[test]
    fn test_valid_form() {
        let input = ProductInput::try_from(form(" Son môi ", "250000", "", "12")).unwrap();
        assert_eq!(input.name, "Son môi");
        assert_eq!(input.price, Decimal::from(250_000));
        assert_eq!(input.sale_price, Decimal::ZERO);
        assert_eq!(input.stock_quantity, 12);
        assert!(input.status);
        assert!(input.category_id.is_none());
    }

    #[test]
    fn test_validation_failures() {
        assert!(ProductInput::try_from(form("  ", "1", "0", "1")).is_err());
        assert!(ProductInput::try_from(form("A", "-1", "0", "1")).is_err());
        assert!(ProductInput::try_from(form("A", "1", "-5", "1")).is_err());
        assert!(ProductInput::try_from(form("A", "1", "0", "-1")).is_err());
        assert!(ProductInput::try_from(form("A", "abc", "0", "1")).is_err());
    }

    #[test]
    fn test_clamp_page() {
        assert_eq!(clamp_page(None, 0), (1, 1));
        assert_eq!(clamp_page(Some("3"), 25), (3, 3));
        assert_eq!(clamp_page(Some("9"), 25), (3, 3));
        assert_eq!(clamp_page(Some("x"), 25), (1, 3));
        assert_eq!(clamp_page(Some("-2"), 25), (1, 3));
    }
}
