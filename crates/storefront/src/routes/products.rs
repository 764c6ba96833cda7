//! Catalog route handlers: shop listing, product detail and search.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use glowmart_core::{BrandId, CategoryId, ProductId, format_vnd};

use super::{Page, page};
use crate::db::{ProductRepository, ReviewRepository, ShopFilter};
use crate::error::{AppError, Result};
use crate::models::{Brand, Category, Product, Review};
use crate::state::AppState;

/// Products per shop page.
pub const SHOP_PAGE_SIZE: i64 = 12;

/// Related products shown on a product page.
const RELATED_LIMIT: i64 = 4;

/// Product summary for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductCard {
    pub id: ProductId,
    pub name: String,
    pub price: Decimal,
    pub sale_price: Decimal,
    pub current_price: Decimal,
    pub display_price: String,
    pub on_sale: bool,
    pub in_stock: bool,
    pub image_url: Option<String>,
}

impl From<&Product> for ProductCard {
    fn from(product: &Product) -> Self {
        Self {
            id: product.id,
            name: product.name.clone(),
            price: product.price,
            sale_price: product.sale_price,
            current_price: product.current_price(),
            display_price: format_vnd(product.current_price()),
            on_sale: product.is_on_sale(),
            in_stock: product.stock_quantity > 0,
            image_url: product.image_url.clone(),
        }
    }
}

/// Map a product list to cards.
pub fn cards(products: &[Product]) -> Vec<ProductCard> {
    products.iter().map(ProductCard::from).collect()
}

/// Shop query parameters. Blank or malformed IDs are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct ShopQuery {
    pub category: Option<String>,
    pub brand: Option<String>,
    pub page: Option<String>,
}

impl ShopQuery {
    fn filter(&self) -> ShopFilter {
        ShopFilter {
            category: parse_id::<CategoryId>(self.category.as_deref()),
            brand: parse_id::<BrandId>(self.brand.as_deref()),
        }
    }
}

fn parse_id<T: std::str::FromStr>(raw: Option<&str>) -> Option<T> {
    raw.filter(|s| !s.trim().is_empty())
        .and_then(|s| s.parse().ok())
}

/// Pagination state for a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
    pub total_items: i64,
    pub total_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
}

impl Pagination {
    /// Clamp the requested page into range. Out-of-range or garbage requests
    /// land on the nearest valid page.
    #[must_use]
    pub fn new(requested: Option<&str>, total_items: i64, per_page: i64) -> Self {
        let total_pages = ((total_items + per_page - 1) / per_page).max(1);
        let page = requested
            .and_then(|p| p.trim().parse::<i64>().ok())
            .unwrap_or(1)
            .clamp(1, total_pages);

        Self {
            page,
            per_page,
            total_items,
            total_pages,
            has_next: page < total_pages,
            has_previous: page > 1,
        }
    }

    /// Row offset of the first item on this page.
    #[must_use]
    pub const fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }
}

/// One sidebar entry: a category and the brands sold in it.
#[derive(Debug, Serialize)]
pub struct SidebarEntry {
    pub category: Category,
    pub brands: Vec<Brand>,
}

/// Shop listing body.
#[derive(Debug, Serialize)]
pub struct ShopView {
    pub products: Vec<ProductCard>,
    pub pagination: Pagination,
    pub sidebar: Vec<SidebarEntry>,
    pub active_category: Option<CategoryId>,
    pub active_brand: Option<BrandId>,
}

/// Shop listing.
#[instrument(skip(state, session))]
pub async fn shop(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<ShopQuery>,
) -> Result<Json<Page<ShopView>>> {
    let repo = ProductRepository::new(state.pool());
    let filter = query.filter();

    let total = repo.shop_count(filter).await?;
    let pagination = Pagination::new(query.page.as_deref(), total, SHOP_PAGE_SIZE);
    let products = repo
        .shop_page(filter, pagination.per_page, pagination.offset())
        .await?;

    let mut brands = repo.brands_by_category().await?;
    let sidebar = repo
        .categories()
        .await?
        .into_iter()
        .map(|category| SidebarEntry {
            brands: brands.remove(&category.id).unwrap_or_default(),
            category,
        })
        .collect();

    let view = ShopView {
        products: cards(&products),
        pagination,
        sidebar,
        active_category: filter.category,
        active_brand: filter.brand,
    };

    Ok(page(&session, view).await)
}

/// Product detail body.
#[derive(Debug, Serialize)]
pub struct ProductView {
    pub product: Product,
    pub current_price: Decimal,
    pub display_price: String,
    pub related: Vec<ProductCard>,
    pub reviews: Vec<Review>,
}

/// Product detail.
#[instrument(skip(state, session))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
) -> Result<Json<Page<ProductView>>> {
    let repo = ProductRepository::new(state.pool());
    let product = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let related = match product.category_id {
        Some(category_id) => repo.related(category_id, product.id, RELATED_LIMIT).await?,
        None => Vec::new(),
    };
    let reviews = ReviewRepository::new(state.pool())
        .approved_for_product(product.id)
        .await?;

    let view = ProductView {
        current_price: product.current_price(),
        display_price: format_vnd(product.current_price()),
        related: cards(&related),
        reviews,
        product,
    };

    Ok(page(&session, view).await)
}

/// Search query.
#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub searched: Option<String>,
}

/// Search results body.
#[derive(Debug, Serialize)]
pub struct SearchView {
    pub searched: String,
    pub products: Vec<ProductCard>,
}

/// Name search. An empty query returns no products without hitting the database.
#[instrument(skip(state, session))]
pub async fn search(
    State(state): State<AppState>,
    session: Session,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Page<SearchView>>> {
    let searched = query.searched.unwrap_or_default().trim().to_string();
    let products = if searched.is_empty() {
        Vec::new()
    } else {
        ProductRepository::new(state.pool()).search(&searched).await?
    };

    let view = SearchView {
        products: cards(&products),
        searched,
    };

    Ok(page(&session, view).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_clamps() {
        let p = Pagination::new(None, 30, 12);
        assert_eq!((p.page, p.total_pages, p.offset()), (1, 3, 0));
        assert!(p.has_next && !p.has_previous);

        let p = Pagination::new(Some("3"), 30, 12);
        assert_eq!(p.offset(), 24);
        assert!(!p.has_next);

        assert_eq!(Pagination::new(Some("99"), 30, 12).page, 3);
        assert_eq!(Pagination::new(Some("-2"), 30, 12).page, 1);
        assert_eq!(Pagination::new(Some("abc"), 30, 12).page, 1);
    }

    #[test]
    fn test_pagination_empty_listing_has_one_page() {
        let p = Pagination::new(Some("2"), 0, 12);
        assert_eq!((p.page, p.total_pages), (1, 1));
        assert!(!p.has_next);
    }

    #[test]
    fn test_shop_query_ignores_bad_ids() {
        let query = ShopQuery {
            category: Some("3".to_string()),
            brand: Some(String::new()),
            page: None,
        };
        let filter = query.filter();
        assert_eq!(filter.category, Some(CategoryId::new(3)));
        assert_eq!(filter.brand, None);

        let query = ShopQuery {
            category: Some("son".to_string()),
            ..ShopQuery::default()
        };
        assert_eq!(query.filter().category, None);
    }
}
