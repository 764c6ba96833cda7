//! Cart route handlers.
//!
//! Each handler attaches the session cart, applies one mutation and commits.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use glowmart_core::{ProductId, format_vnd};

use super::{Page, page};
use crate::cart::{Cart, EnrichedCart};
use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// One enriched cart line as rendered.
#[derive(Debug, Serialize)]
pub struct CartItemView {
    pub product_id: String,
    /// `None` when the product has left the catalog.
    pub name: Option<String>,
    pub image_url: Option<String>,
    pub quantity: i64,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub display_line_total: String,
}

/// Cart body shared by the cart and checkout pages.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub count: i64,
    pub total_price: Decimal,
    pub display_total: String,
}

impl CartView {
    /// Render an enriched cart.
    #[must_use]
    pub fn new(cart: &Cart, enriched: &EnrichedCart) -> Self {
        let items = enriched
            .iter()
            .map(|item| CartItemView {
                product_id: item.product_id.to_owned(),
                name: item.product.map(|p| p.name.clone()),
                image_url: item.product.and_then(|p| p.image_url.clone()),
                quantity: item.quantity,
                unit_price: item.unit_price,
                line_total: item.line_total,
                display_line_total: format_vnd(item.line_total),
            })
            .collect();
        let total_price = enriched.total_price();

        Self {
            items,
            count: cart.count(),
            total_price,
            display_total: format_vnd(total_price),
        }
    }
}

/// Show the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Result<Json<Page<CartView>>> {
    let cart = Cart::attach(&session).await?;
    let enriched = cart.enrich(&ProductRepository::new(state.pool())).await?;

    Ok(page(&session, CartView::new(&cart, &enriched)).await)
}

/// Add-to-cart form.
#[derive(Debug, Default, Deserialize)]
pub struct AddForm {
    pub quantity: Option<i64>,
    #[serde(default, rename = "override")]
    pub override_quantity: bool,
}

/// Add a product, or set its quantity when `override=true`.
#[instrument(skip(state, session, form))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Path(id): Path<ProductId>,
    Form(form): Form<AddForm>,
) -> Result<Redirect> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let mut cart = Cart::attach(&session).await?;
    cart.add(&product, form.quantity.unwrap_or(1), form.override_quantity);
    cart.commit(&session).await?;

    info!(product_id = %id, count = cart.count(), "Cart updated");
    Ok(Redirect::to("/cart"))
}

/// Decrease a line by one.
#[instrument(skip(session))]
pub async fn decrease(session: Session, Path(id): Path<ProductId>) -> Result<Redirect> {
    let mut cart = Cart::attach(&session).await?;
    cart.decrease(id);
    cart.commit(&session).await?;

    Ok(Redirect::to("/cart"))
}

/// Remove a line.
#[instrument(skip(session))]
pub async fn remove(session: Session, Path(id): Path<ProductId>) -> Result<Redirect> {
    let mut cart = Cart::attach(&session).await?;
    cart.remove(id);
    cart.commit(&session).await?;

    Ok(Redirect::to("/cart"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::cart::tests::{FixedCatalog, product};

    #[tokio::test]
    async fn test_cart_view_marks_orphaned_lines() {
        let mut cart = Cart::default();
        cart.add(&product(1, 100_000, 0), 2, false);
        cart.add(&product(2, 50_000, 0), 1, false);

        // Product 2 has been deleted from the catalog.
        let catalog = FixedCatalog(vec![product(1, 100_000, 0)]);
        let enriched = cart.enrich(&catalog).await.unwrap();
        let view = CartView::new(&cart, &enriched);

        assert_eq!(view.count, 3);
        assert_eq!(view.total_price, Decimal::from(250_000));
        assert_eq!(view.items.len(), 2);
        assert_eq!(view.items[0].name.as_deref(), Some("Product 1"));
        assert!(view.items[1].name.is_none());
    }
}
