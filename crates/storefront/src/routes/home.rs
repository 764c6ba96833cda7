//! Home page route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::products::{ProductCard, cards};
use super::{Page, page};
use crate::db::ProductRepository;
use crate::error::Result;
use crate::state::AppState;

/// Products in each home page strip.
const STRIP_SIZE: i64 = 8;

/// Home page body.
#[derive(Debug, Serialize)]
pub struct HomeView {
    /// Newest products.
    pub offer_products: Vec<ProductCard>,
    /// Products on sale, or the first listed products if nothing is on sale.
    pub trending_products: Vec<ProductCard>,
}

/// Display the home page.
#[instrument(skip(state, session))]
pub async fn home(State(state): State<AppState>, session: Session) -> Result<Json<Page<HomeView>>> {
    let repo = ProductRepository::new(state.pool());

    let offer = repo.newest(STRIP_SIZE).await?;
    let mut trending = repo.on_sale(STRIP_SIZE).await?;
    if trending.is_empty() {
        trending = repo.first(STRIP_SIZE).await?;
    }

    let view = HomeView {
        offer_products: cards(&offer),
        trending_products: cards(&trending),
    };

    Ok(page(&session, view).await)
}
