//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page (offers + trending)
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (database)
//!
//! # Catalog
//! GET  /shop?category=&brand=&page= - Product listing, 12 per page
//! GET  /product/{id}              - Product detail with related products and reviews
//! GET  /search?searched=          - Name search
//!
//! # Cart
//! GET  /cart                      - Cart contents
//! POST /cart/add/{id}             - Add (or set with `override=true`) a product
//! POST /cart/update/{id}          - Decrease quantity by one
//! POST /cart/remove/{id}          - Remove a line
//!
//! # Checkout (requires auth)
//! GET  /checkout                  - Enriched cart + saved addresses
//! POST /checkout                  - Place order
//!
//! # Reviews (requires auth)
//! POST /product/{id}/review       - Submit a review
//!
//! # Auth
//! GET  /register                  - Registration page
//! POST /register                  - Create account
//! GET  /login?next=               - Login page
//! POST /login                     - Login
//! POST /logout                    - Logout
//! ```
//!
//! Read routes answer JSON and include pending flash messages. Mutating routes
//! answer `303 See Other`.

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod products;
pub mod reviews;

use axum::{
    Json, Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::error::Result;
use crate::flash::{self, FlashLevel, FlashMessage};
use crate::state::AppState;

/// JSON envelope for read routes.
#[derive(Debug, Serialize)]
pub struct Page<T> {
    /// Flash messages queued by the previous request.
    pub messages: Vec<FlashMessage>,
    #[serde(flatten)]
    pub data: T,
}

/// Wrap `data` with any pending flash messages.
pub async fn page<T: Serialize>(session: &Session, data: T) -> Json<Page<T>> {
    Json(Page {
        messages: flash::take(session).await,
        data,
    })
}

/// Queue a flash message and redirect with `303 See Other`.
///
/// # Errors
///
/// Returns `AppError::Session` if the message cannot be stored.
pub async fn flash_redirect(
    session: &Session,
    level: FlashLevel,
    text: impl Into<String>,
    to: &str,
) -> Result<Redirect> {
    flash::push(session, level, text).await?;
    Ok(Redirect::to(to))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add/{id}", post(cart::add))
        .route("/update/{id}", post(cart::decrease))
        .route("/remove/{id}", post(cart::remove))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/shop", get(products::shop))
        .route("/product/{id}", get(products::show))
        .route("/product/{id}/review", post(reviews::submit))
        .route("/search", get(products::search))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
}
