//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                        - Liveness check
//! GET  /health/ready                  - Readiness check (database)
//!
//! # Auth
//! GET  /login                         - Login page
//! POST /login                         - Staff login
//! POST /logout                        - Logout
//!
//! # Everything below requires a staff session
//! GET  /                              - Dashboard counts
//! GET  /customers                     - Customer listing
//! GET  /customers/{id}                - Customer profile + recent orders
//! GET  /products?page=                - Product listing, 10 per page
//! POST /products                      - Create product
//! POST /products/{id}                 - Edit product
//! GET  /reviews                       - Reviews (re-scanned for spam) + stats
//! GET  /inventory                     - Low-stock and dead-stock alerts
//! GET  /categories                    - Categories with product counts
//! POST /categories                    - Create category
//! POST /categories/{id}               - Edit category
//! POST /categories/{id}/delete        - Delete category
//! GET  /brands                        - Brand listing
//! POST /brands                        - Create brand
//! POST /brands/{id}/delete            - Delete brand
//! GET  /spam-keywords?category=       - Keyword listing + stats
//! POST /spam-keywords                 - Create keyword
//! POST /spam-keywords/{id}            - Edit keyword
//! POST /spam-keywords/{id}/toggle     - Flip active flag
//! POST /spam-keywords/{id}/delete     - Delete keyword
//! ```

pub mod auth;
pub mod brands;
pub mod categories;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod products;
pub mod reviews;
pub mod spam_keywords;

use std::str::FromStr;

use axum::{
    Json, Router,
    response::Redirect,
    routing::{get, post},
};
use serde::Serialize;
use tower_sessions::Session;

use crate::db::RepositoryError;
use crate::error::{AppError, Result};
use crate::flash::{self, FlashLevel, FlashMessage};
use crate::state::AppState;

/// JSON envelope for read routes.
#[derive(Debug, Serialize)]
pub struct Page<T> {
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

/// Turn a failed write into an error flash when the user can fix it.
///
/// Constraint violations go back to `to` with the message; anything else
/// propagates.
async fn write_failed(session: &Session, err: RepositoryError, to: &str) -> Result<Redirect> {
    match err {
        RepositoryError::Conflict(msg) => {
            tracing::warn!(error = %msg, "Write rejected");
            flash_redirect(session, FlashLevel::Error, msg, to).await
        }
        other => Err(AppError::Database(other)),
    }
}

/// Trimmed form text, `None` when blank.
fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(String::from)
}

/// Parse an optional select value; blank means none.
fn optional_id<T: FromStr>(value: Option<&str>, field: &str) -> std::result::Result<Option<T>, String> {
    match non_empty(value) {
        None => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| format!("Invalid {field}")),
    }
}

/// HTML checkboxes post `on` when ticked and nothing otherwise.
fn checkbox(value: Option<&str>) -> bool {
    value == Some("on")
}

/// Create all routes for the admin panel.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::dashboard))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/customers", get(customers::index))
        .route("/customers/{id}", get(customers::show))
        .route("/products", get(products::index).post(products::create))
        .route("/products/{id}", post(products::update))
        .route("/reviews", get(reviews::index))
        .route("/inventory", get(inventory::alerts))
        .route("/categories", get(categories::index).post(categories::create))
        .route("/categories/{id}", post(categories::update))
        .route("/categories/{id}/delete", post(categories::delete))
        .route("/brands", get(brands::index).post(brands::create))
        .route("/brands/{id}/delete", post(brands::delete))
        .route(
            "/spam-keywords",
            get(spam_keywords::index).post(spam_keywords::create),
        )
        .route("/spam-keywords/{id}", post(spam_keywords::update))
        .route("/spam-keywords/{id}/toggle", post(spam_keywords::toggle))
        .route("/spam-keywords/{id}/delete", post(spam_keywords::delete))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use secrecy::SecretString;
    use tower::ServiceExt;
    use tower_sessions::{MemoryStore, SessionManagerLayer};

    use super::*;
    use crate::config::AdminConfig;
    use glowmart_core::CategoryId;

    fn app() -> Router {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://localhost/glowmart_test"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: "http://localhost:3001".to_string(),
            session_secret: SecretString::from("Zq8#vR2!kP5@mW9$tL3^bN7&cX1*hJ4"),
            sentry_dsn: None,
            sentry_environment: None,
            sentry_sample_rate: 1.0,
            sentry_traces_sample_rate: 0.0,
        };
        let pool = sqlx::postgres::PgPoolOptions::new()
            .connect_lazy("postgres://localhost/glowmart_test")
            .unwrap();

        routes()
            .layer(SessionManagerLayer::new(MemoryStore::default()))
            .with_state(AppState::new(config, pool))
    }

    #[tokio::test]
    async fn test_protected_screens_redirect_to_login() {
        for uri in ["/", "/customers", "/reviews", "/spam-keywords?category=SCAM"] {
            let response = app()
                .oneshot(Request::get(uri).body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::SEE_OTHER, "{uri}");
            assert_eq!(response.headers()[header::LOCATION], "/login", "{uri}");
        }
    }

    #[tokio::test]
    async fn test_login_page_needs_no_session_user() {
        let response = app()
            .oneshot(Request::get("/login").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn test_optional_id_blank_is_none() {
        assert_eq!(optional_id::<CategoryId>(Some(""), "category"), Ok(None));
        assert_eq!(optional_id::<CategoryId>(None, "category"), Ok(None));
        assert_eq!(
            optional_id::<CategoryId>(Some(" 4 "), "category"),
            Ok(Some(CategoryId::new(4)))
        );
        assert_eq!(
            optional_id::<CategoryId>(Some("abc"), "category"),
            Err("Invalid category".to_string())
        );
    }

    #[test]
    fn test_checkbox() {
        assert!(checkbox(Some("on")));
        assert!(!checkbox(None));
        assert!(!checkbox(Some("off")));
    }
}
