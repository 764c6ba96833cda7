//! Brand management routes.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use glowmart_core::BrandId;

use super::{Page, flash_redirect, non_empty, optional_id, page, write_failed};
use crate::db::{BrandRepository, CategoryRepository};
use crate::error::Result;
use crate::flash::FlashLevel;
use crate::middleware::RequireAdminAuth;
use crate::models::{Brand, BrandInput, Category};
use crate::state::AppState;

const BRANDS: &str = "/brands";

/// Brand listing body.
#[derive(Debug, Serialize)]
pub struct BrandsView {
    pub brands: Vec<Brand>,
    pub categories: Vec<Category>,
}

/// Brand form as posted.
#[derive(Debug, Default, Deserialize)]
pub struct BrandForm {
    #[serde(default)]
    pub name: String,
    pub category: Option<String>,
    #[serde(default)]
    pub origin: String,
    pub logo_url: Option<String>,
}

impl TryFrom<BrandForm> for BrandInput {
    type Error = String;

    fn try_from(form: BrandForm) -> std::result::Result<Self, Self::Error> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err("Brand name is required".to_string());
        }

        Ok(Self {
            name,
            category_id: optional_id(form.category.as_deref(), "category")?,
            origin: form.origin.trim().to_string(),
            logo_url: non_empty(form.logo_url.as_deref()),
        })
    }
}

/// Brand listing.
#[instrument(skip(state, session, _admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Page<BrandsView>>> {
    let brands = BrandRepository::new(state.pool()).list().await?;
    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;

    Ok(page(&session, BrandsView { brands, categories }).await)
}

/// Create a brand.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<BrandForm>,
) -> Result<Redirect> {
    let input = match BrandInput::try_from(form) {
        Ok(input) => input,
        Err(msg) => return flash_redirect(&session, FlashLevel::Error, msg, BRANDS).await,
    };

    match BrandRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            info!(brand_id = %id, "Brand created");
            let msg = format!("Added brand \"{}\"", input.name);
            flash_redirect(&session, FlashLevel::Success, msg, BRANDS).await
        }
        Err(e) => write_failed(&session, e, BRANDS).await,
    }
}

/// Delete a brand.
#[instrument(skip(state, session, admin), fields(admin = %admin.username, brand_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<BrandId>,
) -> Result<Redirect> {
    match BrandRepository::new(state.pool()).delete(id).await {
        Ok(name) => {
            info!("Brand deleted");
            let msg = format!("Deleted brand \"{name}\"");
            flash_redirect(&session, FlashLevel::Success, msg, BRANDS).await
        }
        Err(e) => write_failed(&session, e, BRANDS).await,
    }
}
