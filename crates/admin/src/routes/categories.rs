//! Category management routes.

use axum::{
    Form, Json,
    extract::{Path, State},
    response::Redirect,
};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use glowmart_core::CategoryId;

use super::{Page, flash_redirect, non_empty, optional_id, page, write_failed};
use crate::db::CategoryRepository;
use crate::error::{AppError, Result};
use crate::flash::FlashLevel;
use crate::middleware::RequireAdminAuth;
use crate::models::{Category, CategoryInput};
use crate::state::AppState;

const CATEGORIES: &str = "/categories";

/// Category listing body.
#[derive(Debug, Serialize)]
pub struct CategoriesView {
    pub categories: Vec<Category>,
    /// Top-level categories, offered as parents.
    pub parents: Vec<Category>,
}

/// Category form as posted.
#[derive(Debug, Default, Deserialize)]
pub struct CategoryForm {
    #[serde(default)]
    pub name: String,
    pub slug: Option<String>,
    pub parent: Option<String>,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

impl TryFrom<CategoryForm> for CategoryInput {
    type Error = String;

    fn try_from(form: CategoryForm) -> std::result::Result<Self, Self::Error> {
        let name = form.name.trim().to_string();
        if name.is_empty() {
            return Err("Category name is required".to_string());
        }

        Ok(Self {
            name,
            slug: non_empty(form.slug.as_deref()),
            parent_id: optional_id(form.parent.as_deref(), "parent category")?,
            description: form.description.trim().to_string(),
            image_url: non_empty(form.image_url.as_deref()),
        })
    }
}

/// Validate an edit of category `id`.
fn edit_input(id: CategoryId, form: CategoryForm) -> std::result::Result<CategoryInput, String> {
    let input = CategoryInput::try_from(form)?;
    if input.parent_id == Some(id) {
        return Err("A category cannot be its own parent".to_string());
    }
    Ok(input)
}

/// Categories with product counts.
#[instrument(skip(state, session, _admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Page<CategoriesView>>> {
    let categories = CategoryRepository::new(state.pool())
        .list_with_counts()
        .await?;
    let parents = categories
        .iter()
        .filter(|c| c.parent_id.is_none())
        .cloned()
        .collect();

    Ok(page(&session, CategoriesView { categories, parents }).await)
}

/// Create a category.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username))]
pub async fn create(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let input = match CategoryInput::try_from(form) {
        Ok(input) => input,
        Err(msg) => return flash_redirect(&session, FlashLevel::Error, msg, CATEGORIES).await,
    };

    match CategoryRepository::new(state.pool()).create(&input).await {
        Ok(id) => {
            info!(category_id = %id, "Category created");
            let msg = format!("Added category \"{}\"", input.name);
            flash_redirect(&session, FlashLevel::Success, msg, CATEGORIES).await
        }
        Err(e) => write_failed(&session, e, CATEGORIES).await,
    }
}

/// Edit a category.
#[instrument(skip(state, session, admin, form), fields(admin = %admin.username, category_id = %id))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
    Form(form): Form<CategoryForm>,
) -> Result<Redirect> {
    let repo = CategoryRepository::new(state.pool());
    if repo.get(id).await?.is_none() {
        return Err(AppError::NotFound(format!("category {id}")));
    }

    let input = match edit_input(id, form) {
        Ok(input) => input,
        Err(msg) => return flash_redirect(&session, FlashLevel::Error, msg, CATEGORIES).await,
    };

    match repo.update(id, &input).await {
        Ok(()) => {
            info!("Category updated");
            let msg = format!("Updated category \"{}\"", input.name);
            flash_redirect(&session, FlashLevel::Success, msg, CATEGORIES).await
        }
        Err(e) => write_failed(&session, e, CATEGORIES).await,
    }
}

/// Delete a category.
#[instrument(skip(state, session, admin), fields(admin = %admin.username, category_id = %id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
    Path(id): Path<CategoryId>,
) -> Result<Redirect> {
    match CategoryRepository::new(state.pool()).delete(id).await {
        Ok(name) => {
            info!("Category deleted");
            let msg = format!("Deleted category \"{name}\"");
            flash_redirect(&session, FlashLevel::Success, msg, CATEGORIES).await
        }
        Err(e) => write_failed(&session, e, CATEGORIES).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(name: &str, parent: &str) -> CategoryForm {
        CategoryForm {
            name: name.to_string(),
            parent: Some(parent.to_string()),
            slug: Some("  ".to_string()),
            ..CategoryForm::default()
        }
    }

    #[test]
    fn test_category_cannot_be_its_own_parent() {
        let id = CategoryId::new(3);
        assert_eq!(
            edit_input(id, form("Skincare", "3")),
            Err("A category cannot be its own parent".to_string())
        );
        let input = edit_input(id, form("Skincare", "1"));
        assert_eq!(input.map(|i| i.parent_id), Ok(Some(CategoryId::new(1))));
    }

    #[test]
    fn test_blank_fields() {
        assert!(CategoryInput::try_from(form("", "")).is_err());
        let input = CategoryInput::try_from(form("Makeup", ""));
        assert!(input.is_ok_and(|i| i.slug.is_none() && i.parent_id.is_none()));
    }
}
