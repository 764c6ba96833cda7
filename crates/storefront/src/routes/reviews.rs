//! Review submission route.

use axum::{
    Form,
    extract::{Path, State},
    response::Redirect,
};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use glowmart_core::ProductId;

use super::flash_redirect;
use crate::db::{ProductRepository, ReviewRepository};
use crate::error::{AppError, Result};
use crate::flash::FlashLevel;
use crate::middleware::RequireAuth;
use crate::services::reviews::{SubmitOutcome, parse_rating, submit_review};
use crate::state::AppState;

/// Review form.
#[derive(Debug, Default, Deserialize)]
pub struct ReviewForm {
    #[serde(default)]
    pub comment: String,
    pub rating: Option<String>,
}

/// Submit a review for a product, then return to the product page.
///
/// Blank comments are dropped without a message.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn submit(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Path(id): Path<ProductId>,
    Form(form): Form<ReviewForm>,
) -> Result<Redirect> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))?;

    let back = format!("/product/{}", product.id);
    let outcome = submit_review(
        user.id,
        product.id,
        &form.comment,
        parse_rating(form.rating.as_deref()),
        state.sentiment(),
        state.spam(),
        &ReviewRepository::new(state.pool()),
    )
    .await?;

    match outcome {
        SubmitOutcome::Skipped => Ok(Redirect::to(&back)),
        SubmitOutcome::Stored { .. } => {
            flash_redirect(&session, FlashLevel::Success, "Thanks for your review", &back).await
        }
    }
}
