//! Review moderation route.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::{info, instrument};

use super::{Page, page};
use crate::db::ReviewRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::ReviewRecord;
use crate::services::{ReviewStats, rescan};
use crate::state::AppState;

/// Review moderation body.
#[derive(Debug, Serialize)]
pub struct ReviewsView {
    pub reviews: Vec<ReviewRecord>,
    pub stats: ReviewStats,
}

/// All reviews, newest first, after re-checking unflagged ones for spam.
#[instrument(skip(state, session, _admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Page<ReviewsView>>> {
    let repo = ReviewRepository::new(state.pool());
    let mut reviews = repo.list_all().await?;
    let keywords = state.keywords().active().await?;

    let flagged = rescan(&mut reviews, &keywords);
    for hit in &flagged {
        repo.mark_spam(hit.id, &hit.reason).await?;
    }
    if !flagged.is_empty() {
        info!(count = flagged.len(), "Rescan flagged reviews as spam");
    }

    let stats = ReviewStats::from_reviews(&reviews);
    Ok(page(&session, ReviewsView { reviews, stats }).await)
}
