//! Dashboard route handler.

use axum::{Json, extract::State};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use super::{Page, page};
use crate::db::{DashboardCounts, DashboardRepository};
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::models::CurrentAdmin;
use crate::state::AppState;

/// Dashboard body.
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub admin: CurrentAdmin,
    #[serde(flatten)]
    pub counts: DashboardCounts,
}

/// Dashboard overview.
#[instrument(skip(state, session, admin), fields(admin = %admin.username))]
pub async fn dashboard(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(admin): RequireAdminAuth,
) -> Result<Json<Page<DashboardView>>> {
    let counts = DashboardRepository::new(state.pool()).counts().await?;

    Ok(page(&session, DashboardView { admin, counts }).await)
}
