//! Inventory alerts route.

use axum::{Json, extract::State};
use chrono::{Duration, Utc};
use tower_sessions::Session;
use tracing::{info, instrument};

use super::{Page, page};
use crate::db::InventoryRepository;
use crate::error::Result;
use crate::middleware::RequireAdminAuth;
use crate::services::inventory::{DEAD_STOCK_DAYS, InventoryReport, build_alerts};
use crate::state::AppState;

/// Stock alerts over active products.
#[instrument(skip(state, session, _admin))]
pub async fn alerts(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Page<InventoryReport>>> {
    let since = Utc::now() - Duration::days(DEAD_STOCK_DAYS);
    let snapshots = InventoryRepository::new(state.pool())
        .active_stock(since)
        .await?;

    let report = build_alerts(&snapshots);
    info!(
        low = report.total_low,
        dead = report.total_dead,
        "Inventory alerts built"
    );

    Ok(page(&session, report).await)
}
