//! Customer route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::instrument;

use glowmart_core::CustomerProfileId;

use super::{Page, page};
use crate::db::CustomerRepository;
use crate::db::customers::RECENT_ORDER_LIMIT;
use crate::error::{AppError, Result};
use crate::middleware::RequireAdminAuth;
use crate::models::{Customer, OrderSummary};
use crate::state::AppState;

/// Customer listing body.
#[derive(Debug, Serialize)]
pub struct CustomersView {
    pub customers: Vec<Customer>,
}

/// Customer detail body.
#[derive(Debug, Serialize)]
pub struct CustomerDetailView {
    pub customer: Customer,
    pub recent_orders: Vec<OrderSummary>,
}

/// List all customers.
#[instrument(skip(state, session, _admin))]
pub async fn index(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
) -> Result<Json<Page<CustomersView>>> {
    let customers = CustomerRepository::new(state.pool()).list().await?;

    Ok(page(&session, CustomersView { customers }).await)
}

/// One customer and their latest orders.
#[instrument(skip(state, session, _admin), fields(customer_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAdminAuth(_admin): RequireAdminAuth,
    Path(id): Path<CustomerProfileId>,
) -> Result<Json<Page<CustomerDetailView>>> {
    let repo = CustomerRepository::new(state.pool());
    let customer = repo
        .get(id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("customer {id}")))?;
    let recent_orders = repo.recent_orders(&customer, RECENT_ORDER_LIMIT).await?;

    Ok(page(
        &session,
        CustomerDetailView {
            customer,
            recent_orders,
        },
    )
    .await)
}
