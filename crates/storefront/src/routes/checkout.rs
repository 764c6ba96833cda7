//! Checkout route handlers.

use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use serde::Serialize;
use tower_sessions::Session;
use tracing::{info, instrument, warn};

use glowmart_core::format_vnd;

use super::cart::CartView;
use super::{flash_redirect, page};
use crate::cart::Cart;
use crate::db::{AddressRepository, OrderRepository, ProductRepository};
use crate::error::{AppError, Result};
use crate::flash::FlashLevel;
use crate::middleware::RequireAuth;
use crate::models::Address;
use crate::services::checkout::{CheckoutError, CheckoutForm, CheckoutRequest, place_order};
use crate::state::AppState;

const EMPTY_CART_MESSAGE: &str = "Your cart is empty";

/// Checkout page body.
#[derive(Debug, Serialize)]
pub struct CheckoutView {
    pub cart: CartView,
    pub addresses: Vec<Address>,
}

/// Show the checkout page.
///
/// An empty cart sends the shopper back to the shop.
#[instrument(skip(state, session, user), fields(user_id = %user.id))]
pub async fn show(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
) -> Result<Response> {
    let cart = Cart::attach(&session).await?;
    if cart.is_empty() {
        let redirect =
            flash_redirect(&session, FlashLevel::Warning, EMPTY_CART_MESSAGE, "/shop").await?;
        return Ok(redirect.into_response());
    }

    let enriched = cart.enrich(&ProductRepository::new(state.pool())).await?;
    let addresses = AddressRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    let view = CheckoutView {
        cart: CartView::new(&cart, &enriched),
        addresses,
    };

    Ok(page(&session, view).await.into_response())
}

/// Place an order from the session cart.
#[instrument(skip(state, session, user, form), fields(user_id = %user.id))]
pub async fn place(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(user): RequireAuth,
    Form(form): Form<CheckoutForm>,
) -> Result<Redirect> {
    let mut cart = Cart::attach(&session).await?;
    if cart.is_empty() {
        return flash_redirect(&session, FlashLevel::Warning, EMPTY_CART_MESSAGE, "/shop").await;
    }

    let request = match CheckoutRequest::try_from(form) {
        Ok(request) => request,
        Err(e) => return checkout_failed(&session, &e).await,
    };

    let catalog = ProductRepository::new(state.pool());
    let addresses = AddressRepository::new(state.pool());
    let orders = OrderRepository::new(state.pool());

    match place_order(&mut cart, &user, &request, &catalog, &addresses, &orders).await {
        Ok(placed) => {
            cart.commit(&session).await?;
            info!(order_id = %placed.id, order_code = %placed.code, "Order placed");
            flash_redirect(
                &session,
                FlashLevel::Success,
                format!(
                    "Order {} placed. Total {}",
                    placed.code,
                    format_vnd(placed.final_money)
                ),
                "/",
            )
            .await
        }
        Err(CheckoutError::EmptyCart) => {
            flash_redirect(&session, FlashLevel::Warning, EMPTY_CART_MESSAGE, "/shop").await
        }
        Err(CheckoutError::Repository(e)) => Err(AppError::Database(e)),
        Err(e) => checkout_failed(&session, &e).await,
    }
}

async fn checkout_failed(session: &Session, err: &CheckoutError) -> Result<Redirect> {
    warn!(error = %err, "Checkout rejected");
    flash_redirect(session, FlashLevel::Error, failure_message(err), "/checkout").await
}

/// Message shown to the shopper for a rejected checkout.
fn failure_message(err: &CheckoutError) -> String {
    match err {
        CheckoutError::InvalidAddress(_) => {
            "Please choose a valid delivery address".to_string()
        }
        CheckoutError::InvalidPaymentMethod(method) => {
            format!("Unsupported payment method: {method}")
        }
        CheckoutError::QuantityOutOfRange(_) => "A cart quantity is too large".to_string(),
        CheckoutError::EmptyCart => EMPTY_CART_MESSAGE.to_string(),
        CheckoutError::Repository(_) => "Could not place your order".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_messages_hide_internals() {
        let msg = failure_message(&CheckoutError::InvalidAddress("address 42".to_string()));
        assert!(!msg.contains("42"));

        let msg = failure_message(&CheckoutError::InvalidPaymentMethod("BITCOIN".to_string()));
        assert!(msg.contains("BITCOIN"));
    }
}
