//! Order types handed to the order writer.

use rust_decimal::Decimal;
use serde::Serialize;

use glowmart_core::{OrderCode, PaymentMethod, ProductId, UserId};

/// Recipient and delivery address, copied onto the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShippingAddress {
    pub fullname: String,
    pub phone: String,
    /// Single-line delivery address.
    pub address: String,
}

/// Order header to persist.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewOrder {
    pub code: OrderCode,
    pub user_id: UserId,
    pub shipping: ShippingAddress,
    /// Sum of all line totals.
    pub total_money: Decimal,
    pub shipping_fee: Decimal,
    /// Amount the customer pays: `total_money + shipping_fee`.
    pub final_money: Decimal,
    pub payment_method: PaymentMethod,
    pub note: String,
}

/// Order line to persist. Name and price are snapshots taken at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderLine {
    /// `None` when the product no longer exists in the catalog.
    pub product_id: Option<ProductId>,
    pub product_name: String,
    pub price: Decimal,
    pub quantity: i32,
}
