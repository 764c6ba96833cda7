//! Checkout: turn a session cart into a persisted order.
//!
//! The flow is:
//!
//! 1. refuse an empty cart without touching anything,
//! 2. resolve the shipping address (typed in or saved by the actor),
//! 3. snapshot every cart line into an order line,
//! 4. hand header and lines to an [`OrderWriter`] in one call,
//! 5. clear the cart.
//!
//! Persistence sits behind [`OrderWriter`] and [`AddressBook`] so the flow can
//! run against in-memory fakes.

use std::future::Future;

use rust_decimal::Decimal;
use serde::Deserialize;
use thiserror::Error;
use tracing::instrument;

use glowmart_core::{AddressId, OrderCode, OrderId, PaymentMethod, UserId};

use crate::cart::{Cart, CatalogLookup};
use crate::db::{AddressRepository, RepositoryError};
use crate::models::{Address, CurrentUser, NewOrder, NewOrderLine, ShippingAddress};

/// Persists a finalized order.
pub trait OrderWriter {
    /// Write the header and every line atomically, returning the new order's ID.
    fn write_order(
        &self,
        order: &NewOrder,
        lines: &[NewOrderLine],
    ) -> impl Future<Output = Result<OrderId, RepositoryError>> + Send;
}

/// Looks up an actor's saved addresses.
pub trait AddressBook {
    /// Get the address only if it exists and belongs to `user_id`.
    fn owned_address(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Address>, RepositoryError>> + Send;
}

impl AddressBook for AddressRepository<'_> {
    async fn owned_address(
        &self,
        id: AddressId,
        user_id: UserId,
    ) -> Result<Option<Address>, RepositoryError> {
        self.get_owned(id, user_id).await
    }
}

/// Errors that can occur while placing an order.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The cart has no lines.
    #[error("cart is empty")]
    EmptyCart,

    /// The chosen address is missing, incomplete or owned by someone else.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// The payment method is not one we accept.
    #[error("invalid payment method: {0}")]
    InvalidPaymentMethod(String),

    /// A line quantity does not fit an order line.
    #[error("quantity out of range for product {0}")]
    QuantityOutOfRange(String),

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

impl CheckoutError {
    /// Whether the shopper can fix this by editing the form.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::InvalidAddress(_) | Self::InvalidPaymentMethod(_) | Self::QuantityOutOfRange(_)
        )
    }
}

/// Checkout form as posted by the browser.
///
/// `selected_address` is either `"new"` (use the free-form fields) or the ID
/// of one of the actor's saved addresses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckoutForm {
    #[serde(default)]
    pub selected_address: String,
    #[serde(default)]
    pub fullname: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub city: String,
    pub payment_method: Option<String>,
    #[serde(default)]
    pub note: String,
}

/// Where the order ships to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddressChoice {
    /// Typed into the checkout form.
    New {
        fullname: String,
        phone: String,
        address: String,
        city: String,
    },
    /// One of the actor's saved addresses.
    Saved(AddressId),
}

/// A validated checkout request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckoutRequest {
    pub address: AddressChoice,
    pub payment_method: PaymentMethod,
    pub note: String,
}

impl TryFrom<CheckoutForm> for CheckoutRequest {
    type Error = CheckoutError;

    fn try_from(form: CheckoutForm) -> Result<Self, Self::Error> {
        let address = if form.selected_address.trim() == "new" {
            AddressChoice::New {
                fullname: form.fullname.trim().to_owned(),
                phone: form.phone.trim().to_owned(),
                address: form.address.trim().to_owned(),
                city: form.city.trim().to_owned(),
            }
        } else {
            let id = form
                .selected_address
                .parse::<AddressId>()
                .map_err(|_| CheckoutError::InvalidAddress("no address selected".to_owned()))?;
            AddressChoice::Saved(id)
        };

        let payment_method = match form.payment_method.as_deref().map(str::trim) {
            None | Some("") => PaymentMethod::default(),
            Some(raw) => raw
                .parse()
                .map_err(|_| CheckoutError::InvalidPaymentMethod(raw.to_owned()))?,
        };

        Ok(Self {
            address,
            payment_method,
            note: form.note.trim().to_owned(),
        })
    }
}

/// Result of a successful checkout.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacedOrder {
    pub id: OrderId,
    pub code: OrderCode,
    pub final_money: Decimal,
}

/// Resolve the shipping address for `actor`.
///
/// # Errors
///
/// Returns `CheckoutError::InvalidAddress` if required fields are empty or the
/// saved address does not belong to the actor.
pub async fn resolve_address<A: AddressBook>(
    choice: &AddressChoice,
    actor: UserId,
    addresses: &A,
) -> Result<ShippingAddress, CheckoutError> {
    match choice {
        AddressChoice::New {
            fullname,
            phone,
            address,
            city,
        } => {
            if fullname.is_empty() || phone.is_empty() || address.is_empty() {
                return Err(CheckoutError::InvalidAddress(
                    "name, phone and address are required".to_owned(),
                ));
            }
            let address = if city.is_empty() {
                address.clone()
            } else {
                format!("{address}, {city}")
            };
            Ok(ShippingAddress {
                fullname: fullname.clone(),
                phone: phone.clone(),
                address,
            })
        }
        AddressChoice::Saved(id) => {
            let saved = addresses
                .owned_address(*id, actor)
                .await?
                .ok_or_else(|| CheckoutError::InvalidAddress(format!("address {id}")))?;
            Ok(ShippingAddress {
                address: saved.one_line(),
                fullname: saved.receiver_name,
                phone: saved.phone,
            })
        }
    }
}

/// Place an order for everything in `cart` and clear it.
///
/// The cart is only cleared in memory; the caller commits it to the session
/// once this returns `Ok`. On any error the cart is left untouched.
///
/// # Errors
///
/// Returns `CheckoutError::EmptyCart` before any I/O if the cart has no lines,
/// a validation variant if the address or a line is unusable, and
/// `CheckoutError::Repository` if the catalog or order write fails.
#[instrument(skip_all, fields(user_id = %actor.id, lines = cart.lines().len()))]
pub async fn place_order<C, A, W>(
    cart: &mut Cart,
    actor: &CurrentUser,
    request: &CheckoutRequest,
    catalog: &C,
    addresses: &A,
    writer: &W,
) -> Result<PlacedOrder, CheckoutError>
where
    C: CatalogLookup + Sync,
    A: AddressBook + Sync,
    W: OrderWriter + Sync,
{
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let shipping = resolve_address(&request.address, actor.id, addresses).await?;

    let enriched = cart.enrich(catalog).await?;
    let lines = enriched
        .iter()
        .map(|item| {
            let quantity = i32::try_from(item.quantity)
                .map_err(|_| CheckoutError::QuantityOutOfRange(item.product_id.to_owned()))?;
            Ok(NewOrderLine {
                product_id: item.product.map(|p| p.id),
                product_name: item.product.map_or_else(
                    || format!("Product #{}", item.product_id),
                    |p| p.name.clone(),
                ),
                price: item.unit_price,
                quantity,
            })
        })
        .collect::<Result<Vec<_>, CheckoutError>>()?;

    let total = cart.total_price();
    let shipping_fee = Decimal::ZERO;
    let order = NewOrder {
        code: OrderCode::generate(),
        user_id: actor.id,
        shipping,
        total_money: total,
        shipping_fee,
        final_money: total + shipping_fee,
        payment_method: request.payment_method,
        note: request.note.clone(),
    };

    let id = writer.write_order(&order, &lines).await?;
    cart.clear();

    Ok(PlacedOrder {
        id,
        code: order.code,
        final_money: order.final_money,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::str::FromStr;
    use std::sync::Mutex;

    use glowmart_core::UserRole;

    use super::*;
    use crate::cart::CartLines;
    use crate::cart::tests::{FixedCatalog, memory_session, product};
    use crate::models::session_keys;

    #[derive(Default)]
    struct RecordingWriter {
        written: Mutex<Vec<(NewOrder, Vec<NewOrderLine>)>>,
    }

    impl OrderWriter for RecordingWriter {
        async fn write_order(
            &self,
            order: &NewOrder,
            lines: &[NewOrderLine],
        ) -> Result<OrderId, RepositoryError> {
            let mut written = self.written.lock().unwrap();
            written.push((order.clone(), lines.to_vec()));
            Ok(OrderId::new(i32::try_from(written.len()).unwrap()))
        }
    }

    struct FailingWriter;

    impl OrderWriter for FailingWriter {
        async fn write_order(
            &self,
            _order: &NewOrder,
            _lines: &[NewOrderLine],
        ) -> Result<OrderId, RepositoryError> {
            Err(RepositoryError::NotFound)
        }
    }

    struct SavedAddresses(Vec<Address>);

    impl AddressBook for SavedAddresses {
        async fn owned_address(
            &self,
            id: AddressId,
            user_id: UserId,
        ) -> Result<Option<Address>, RepositoryError> {
            Ok(self
                .0
                .iter()
                .find(|a| a.id == id && a.user_id == user_id)
                .cloned())
        }
    }

    fn actor() -> CurrentUser {
        CurrentUser {
            id: UserId::new(1),
            username: "lan".to_string(),
            role: UserRole::Customer,
            is_superuser: false,
        }
    }

    fn saved_address(id: i32, owner: i32) -> Address {
        Address {
            id: AddressId::new(id),
            user_id: UserId::new(owner),
            receiver_name: "Nguyễn Lan".to_string(),
            phone: "0901000000".to_string(),
            detail_address: "12 Lý Thường Kiệt".to_string(),
            district: "Hoàn Kiếm".to_string(),
            city: "Hà Nội".to_string(),
            is_default: true,
        }
    }

    fn new_address_request() -> CheckoutRequest {
        CheckoutRequest {
            address: AddressChoice::New {
                fullname: "Trần Mai".to_string(),
                phone: "0912000000".to_string(),
                address: "5 Nguyễn Huệ".to_string(),
                city: "TP HCM".to_string(),
            },
            payment_method: PaymentMethod::Cod,
            note: String::new(),
        }
    }

    #[tokio::test]
    async fn test_empty_cart_short_circuits() {
        let session = memory_session();
        let mut cart = Cart::attach(&session).await.unwrap();
        let writer = RecordingWriter::default();

        let err = place_order(
            &mut cart,
            &actor(),
            &new_address_request(),
            &FixedCatalog(Vec::new()),
            &SavedAddresses(Vec::new()),
            &writer,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::EmptyCart));
        assert!(writer.written.lock().unwrap().is_empty());
        assert!(!cart.is_modified());
    }

    #[tokio::test]
    async fn test_successful_checkout_snapshots_lines_and_clears_cart() {
        let session = memory_session();
        let a = product(1, 100_000, 0);
        let b = product(2, 250_000, 199_000);

        let mut cart = Cart::attach(&session).await.unwrap();
        cart.add(&a, 2, false);
        cart.add(&b, 1, false);
        cart.commit(&session).await.unwrap();
        let prior_total = cart.total_price();

        let writer = RecordingWriter::default();
        let placed = place_order(
            &mut cart,
            &actor(),
            &new_address_request(),
            &FixedCatalog(vec![a.clone(), b.clone()]),
            &SavedAddresses(Vec::new()),
            &writer,
        )
        .await
        .unwrap();
        cart.commit(&session).await.unwrap();

        let written = writer.written.lock().unwrap();
        let (order, lines) = &written[0];
        assert_eq!(order.total_money, prior_total);
        assert_eq!(order.final_money, prior_total);
        assert_eq!(order.shipping_fee, Decimal::ZERO);
        assert_eq!(order.shipping.address, "5 Nguyễn Huệ, TP HCM");
        assert_eq!(placed.code, order.code);
        assert!(placed.code.as_str().starts_with("ORD-"));

        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].product_id, Some(a.id));
        assert_eq!(lines[0].product_name, a.name);
        assert_eq!(lines[0].price, Decimal::from(100_000));
        assert_eq!(lines[0].quantity, 2);
        assert_eq!(lines[1].price, Decimal::from(199_000));
        assert_eq!(lines[1].quantity, 1);

        let stored: Option<CartLines> = session.get(session_keys::CART).await.unwrap();
        assert!(stored.is_none());
    }

    #[tokio::test]
    async fn test_saved_address_must_belong_to_actor() {
        let mut cart = Cart::default();
        cart.add(&product(1, 10, 0), 1, false);
        let writer = RecordingWriter::default();
        let request = CheckoutRequest {
            address: AddressChoice::Saved(AddressId::new(7)),
            payment_method: PaymentMethod::Momo,
            note: String::new(),
        };

        let err = place_order(
            &mut cart,
            &actor(),
            &request,
            &FixedCatalog(Vec::new()),
            &SavedAddresses(vec![saved_address(7, 99)]),
            &writer,
        )
        .await
        .unwrap_err();

        assert!(err.is_validation());
        assert!(writer.written.lock().unwrap().is_empty());
        assert_eq!(cart.count(), 1);
    }

    #[tokio::test]
    async fn test_saved_address_formats_as_one_line() {
        let shipping = resolve_address(
            &AddressChoice::Saved(AddressId::new(3)),
            UserId::new(1),
            &SavedAddresses(vec![saved_address(3, 1)]),
        )
        .await
        .unwrap();

        assert_eq!(shipping.fullname, "Nguyễn Lan");
        assert_eq!(shipping.address, "12 Lý Thường Kiệt, Hoàn Kiếm, Hà Nội");
    }

    #[tokio::test]
    async fn test_failed_write_leaves_cart_intact() {
        let mut cart = Cart::default();
        cart.add(&product(1, 10, 0), 3, false);

        let err = place_order(
            &mut cart,
            &actor(),
            &new_address_request(),
            &FixedCatalog(vec![product(1, 10, 0)]),
            &SavedAddresses(Vec::new()),
            &FailingWriter,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, CheckoutError::Repository(_)));
        assert_eq!(cart.count(), 3);
    }

    #[tokio::test]
    async fn test_orphaned_line_is_still_ordered() {
        let mut cart = Cart::from_lines(CartLines::from([(
            "42".to_string(),
            crate::cart::CartLine {
                quantity: 2,
                price: Some("19999.99".to_string()),
            },
        )]));
        let writer = RecordingWriter::default();

        place_order(
            &mut cart,
            &actor(),
            &new_address_request(),
            &FixedCatalog(Vec::new()),
            &SavedAddresses(Vec::new()),
            &writer,
        )
        .await
        .unwrap();

        let written = writer.written.lock().unwrap();
        let line = &written[0].1[0];
        assert_eq!(line.product_id, None);
        assert_eq!(line.product_name, "Product #42");
        assert_eq!(line.price, Decimal::from_str("19999.99").unwrap());
    }

    #[test]
    fn test_form_parsing() {
        let form = CheckoutForm {
            selected_address: "new".to_string(),
            fullname: " Mai ".to_string(),
            phone: "0912".to_string(),
            address: "5 Nguyễn Huệ".to_string(),
            city: "Huế".to_string(),
            payment_method: Some("BANK_TRANSFER".to_string()),
            note: "giao giờ hành chính".to_string(),
        };
        let request = CheckoutRequest::try_from(form).unwrap();
        assert_eq!(request.payment_method, PaymentMethod::BankTransfer);
        assert!(matches!(request.address, AddressChoice::New { ref fullname, .. } if fullname == "Mai"));

        let saved = CheckoutRequest::try_from(CheckoutForm {
            selected_address: "12".to_string(),
            ..CheckoutForm::default()
        })
        .unwrap();
        assert_eq!(saved.address, AddressChoice::Saved(AddressId::new(12)));
        assert_eq!(saved.payment_method, PaymentMethod::Cod);

        let bad = CheckoutRequest::try_from(CheckoutForm {
            selected_address: "12".to_string(),
            payment_method: Some("BITCOIN".to_string()),
            ..CheckoutForm::default()
        });
        assert!(matches!(bad, Err(CheckoutError::InvalidPaymentMethod(_))));
    }

    #[tokio::test]
    async fn test_new_address_requires_fields() {
        let err = resolve_address(
            &AddressChoice::New {
                fullname: String::new(),
                phone: "1".to_string(),
                address: "x".to_string(),
                city: String::new(),
            },
            UserId::new(1),
            &SavedAddresses(Vec::new()),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, CheckoutError::InvalidAddress(_)));
    }
}
