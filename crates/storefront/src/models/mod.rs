//! Domain models for storefront.
//!
//! Row types derive `sqlx::FromRow` and are used directly as domain values;
//! there is no separate persistence layer model.

pub mod catalog;
pub mod order;
pub mod review;
pub mod session;
pub mod user;

pub use catalog::{Brand, Category, Product};
pub use order::{NewOrder, NewOrderLine, ShippingAddress};
pub use review::{NewReview, Review};
pub use session::{CurrentUser, keys as session_keys};
pub use user::{Address, User};
