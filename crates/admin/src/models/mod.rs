//! Domain models for admin.
//!
//! The back-office reads and writes the same `shop` schema as the storefront
//! but keeps its own record types, shaped for management screens.

pub mod catalog;
pub mod customer;
pub mod review;
pub mod session;
pub mod spam;

pub use catalog::{Brand, BrandInput, Category, CategoryInput, Product, ProductInput};
pub use customer::{Customer, OrderSummary};
pub use review::ReviewRecord;
pub use session::{CurrentAdmin, keys as session_keys};
pub use spam::{SpamKeywordInput, SpamKeywordRecord};
