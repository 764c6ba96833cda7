//! Business logic services for storefront.
//!
//! # Services
//!
//! - `auth` - Customer registration and password login
//! - `checkout` - Cart to order
//! - `reviews` - Review submission and moderation gate
//! - `sentiment` - Remote sentiment scoring
//! - `spam` - Keyword and heuristic spam checks

pub mod auth;
pub mod checkout;
pub mod reviews;
pub mod sentiment;
pub mod spam;
