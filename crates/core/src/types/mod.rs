//! Core types for Glowmart.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod money;
pub mod order_code;
pub mod status;

pub use id::*;
pub use money::{effective_unit_price, format_vnd, parse_money_lenient};
pub use order_code::OrderCode;
pub use status::*;
