//! Glowmart Core - Shared types library.
//!
//! This crate provides common types used across all Glowmart components:
//! - `storefront` - Public-facing cosmetics shop
//! - `admin` - Internal back-office
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, money, roles and statuses
//! - [`moderation`] - Rule-based spam detection for product reviews

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod moderation;
pub mod types;

pub use types::*;
