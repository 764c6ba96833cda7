//! Glowmart back-office library.
//!
//! Staff-only management of the catalog, customers, review moderation,
//! inventory alerts and the spam keyword list. Shares the `shop` schema with
//! the storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
