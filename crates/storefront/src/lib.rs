//! Glowmart storefront library.
//!
//! The public shop: catalog browsing, the session cart, checkout, product
//! reviews and customer accounts. The binary in `main.rs` wires these into
//! an axum server; everything else lives here so it can be tested.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod config;
pub mod db;
pub mod error;
pub mod flash;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;
