//! Integration tests for Glowmart.
//!
//! Every test here talks to running servers and is `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! glowmart-cli migrate
//! cargo run -p glowmart-storefront &
//! cargo run -p glowmart-admin &
//! cargo test -p glowmart-integration-tests -- --ignored
//! ```
//!
//! Login tests need an account created with `glowmart-cli admin create`
//! and its credentials in `GLOWMART_TEST_USERNAME` / `GLOWMART_TEST_PASSWORD`.

use reqwest::{Client, redirect};

/// Base URL of the running storefront.
#[must_use]
pub fn storefront_base_url() -> String {
    std::env::var("STOREFRONT_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Base URL of the running back-office.
#[must_use]
pub fn admin_base_url() -> String {
    std::env::var("ADMIN_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Staff credentials for login tests, if configured.
#[must_use]
pub fn test_credentials() -> Option<(String, String)> {
    let username = std::env::var("GLOWMART_TEST_USERNAME").ok()?;
    let password = std::env::var("GLOWMART_TEST_PASSWORD").ok()?;
    Some((username, password))
}

/// A client that keeps cookies and does not follow redirects, so tests can
/// assert on `303 See Other` targets.
///
/// # Panics
///
/// Panics if the HTTP client cannot be built.
#[must_use]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// `Location` header of a redirect response.
#[must_use]
pub fn location(response: &reqwest::Response) -> Option<&str> {
    response
        .headers()
        .get(reqwest::header::LOCATION)
        .and_then(|v| v.to_str().ok())
}
