//! Integration tests for checkout guards.
//!
//! These tests require the storefront running (cargo run -p glowmart-storefront).

use glowmart_integration_tests::{location, session_client, storefront_base_url, test_credentials};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_checkout_requires_login() {
    let resp = session_client()
        .get(format!("{}/checkout", storefront_base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/login?next=%2Fcheckout"));
}

#[tokio::test]
#[ignore = "Requires running storefront server and GLOWMART_TEST_USERNAME/PASSWORD"]
async fn test_empty_cart_checkout_redirects_to_shop() {
    let Some((username, password)) = test_credentials() else {
        return;
    };
    let client = session_client();
    let base_url = storefront_base_url();

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[
            ("username", username.as_str()),
            ("password", password.as_str()),
            ("next", "/checkout"),
        ])
        .send()
        .await
        .expect("Failed to log in");
    assert_eq!(location(&resp), Some("/checkout"));

    let resp = client
        .post(format!("{base_url}/checkout"))
        .form(&[("selected_address", "new"), ("payment_method", "COD")])
        .send()
        .await
        .expect("Failed to post checkout");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/shop"));

    let shop: Value = client
        .get(format!("{base_url}/shop"))
        .send()
        .await
        .expect("Failed to load shop")
        .json()
        .await
        .expect("Shop is not JSON");
    assert_eq!(shop["messages"][0]["level"], "warning");
}
