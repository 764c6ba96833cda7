//! Integration tests for the session cart.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database with at least one product
//! - The storefront running (cargo run -p glowmart-storefront)

use glowmart_integration_tests::{location, session_client, storefront_base_url};
use reqwest::StatusCode;
use serde_json::Value;

/// ID of the newest product on the home page.
async fn any_product_id(client: &reqwest::Client) -> String {
    let home: Value = client
        .get(format!("{}/", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load home page")
        .json()
        .await
        .expect("Home page is not JSON");

    home["offer_products"][0]["id"]
        .as_i64()
        .map(|id| id.to_string())
        .expect("Catalog has no products")
}

async fn cart(client: &reqwest::Client) -> Value {
    client
        .get(format!("{}/cart", storefront_base_url()))
        .send()
        .await
        .expect("Failed to load cart")
        .json()
        .await
        .expect("Cart is not JSON")
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_empty_session_has_empty_cart() {
    let body = cart(&session_client()).await;

    assert_eq!(body["count"], 0);
    assert_eq!(body["items"].as_array().map(Vec::len), Some(0));
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_add_decrease_remove() {
    let client = session_client();
    let base_url = storefront_base_url();
    let id = any_product_id(&client).await;

    let resp = client
        .post(format!("{base_url}/cart/add/{id}"))
        .form(&[("quantity", "3")])
        .send()
        .await
        .expect("Failed to add to cart");
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&resp), Some("/cart"));
    assert_eq!(cart(&client).await["count"], 3);

    // override sets instead of adding
    client
        .post(format!("{base_url}/cart/add/{id}"))
        .form(&[("quantity", "2"), ("override", "true")])
        .send()
        .await
        .expect("Failed to set quantity");
    assert_eq!(cart(&client).await["count"], 2);

    client
        .post(format!("{base_url}/cart/update/{id}"))
        .send()
        .await
        .expect("Failed to decrease");
    assert_eq!(cart(&client).await["count"], 1);

    client
        .post(format!("{base_url}/cart/remove/{id}"))
        .send()
        .await
        .expect("Failed to remove");
    assert_eq!(cart(&client).await["count"], 0);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_add_unknown_product_is_not_found() {
    let resp = session_client()
        .post(format!("{}/cart/add/999999999", storefront_base_url()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
