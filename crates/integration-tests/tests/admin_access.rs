//! Integration tests for back-office access control.
//!
//! These tests require the admin server running (cargo run -p glowmart-admin).

use glowmart_integration_tests::{admin_base_url, location, session_client, test_credentials};
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_screens_redirect_anonymous_users() {
    let client = session_client();
    let base_url = admin_base_url();

    for path in ["/", "/products", "/reviews", "/inventory", "/spam-keywords"] {
        let resp = client
            .get(format!("{base_url}{path}"))
            .send()
            .await
            .expect("Failed to send request");

        assert_eq!(resp.status(), StatusCode::SEE_OTHER, "{path}");
        assert_eq!(location(&resp), Some("/login"), "{path}");
    }
}

#[tokio::test]
#[ignore = "Requires running admin server"]
async fn test_bad_login_flashes_error() {
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("username", "nobody"), ("password", "wrong-password")])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(location(&resp), Some("/login"));

    let page: Value = client
        .get(format!("{base_url}/login"))
        .send()
        .await
        .expect("Failed to load login page")
        .json()
        .await
        .expect("Login page is not JSON");
    assert_eq!(page["messages"][0]["level"], "error");
}

#[tokio::test]
#[ignore = "Requires running admin server and GLOWMART_TEST_USERNAME/PASSWORD"]
async fn test_staff_dashboard() {
    let Some((username, password)) = test_credentials() else {
        return;
    };
    let client = session_client();
    let base_url = admin_base_url();

    let resp = client
        .post(format!("{base_url}/login"))
        .form(&[("username", username.as_str()), ("password", password.as_str())])
        .send()
        .await
        .expect("Failed to post login");
    assert_eq!(location(&resp), Some("/"));

    let dashboard: Value = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to load dashboard")
        .json()
        .await
        .expect("Dashboard is not JSON");
    assert!(dashboard["products"].is_i64());
    assert!(dashboard["low_stock"].is_i64());
}
