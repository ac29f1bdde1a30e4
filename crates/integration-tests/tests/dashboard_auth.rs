//! Integration tests for dashboard authentication.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (ms-cli migrate)
//! - The dashboard server running (cargo run -p minispace-dashboard)
//!
//! Run with: cargo test -p minispace-integration-tests -- --ignored

use minispace_integration_tests::{client, dashboard_base_url, signup, unique_suffix};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_signup_creates_session() {
    let client = client();
    let base_url = dashboard_base_url();

    signup(&client).await;

    // The session cookie from signup should open the overview
    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to get overview");
    assert_eq!(resp.status(), StatusCode::OK);
    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Overview"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_overview_requires_login() {
    let client = client();
    let base_url = dashboard_base_url();

    let resp = client
        .get(format!("{base_url}/"))
        .send()
        .await
        .expect("Failed to get overview");

    // Anonymous HTML requests are redirected to the login page
    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert_eq!(location, "/auth/login");
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_login_with_wrong_password_fails() {
    let signup_client = client();
    let username = signup(&signup_client).await;

    let client = client();
    let base_url = dashboard_base_url();
    let resp = client
        .post(format!("{base_url}/auth/login"))
        .form(&[
            ("email", format!("{username}@example.com")),
            ("password", "not-the-password".to_string()),
        ])
        .send()
        .await
        .expect("Failed to post login");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.contains("error=credentials"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_duplicate_username_rejected() {
    let client_a = client();
    let username = signup(&client_a).await;

    let client_b = client();
    let base_url = dashboard_base_url();
    let resp = client_b
        .post(format!("{base_url}/auth/signup"))
        .form(&[
            ("username", username.as_str()),
            ("email", &format!("other-{}@example.com", unique_suffix())),
            ("password", "integration-test-pw"),
            ("password_confirm", "integration-test-pw"),
        ])
        .send()
        .await
        .expect("Failed to post signup");

    assert!(resp.status().is_redirection());
    let location = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(location.contains("error=taken"));
}
