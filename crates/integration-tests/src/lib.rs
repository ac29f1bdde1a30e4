//! Shared helpers for Minispace integration tests.
//!
//! These tests require both binaries running against a migrated database:
//!
//! ```bash
//! cargo run -p minispace-cli -- migrate
//! cargo run -p minispace-dashboard &
//! cargo run -p minispace-site &
//! cargo test -p minispace-integration-tests -- --ignored
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use reqwest::Client;
use uuid::Uuid;

/// Base URL for the dashboard (configurable via environment).
#[must_use]
pub fn dashboard_base_url() -> String {
    std::env::var("DASHBOARD_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".to_string())
}

/// Base URL for the public site (configurable via environment).
#[must_use]
pub fn site_base_url() -> String {
    std::env::var("SITE_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Create an HTTP client with a cookie store, so a signup or login carries
/// its session into subsequent requests.
///
/// # Panics
///
/// Panics if the client cannot be constructed.
#[must_use]
pub fn client() -> Client {
    Client::builder()
        .cookie_store(true)
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .expect("Failed to create HTTP client")
}

/// A unique lowercase suffix for test usernames and slugs.
#[must_use]
pub fn unique_suffix() -> String {
    Uuid::new_v4().simple().to_string()[..10].to_string()
}

/// Sign up a fresh test account and return its username. The client's
/// cookie store holds the session afterwards.
///
/// # Panics
///
/// Panics if the signup request fails.
pub async fn signup(client: &Client) -> String {
    let username = format!("it-{}", unique_suffix());
    let base_url = dashboard_base_url();
    let resp = client
        .post(format!("{base_url}/auth/signup"))
        .form(&[
            ("username", username.as_str()),
            ("email", &format!("{username}@example.com")),
            ("password", "integration-test-pw"),
            ("password_confirm", "integration-test-pw"),
        ])
        .send()
        .await
        .expect("Failed to sign up test user");

    assert!(
        resp.status().is_redirection(),
        "signup should redirect, got {}",
        resp.status()
    );
    username
}
