//! Integration tests for page management.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (ms-cli migrate)
//! - The dashboard server running (cargo run -p minispace-dashboard)
//!
//! Run with: cargo test -p minispace-integration-tests -- --ignored

use minispace_integration_tests::{client, dashboard_base_url, signup};
use reqwest::Client;

/// Create a page and return the redirect location (its edit path).
async fn create_page(client: &Client, title: &str, slug: &str, is_home: bool) -> String {
    let base_url = dashboard_base_url();
    let mut form = vec![("title", title.to_string()), ("slug", slug.to_string())];
    if is_home {
        form.push(("is_home", "on".to_string()));
    }
    let resp = client
        .post(format!("{base_url}/pages"))
        .form(&form)
        .send()
        .await
        .expect("Failed to create page");
    assert!(resp.status().is_redirection(), "got {}", resp.status());
    resp.headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_create_page_redirects_to_editor() {
    let client = client();
    signup(&client).await;

    let location = create_page(&client, "About", "about", false).await;
    assert!(location.contains("/edit"));
    assert!(location.contains("success=created"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_duplicate_slug_rejected() {
    let client = client();
    signup(&client).await;

    create_page(&client, "About", "about", false).await;
    let location = create_page(&client, "Also About", "about", false).await;
    assert!(location.contains("error="));
    assert!(location.contains("slug"));
}

#[tokio::test]
#[ignore = "Requires running dashboard server and database"]
async fn test_home_toggle_moves_flag() {
    let client = client();
    signup(&client).await;
    let base_url = dashboard_base_url();

    create_page(&client, "First", "first", true).await;
    let second_edit = create_page(&client, "Second", "second", false).await;

    // Pull the page id out of "/pages/{id}/edit?..."
    let id: i32 = second_edit
        .trim_start_matches("/pages/")
        .split('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("edit path should contain a page id");

    let resp = client
        .post(format!("{base_url}/pages/{id}/home"))
        .send()
        .await
        .expect("Failed to toggle home");
    assert!(resp.status().is_redirection());

    // Final state: exactly one home page, and it's the second one
    let list = client
        .get(format!("{base_url}/pages"))
        .send()
        .await
        .expect("Failed to list pages")
        .text()
        .await
        .expect("Failed to read response");
    assert_eq!(list.matches("(home)").count(), 1);
    let second_pos = list.find("Second").expect("Second should be listed");
    let home_pos = list.find("(home)").expect("one page should be home");
    assert!(home_pos > second_pos, "the home marker should follow Second");
}
