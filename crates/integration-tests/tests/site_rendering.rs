//! Integration tests for the public site renderer.
//!
//! These tests require:
//! - A migrated `PostgreSQL` database (ms-cli migrate)
//! - Both servers running (minispace-dashboard and minispace-site)
//!
//! Run with: cargo test -p minispace-integration-tests -- --ignored

use minispace_integration_tests::{client, dashboard_base_url, signup, site_base_url};
use reqwest::StatusCode;

#[tokio::test]
#[ignore = "Requires running site and dashboard servers"]
async fn test_tenant_home_renders_via_path_fallback() {
    let client = client();
    let username = signup(&client).await;
    let dashboard = dashboard_base_url();
    let site = site_base_url();

    // Create a home page with a content block
    let resp = client
        .post(format!("{dashboard}/pages"))
        .form(&[
            ("title", "Welcome"),
            ("slug", "welcome"),
            ("is_home", "on"),
        ])
        .send()
        .await
        .expect("Failed to create page");
    let edit_path = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let id: i32 = edit_path
        .trim_start_matches("/pages/")
        .split('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("edit path should contain a page id");

    client
        .post(format!("{dashboard}/pages/{id}/blocks"))
        .form(&[("kind", "markdown"), ("body", "Hello from **markdown**.")])
        .send()
        .await
        .expect("Failed to add block");

    // The public site should render the markdown through the layout chrome
    let body = client
        .get(format!("{site}/u/{username}"))
        .send()
        .await
        .expect("Failed to get tenant home")
        .text()
        .await
        .expect("Failed to read response");

    assert!(body.contains("<strong>markdown</strong>"));
    assert!(body.contains(&username));
    assert!(body.contains("layout-personal-blog"));
}

#[tokio::test]
#[ignore = "Requires running site and dashboard servers"]
async fn test_unknown_tenant_404s() {
    let client = client();
    let site = site_base_url();

    let resp = client
        .get(format!("{site}/u/no-such-user-here"))
        .send()
        .await
        .expect("Failed to get unknown tenant");
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
#[ignore = "Requires running site and dashboard servers"]
async fn test_preview_endpoint_returns_html() {
    let client = client();
    signup(&client).await;
    let dashboard = dashboard_base_url();

    let resp = client
        .get(format!(
            "{dashboard}/api/preview?layout=portfolio-grid&theme=midnight&header=Preview+Here&footer=Bye&type=posts"
        ))
        .send()
        .await
        .expect("Failed to get preview");

    assert_eq!(resp.status(), StatusCode::OK);
    let content_type = resp
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    assert!(content_type.starts_with("text/html"));

    let body = resp.text().await.expect("Failed to read response");
    assert!(body.contains("Preview Here"));
    assert!(body.contains("Bye"));
    assert!(body.contains("layout-portfolio-grid"));
}

#[tokio::test]
#[ignore = "Requires running site and dashboard servers"]
async fn test_published_post_appears_on_blog() {
    let client = client();
    let username = signup(&client).await;
    let dashboard = dashboard_base_url();
    let site = site_base_url();

    // Create and publish a post
    let resp = client
        .post(format!("{dashboard}/posts"))
        .form(&[
            ("title", "First Post"),
            ("slug", "first-post"),
            ("excerpt", "A short summary."),
            ("body", "Some *body* text."),
            ("tags", "intro"),
        ])
        .send()
        .await
        .expect("Failed to create post");
    let edit_path = resp
        .headers()
        .get("location")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let id: i32 = edit_path
        .trim_start_matches("/posts/")
        .split('/')
        .next()
        .and_then(|s| s.parse().ok())
        .expect("edit path should contain a post id");

    client
        .post(format!("{dashboard}/posts/{id}/publish"))
        .send()
        .await
        .expect("Failed to publish post");

    // Index lists it, detail renders it
    let index = client
        .get(format!("{site}/u/{username}/blog"))
        .send()
        .await
        .expect("Failed to get blog index")
        .text()
        .await
        .expect("Failed to read response");
    assert!(index.contains("First Post"));
    assert!(index.contains("A short summary."));

    let detail = client
        .get(format!("{site}/u/{username}/blog/first-post"))
        .send()
        .await
        .expect("Failed to get post")
        .text()
        .await
        .expect("Failed to read response");
    assert!(detail.contains("<em>body</em>"));
    assert!(detail.contains("min read"));
}
