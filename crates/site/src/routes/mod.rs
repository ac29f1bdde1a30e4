//! HTTP route handlers for the public site.
//!
//! # Route Structure
//!
//! ```text
//! # Tenant hosts ({username}.{base_domain} or a custom domain)
//! GET  /                     - Home page (or generated profile page)
//! GET  /{slug}               - Page by slug (aliases redirect)
//! GET  /blog                 - Blog index (cursor pagination via ?after=)
//! GET  /blog/search?q=       - Blog search (when enabled in settings)
//! GET  /blog/{slug}          - Single post
//!
//! # Apex host ({base_domain})
//! GET  /                     - Platform landing page
//! GET  /discover             - Feed of discoverable posts across tenants
//!
//! # Path-based fallback (no wildcard DNS needed; used in development)
//! GET  /u/{username}[...]    - Same handlers, links prefixed with /u/{username}
//! ```

pub mod blog;
pub mod discover;
pub mod home;

use axum::{Router, routing::get};

use minispace_core::layout::SiteChrome;

use crate::db::tenants::TenantSite;
use crate::state::AppState;

/// Create all routes for the site.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::root))
        .route("/discover", get(discover::discover))
        .route("/blog", get(blog::index))
        .route("/blog/search", get(blog::search))
        .route("/blog/{slug}", get(blog::show))
        // Path-based fallback
        .route("/u/{username}", get(home::home_by_path))
        .route("/u/{username}/blog", get(blog::index_by_path))
        .route("/u/{username}/blog/search", get(blog::search_by_path))
        .route("/u/{username}/blog/{slug}", get(blog::show_by_path))
        .route("/u/{username}/{slug}", get(home::page_by_path))
        .route("/{slug}", get(home::page))
}

/// The tenant's chrome with links rewritten for the `/u/{username}` prefix.
pub(crate) fn path_chrome(site: &TenantSite) -> SiteChrome {
    let mut chrome = site.chrome.clone();
    chrome.base_path = format!("/u/{}", site.username);
    chrome
}
