//! HTTP route handlers for the dashboard.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                        - Overview (counts, recent posts)
//!
//! # Auth
//! GET  /auth/signup             - Signup page
//! POST /auth/signup             - Create account + session
//! GET  /auth/login              - Login page
//! POST /auth/login              - Login action
//! POST /auth/logout             - Logout action
//!
//! # Pages
//! GET  /pages                   - Page list
//! GET  /pages/new               - New page form
//! POST /pages                   - Create page
//! GET  /pages/{id}/edit         - Edit page + content blocks
//! POST /pages/{id}              - Update page
//! POST /pages/{id}/delete       - Delete page
//! POST /pages/{id}/home         - Make page the home page
//! POST /pages/{id}/blocks       - Append content block
//! POST /blocks/{id}             - Update content block
//! POST /blocks/{id}/delete      - Delete content block
//! POST /blocks/{id}/move-up     - Swap block with its predecessor
//! POST /blocks/{id}/move-down   - Swap block with its successor
//!
//! # Posts
//! GET  /posts                   - Post list
//! GET  /posts/new               - New post form
//! POST /posts                   - Create post
//! GET  /posts/{id}/edit         - Edit post
//! POST /posts/{id}              - Update post
//! POST /posts/{id}/delete       - Delete post
//! POST /posts/{id}/publish      - Publish post
//! POST /posts/{id}/unpublish    - Unpublish post
//!
//! # Settings
//! GET  /settings                - Appearance + blog settings page
//! POST /settings/appearance     - Save appearance settings
//! POST /settings/blog           - Save blog settings
//!
//! # Preview
//! GET  /api/preview             - Layout preview document (text/html)
//! ```

pub mod auth;
pub mod dashboard;
pub mod pages;
pub mod posts;
pub mod preview;
pub mod settings;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create all routes for the dashboard.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::overview))
        // Auth
        .route("/auth/signup", get(auth::signup_page).post(auth::signup))
        .route("/auth/login", get(auth::login_page).post(auth::login))
        .route("/auth/logout", post(auth::logout))
        // Pages
        .route("/pages", get(pages::list).post(pages::create))
        .route("/pages/new", get(pages::new_page))
        .route("/pages/{id}/edit", get(pages::edit))
        .route("/pages/{id}", post(pages::update))
        .route("/pages/{id}/delete", post(pages::delete))
        .route("/pages/{id}/home", post(pages::set_home))
        .route("/pages/{id}/blocks", post(pages::add_block))
        // Content blocks
        .route("/blocks/{id}", post(pages::update_block))
        .route("/blocks/{id}/delete", post(pages::delete_block))
        .route("/blocks/{id}/move-up", post(pages::move_block_up))
        .route("/blocks/{id}/move-down", post(pages::move_block_down))
        // Posts
        .route("/posts", get(posts::list).post(posts::create))
        .route("/posts/new", get(posts::new_post))
        .route("/posts/{id}/edit", get(posts::edit))
        .route("/posts/{id}", post(posts::update))
        .route("/posts/{id}/delete", post(posts::delete))
        .route("/posts/{id}/publish", post(posts::publish))
        .route("/posts/{id}/unpublish", post(posts::unpublish))
        // Settings
        .route("/settings", get(settings::settings_page))
        .route("/settings/appearance", post(settings::update_appearance))
        .route("/settings/blog", post(settings::update_blog))
        // Preview
        .route("/api/preview", get(preview::preview))
}
