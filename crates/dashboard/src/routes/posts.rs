//! Post management routes: CRUD and publishing.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::PostId;

use crate::db::RepositoryError;
use crate::db::posts::PostRepository;
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Post;
use crate::services::posts::{RawPostInput, derive_excerpt, normalize_post_input};
use crate::state::AppState;

use super::dashboard::PostView;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Post form data (shared by create and update).
#[derive(Debug, Deserialize)]
pub struct PostForm {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub excerpt: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: String,
    /// Checkbox; present when checked.
    #[serde(default)]
    pub discoverable: Option<String>,
}

impl PostForm {
    fn into_raw(self) -> RawPostInput {
        RawPostInput {
            title: self.title,
            slug: self.slug,
            excerpt: self.excerpt,
            body: self.body,
            tags: self.tags,
            discoverable: self.discoverable.is_some(),
        }
    }
}

/// Query parameters for error/success/warning display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
    pub warning: Option<String>,
}

// =============================================================================
// Views & Templates
// =============================================================================

/// Editable post fields for the form templates.
#[derive(Debug, Clone, Default)]
pub struct PostFormView {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: String,
    pub discoverable: bool,
}

impl From<&Post> for PostFormView {
    fn from(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            slug: post.slug.clone(),
            excerpt: post.excerpt.clone(),
            body: post.body.clone(),
            tags: post.tags.join(", "),
            discoverable: post.discoverable,
        }
    }
}

/// Post list template.
#[derive(Template, WebTemplate)]
#[template(path = "posts/list.html")]
pub struct PostListTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub posts: Vec<PostView>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// New post template.
#[derive(Template, WebTemplate)]
#[template(path = "posts/new.html")]
pub struct PostNewTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub form: PostFormView,
    pub error_message: Option<String>,
}

/// Edit post template.
#[derive(Template, WebTemplate)]
#[template(path = "posts/edit.html")]
pub struct PostEditTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub post_id: i32,
    pub published: bool,
    pub read_count: i64,
    pub form: PostFormView,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
    pub warning_message: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the post list.
///
/// GET /posts
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn list(
    State(state): State<AppState>,
    user: RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<PostListTemplate> {
    let RequireAuth(user) = user;
    let posts = PostRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(PostListTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/posts".to_owned(),
        posts: posts.iter().map(PostView::from).collect(),
        success_message: query.success.map(|s| match s.as_str() {
            "deleted" => "Post deleted.".to_owned(),
            "published" => "Post published.".to_owned(),
            "unpublished" => "Post unpublished.".to_owned(),
            other => other.to_owned(),
        }),
        error_message: query.error,
    })
}

/// Render the new-post form.
///
/// GET /posts/new
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn new_post(
    State(state): State<AppState>,
    user: RequireAuth,
    Query(query): Query<MessageQuery>,
) -> PostNewTemplate {
    let RequireAuth(user) = user;
    PostNewTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/posts".to_owned(),
        form: PostFormView::default(),
        error_message: query.error,
    }
}

/// Create a post (as a draft).
///
/// POST /posts
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn create(
    State(state): State<AppState>,
    user: RequireAuth,
    Form(form): Form<PostForm>,
) -> Response {
    let RequireAuth(user) = user;

    let normalized = match normalize_post_input(&form.into_raw()) {
        Ok(normalized) => normalized,
        Err(e) => return redirect_with_error("/posts/new", &e.to_string()),
    };
    let mut input = normalized.input;
    if input.excerpt.is_empty() {
        input.excerpt = derive_excerpt(&input.body);
    }

    match PostRepository::new(state.pool()).create(user.id, &input).await {
        Ok(post) => {
            let mut target = format!("/posts/{}/edit?success=created", post.id);
            append_warnings(&mut target, &normalized.warnings);
            Redirect::to(&target).into_response()
        }
        Err(RepositoryError::Conflict(msg)) => redirect_with_error("/posts/new", &msg),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Render the edit form.
///
/// GET /posts/{id}/edit
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn edit(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<PostEditTemplate> {
    let RequireAuth(user) = user;
    let post = PostRepository::new(state.pool())
        .get(user.id, PostId::new(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("post {id}")))?;

    Ok(PostEditTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/posts".to_owned(),
        post_id: id,
        published: post.published,
        read_count: post.read_count,
        form: PostFormView::from(&post),
        success_message: query.success.map(|s| match s.as_str() {
            "created" => "Post created.".to_owned(),
            "saved" => "Post saved.".to_owned(),
            "published" => "Post published.".to_owned(),
            "unpublished" => "Post unpublished.".to_owned(),
            other => other.to_owned(),
        }),
        error_message: query.error,
        warning_message: query.warning,
    })
}

/// Update a post.
///
/// POST /posts/{id}
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn update(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<PostForm>,
) -> Response {
    let RequireAuth(user) = user;
    let edit_path = format!("/posts/{id}/edit");

    let normalized = match normalize_post_input(&form.into_raw()) {
        Ok(normalized) => normalized,
        Err(e) => return redirect_with_error(&edit_path, &e.to_string()),
    };

    match PostRepository::new(state.pool())
        .update(user.id, PostId::new(id), &normalized.input)
        .await
    {
        Ok(_) => {
            let mut target = format!("{edit_path}?success=saved");
            append_warnings(&mut target, &normalized.warnings);
            Redirect::to(&target).into_response()
        }
        Err(RepositoryError::Conflict(msg)) => redirect_with_error(&edit_path, &msg),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete a post.
///
/// POST /posts/{id}/delete
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn delete(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    let deleted = PostRepository::new(state.pool())
        .delete(user.id, PostId::new(id))
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("post {id}")));
    }
    Ok(Redirect::to("/posts?success=deleted"))
}

/// Publish a post.
///
/// POST /posts/{id}/publish
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn publish(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    PostRepository::new(state.pool())
        .set_published(user.id, PostId::new(id), true)
        .await?;
    Ok(Redirect::to(&format!("/posts/{id}/edit?success=published")))
}

/// Unpublish a post.
///
/// POST /posts/{id}/unpublish
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn unpublish(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    PostRepository::new(state.pool())
        .set_published(user.id, PostId::new(id), false)
        .await?;
    Ok(Redirect::to(&format!(
        "/posts/{id}/edit?success=unpublished"
    )))
}

/// Redirect back to a form with a urlencoded error message.
fn redirect_with_error(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message))).into_response()
}

/// Append clamp warnings to a redirect target.
fn append_warnings(target: &mut String, warnings: &[String]) {
    if !warnings.is_empty() {
        target.push_str("&warning=");
        target.push_str(&urlencoding::encode(&warnings.join("; ")));
    }
}
