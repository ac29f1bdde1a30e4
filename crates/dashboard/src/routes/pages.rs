//! Page management routes: CRUD, home toggle, and content blocks.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::layout::LayoutId;
use minispace_core::{BlockId, PageId};

use crate::db::RepositoryError;
use crate::db::pages::{MoveDirection, PageRepository};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::{ContentBlock, Page};
use crate::services::pages::{RawPageInput, validate_page_input};
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Page form data (shared by create and update).
#[derive(Debug, Deserialize)]
pub struct PageForm {
    pub title: String,
    #[serde(default)]
    pub slug: String,
    /// Checkbox; present when checked.
    #[serde(default)]
    pub is_home: Option<String>,
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub seo_description: String,
    #[serde(default)]
    pub canonical_url: String,
    #[serde(default)]
    pub alias: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub tags: String,
    /// Checkbox; present when checked.
    #[serde(default)]
    pub discoverable: Option<String>,
}

impl PageForm {
    fn into_raw(self) -> RawPageInput {
        RawPageInput {
            title: self.title,
            slug: self.slug,
            is_home: self.is_home.is_some(),
            layout: self.layout,
            seo_description: self.seo_description,
            canonical_url: self.canonical_url,
            alias: self.alias,
            language: self.language,
            tags: self.tags,
            discoverable: self.discoverable.is_some(),
        }
    }
}

/// Content block form data.
#[derive(Debug, Deserialize)]
pub struct BlockForm {
    #[serde(default = "default_block_kind")]
    pub kind: String,
    #[serde(default)]
    pub body: String,
}

fn default_block_kind() -> String {
    "markdown".to_owned()
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Views & Templates
// =============================================================================

/// Page row for list templates.
#[derive(Debug, Clone)]
pub struct PageView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub is_home: bool,
    pub updated_label: String,
}

impl From<&Page> for PageView {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.as_i32(),
            title: page.title.clone(),
            slug: page.slug.clone(),
            is_home: page.is_home,
            updated_label: page.updated_at.format("%b %d, %Y").to_string(),
        }
    }
}

/// Editable page fields for the form templates.
#[derive(Debug, Clone, Default)]
pub struct PageFormView {
    pub title: String,
    pub slug: String,
    pub is_home: bool,
    pub layout: String,
    pub seo_description: String,
    pub canonical_url: String,
    pub alias: String,
    pub language: String,
    pub tags: String,
    pub discoverable: bool,
}

impl From<&Page> for PageFormView {
    fn from(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            slug: page.slug.clone(),
            is_home: page.is_home,
            layout: page.layout.clone().unwrap_or_default(),
            seo_description: page.seo_description.clone().unwrap_or_default(),
            canonical_url: page.canonical_url.clone().unwrap_or_default(),
            alias: page.alias.clone().unwrap_or_default(),
            language: page.language.clone().unwrap_or_default(),
            tags: page.tags.join(", "),
            discoverable: page.discoverable,
        }
    }
}

/// Block row for the edit template.
#[derive(Debug, Clone)]
pub struct BlockView {
    pub id: i32,
    pub position: i32,
    pub kind: String,
    pub body: String,
}

impl From<&ContentBlock> for BlockView {
    fn from(block: &ContentBlock) -> Self {
        Self {
            id: block.id.as_i32(),
            position: block.position,
            kind: block.kind.clone(),
            body: block.body.clone(),
        }
    }
}

/// Page list template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/list.html")]
pub struct PageListTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub pages: Vec<PageView>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// New page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/new.html")]
pub struct PageNewTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub form: PageFormView,
    pub layouts: Vec<LayoutOption>,
    pub error_message: Option<String>,
}

/// Edit page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/edit.html")]
pub struct PageEditTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub page_id: i32,
    pub form: PageFormView,
    pub blocks: Vec<BlockView>,
    pub layouts: Vec<LayoutOption>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

/// A layout choice for the override dropdown.
#[derive(Debug, Clone)]
pub struct LayoutOption {
    pub id: String,
    pub name: String,
}

fn layout_options() -> Vec<LayoutOption> {
    LayoutId::ALL
        .iter()
        .map(|l| LayoutOption {
            id: l.as_str().to_owned(),
            name: l.display_name().to_owned(),
        })
        .collect()
}

// =============================================================================
// Page Handlers
// =============================================================================

/// Render the page list.
///
/// GET /pages
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn list(
    State(state): State<AppState>,
    user: RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<PageListTemplate> {
    let RequireAuth(user) = user;
    let pages = PageRepository::new(state.pool())
        .list_for_user(user.id)
        .await?;

    Ok(PageListTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/pages".to_owned(),
        pages: pages.iter().map(PageView::from).collect(),
        success_message: query.success.map(|s| match s.as_str() {
            "created" => "Page created.".to_owned(),
            "deleted" => "Page deleted.".to_owned(),
            "home" => "Home page updated.".to_owned(),
            other => other.to_owned(),
        }),
        error_message: query.error,
    })
}

/// Render the new-page form.
///
/// GET /pages/new
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn new_page(
    State(state): State<AppState>,
    user: RequireAuth,
    Query(query): Query<MessageQuery>,
) -> PageNewTemplate {
    let RequireAuth(user) = user;
    PageNewTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/pages".to_owned(),
        form: PageFormView::default(),
        layouts: layout_options(),
        error_message: query.error,
    }
}

/// Create a page.
///
/// POST /pages
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn create(
    State(state): State<AppState>,
    user: RequireAuth,
    Form(form): Form<PageForm>,
) -> Response {
    let RequireAuth(user) = user;

    let input = match validate_page_input(&form.into_raw()) {
        Ok(input) => input,
        Err(e) => return redirect_with_error("/pages/new", &e.to_string()),
    };

    match PageRepository::new(state.pool()).create(user.id, &input).await {
        Ok(page) => {
            Redirect::to(&format!("/pages/{}/edit?success=created", page.id)).into_response()
        }
        Err(RepositoryError::Conflict(msg)) => redirect_with_error("/pages/new", &msg),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Render the edit form with the page's content blocks.
///
/// GET /pages/{id}/edit
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn edit(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Query(query): Query<MessageQuery>,
) -> Result<PageEditTemplate> {
    let RequireAuth(user) = user;
    let page_id = PageId::new(id);

    let repo = PageRepository::new(state.pool());
    let page = repo
        .get(user.id, page_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("page {id}")))?;
    let blocks = repo.list_blocks(user.id, page_id).await?;

    Ok(PageEditTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/pages".to_owned(),
        page_id: id,
        form: PageFormView::from(&page),
        blocks: blocks.iter().map(BlockView::from).collect(),
        layouts: layout_options(),
        success_message: query.success.map(|s| match s.as_str() {
            "created" => "Page created.".to_owned(),
            "saved" => "Page saved.".to_owned(),
            "block_added" => "Block added.".to_owned(),
            "block_saved" => "Block saved.".to_owned(),
            "block_deleted" => "Block deleted.".to_owned(),
            other => other.to_owned(),
        }),
        error_message: query.error,
    })
}

/// Update a page.
///
/// POST /pages/{id}
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn update(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<PageForm>,
) -> Response {
    let RequireAuth(user) = user;
    let edit_path = format!("/pages/{id}/edit");

    let input = match validate_page_input(&form.into_raw()) {
        Ok(input) => input,
        Err(e) => return redirect_with_error(&edit_path, &e.to_string()),
    };

    match PageRepository::new(state.pool())
        .update(user.id, PageId::new(id), &input)
        .await
    {
        Ok(_) => Redirect::to(&format!("{edit_path}?success=saved")).into_response(),
        Err(RepositoryError::Conflict(msg)) => redirect_with_error(&edit_path, &msg),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Delete a page.
///
/// POST /pages/{id}/delete
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn delete(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    let deleted = PageRepository::new(state.pool())
        .delete(user.id, PageId::new(id))
        .await?;
    if !deleted {
        return Err(AppError::NotFound(format!("page {id}")));
    }
    Ok(Redirect::to("/pages?success=deleted"))
}

/// Make a page the home page.
///
/// POST /pages/{id}/home
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn set_home(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    PageRepository::new(state.pool())
        .set_home(user.id, PageId::new(id))
        .await?;
    Ok(Redirect::to("/pages?success=home"))
}

// =============================================================================
// Content Block Handlers
// =============================================================================

/// Append a content block to a page.
///
/// POST /pages/{id}/blocks
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn add_block(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<BlockForm>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    PageRepository::new(state.pool())
        .create_block(user.id, PageId::new(id), &form.kind, &form.body)
        .await?;
    Ok(Redirect::to(&format!("/pages/{id}/edit?success=block_added")))
}

/// Update a content block.
///
/// POST /blocks/{id}
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn update_block(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
    Form(form): Form<BlockForm>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    let block = PageRepository::new(state.pool())
        .update_block(user.id, BlockId::new(id), &form.kind, &form.body)
        .await?;
    Ok(Redirect::to(&format!(
        "/pages/{}/edit?success=block_saved",
        block.page_id
    )))
}

/// Delete a content block.
///
/// POST /blocks/{id}/delete
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn delete_block(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;
    let page_id = PageRepository::new(state.pool())
        .delete_block(user.id, BlockId::new(id))
        .await?;
    Ok(Redirect::to(&format!(
        "/pages/{page_id}/edit?success=block_deleted"
    )))
}

/// Move a block up one position.
///
/// POST /blocks/{id}/move-up
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn move_block_up(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    move_block(&state, user, id, MoveDirection::Up).await
}

/// Move a block down one position.
///
/// POST /blocks/{id}/move-down
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn move_block_down(
    State(state): State<AppState>,
    user: RequireAuth,
    Path(id): Path<i32>,
) -> Result<Redirect> {
    move_block(&state, user, id, MoveDirection::Down).await
}

async fn move_block(
    state: &AppState,
    RequireAuth(user): RequireAuth,
    id: i32,
    direction: MoveDirection,
) -> Result<Redirect> {
    let page_id = PageRepository::new(state.pool())
        .move_block(user.id, BlockId::new(id), direction)
        .await?;
    Ok(Redirect::to(&format!("/pages/{page_id}/edit")))
}

/// Redirect back to a form with a urlencoded error message.
fn redirect_with_error(path: &str, message: &str) -> Response {
    Redirect::to(&format!("{path}?error={}", urlencoding::encode(message))).into_response()
}
