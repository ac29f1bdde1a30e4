//! Tenant home and page route handlers.

use std::fmt::Write;

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::instrument;

use minispace_core::layout::{Body, DocumentMeta, LayoutId, SiteChrome, escape_html, render_document};

use crate::db::pages::{PageRepository, PageRow};
use crate::db::tenants::TenantSite;
use crate::error::{AppError, Result};
use crate::markdown::render_blocks;
use crate::state::AppState;
use crate::tenant::{HostClass, SiteHost, Tenant, classify_host, resolve_host, resolve_username};

use super::{discover, path_chrome};

/// Dispatch `/` on the request host: the apex serves the platform landing
/// page, everything else serves the resolved tenant's home.
#[instrument(skip(state))]
pub async fn root(State(state): State<AppState>, SiteHost(host): SiteHost) -> Result<Response> {
    match classify_host(&host, &state.config().base_domain) {
        HostClass::Apex => Ok(discover::landing(&state).into_response()),
        HostClass::Subdomain(_) | HostClass::External(_) => {
            let site = resolve_host(&state, &host)
                .await?
                .ok_or(AppError::UnknownSite(host))?;
            render_home(&state, &site, &site.chrome).await
        }
    }
}

/// Display a tenant page by slug.
///
/// # Errors
///
/// Returns 404 if neither the slug nor an alias matches.
#[instrument(skip(state, site), fields(tenant = %site.0.username))]
pub async fn page(
    State(state): State<AppState>,
    site: Tenant,
    Path(slug): Path<String>,
) -> Result<Response> {
    let Tenant(site) = site;
    serve_page(&state, &site, &site.chrome, &slug).await
}

/// `/u/{username}` - tenant home through the path fallback.
#[instrument(skip(state))]
pub async fn home_by_path(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Result<Response> {
    let site = resolve_username(&state, &username).await?;
    let chrome = path_chrome(&site);
    render_home(&state, &site, &chrome).await
}

/// `/u/{username}/{slug}` - tenant page through the path fallback.
#[instrument(skip(state))]
pub async fn page_by_path(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
) -> Result<Response> {
    let site = resolve_username(&state, &username).await?;
    let chrome = path_chrome(&site);
    serve_page(&state, &site, &chrome, &slug).await
}

/// Render the tenant's home: the page flagged `is_home`, or a generated
/// profile page listing their pages when none is set.
pub(crate) async fn render_home(
    state: &AppState,
    site: &TenantSite,
    chrome: &SiteChrome,
) -> Result<Response> {
    let pages = PageRepository::new(state.pool());

    if let Some(page) = pages.get_home(site.user_id).await? {
        return render_page_doc(state, chrome, &page).await;
    }

    let page_rows = pages.list_for_user(site.user_id).await?;
    let mut content = String::new();
    if page_rows.is_empty() {
        content.push_str("<p>This site has no pages yet.</p>\n");
    } else {
        content.push_str("<ul>\n");
        for row in &page_rows {
            let _ = write!(
                content,
                "<li><a href=\"{base}/{slug}\">{title}</a></li>\n",
                base = escape_html(&chrome.base_path),
                slug = escape_html(&row.slug),
                title = escape_html(&row.title),
            );
        }
        content.push_str("</ul>\n");
    }

    let body = Body::Page {
        title: String::new(),
        content_html: content,
    };
    Ok(Html(render_document(chrome, &DocumentMeta::default(), &body)).into_response())
}

/// Serve a page by slug, following aliases with a permanent redirect.
pub(crate) async fn serve_page(
    state: &AppState,
    site: &TenantSite,
    chrome: &SiteChrome,
    slug: &str,
) -> Result<Response> {
    let repo = PageRepository::new(state.pool());

    if let Some(page) = repo.get_by_slug(site.user_id, slug).await? {
        return render_page_doc(state, chrome, &page).await;
    }

    if let Some(aliased) = repo.get_by_alias(site.user_id, slug).await? {
        let target = format!("{}/{}", chrome.base_path, aliased.slug);
        return Ok(Redirect::permanent(&target).into_response());
    }

    Err(AppError::NotFound(slug.to_owned()))
}

/// Render a page document: content blocks through the markdown pipeline,
/// SEO fields into the head, per-page layout override applied.
async fn render_page_doc(
    state: &AppState,
    chrome: &SiteChrome,
    page: &PageRow,
) -> Result<Response> {
    let repo = PageRepository::new(state.pool());
    let blocks = repo.list_blocks(page.page_id()).await?;
    let content_html = render_blocks(&blocks);

    let mut chrome = chrome.clone();
    if let Some(layout) = page.layout.as_deref() {
        // A per-page override only applies when it parses; otherwise the
        // site-wide layout stands.
        if let Some(layout) = LayoutId::parse(layout) {
            chrome.layout = layout;
        }
    }

    let meta = DocumentMeta {
        description: page.seo_description.clone(),
        canonical_url: page.canonical_url.clone(),
        language: page.language.clone(),
    };
    // The home page speaks for the whole site; its title stays in <title>
    // but is not repeated as a heading.
    let title = if page.is_home {
        String::new()
    } else {
        page.title.clone()
    };
    let body = Body::Page {
        title,
        content_html,
    };

    Ok(Html(render_document(&chrome, &meta, &body)).into_response())
}
