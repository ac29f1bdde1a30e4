//! Apex routes: the platform landing page and the discover feed.

use std::fmt::Write;

use axum::{
    extract::{Query, State},
    response::{Html, IntoResponse, Response},
};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::layout::{
    Body, DocumentMeta, LayoutId, SiteChrome, escape_html, render_document,
};

use crate::db::posts::{DiscoverRow, PostRepository};
use crate::error::{AppError, Result};
use crate::pagination::{Cursor, clamp_limit};
use crate::state::AppState;
use crate::tenant::{HostClass, SiteHost, classify_host, resolve_host};

/// Query parameters for the discover feed.
#[derive(Debug, Deserialize)]
pub struct DiscoverQuery {
    /// Opaque keyset cursor from a previous page.
    pub after: Option<String>,
}

/// The chrome used for the platform's own pages.
fn platform_chrome(layout: LayoutId) -> SiteChrome {
    let mut chrome = SiteChrome::for_username("minispace");
    chrome.header_text = Some("Minispace".to_owned());
    chrome.footer_text = Some("Small sites, well kept.".to_owned());
    chrome.layout = layout;
    chrome.blog_enabled = false;
    chrome
}

/// Render the platform landing page.
pub fn landing(_state: &AppState) -> Html<String> {
    let chrome = platform_chrome(LayoutId::LandingPage);
    let content = "<p>Minispace gives you a small personal site and blog \
                   under your own subdomain.</p>\n\
                   <p><a href=\"/discover\">Discover what people are writing →</a></p>\n"
        .to_owned();
    let body = Body::Page {
        title: String::new(),
        content_html: content,
    };
    Html(render_document(&chrome, &DocumentMeta::default(), &body))
}

/// Display the discover feed on the apex host. On a tenant host, `/discover`
/// is an ordinary page slug and falls through to the page handler.
#[instrument(skip(state))]
pub async fn discover(
    State(state): State<AppState>,
    SiteHost(host): SiteHost,
    Query(query): Query<DiscoverQuery>,
) -> Result<Response> {
    match classify_host(&host, &state.config().base_domain) {
        HostClass::Apex => render_feed(&state, query.after.as_deref()).await,
        HostClass::Subdomain(_) | HostClass::External(_) => {
            let site = resolve_host(&state, &host)
                .await?
                .ok_or(AppError::UnknownSite(host))?;
            super::home::serve_page(&state, &site, &site.chrome, "discover").await
        }
    }
}

async fn render_feed(state: &AppState, after: Option<&str>) -> Result<Response> {
    let cursor = after.and_then(Cursor::decode);
    let limit = clamp_limit(None);
    let mut rows = PostRepository::new(state.pool())
        .list_discoverable(cursor, limit)
        .await?;

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let page_size = limit.max(0) as usize;
    let has_more = rows.len() > page_size;
    if has_more {
        rows.truncate(page_size);
    }

    let mut content = String::new();
    if rows.is_empty() {
        content.push_str("<p>Nothing here yet.</p>\n");
    } else {
        content.push_str("<ul class=\"post-list\">\n");
        for row in &rows {
            push_feed_entry(&mut content, state, row);
        }
        content.push_str("</ul>\n");
    }

    if has_more {
        if let Some(next) = rows.last().and_then(|row| {
            row.published_at.map(|published_at| {
                Cursor {
                    published_at,
                    id: row.id,
                }
                .encode()
            })
        }) {
            let _ = write!(
                content,
                "<p class=\"pager\"><a href=\"/discover?after={}\">Older posts →</a></p>\n",
                escape_html(&next)
            );
        }
    }

    let chrome = platform_chrome(LayoutId::PersonalBlog);
    let body = Body::Page {
        title: "Discover".to_owned(),
        content_html: content,
    };
    Ok(Html(render_document(&chrome, &DocumentMeta::default(), &body)).into_response())
}

fn push_feed_entry(content: &mut String, state: &AppState, row: &DiscoverRow) {
    let url = tenant_post_url(state, &row.username, &row.slug);
    let _ = write!(
        content,
        "<li>\n<h3><a href=\"{url}\">{title}</a></h3>\n<p class=\"post-meta\">{username}",
        title = escape_html(&row.title),
        username = escape_html(&row.username),
    );
    if let Some(ts) = row.published_at {
        let _ = write!(content, " · {}", ts.format("%b %d, %Y"));
    }
    content.push_str("</p>\n");
    if !row.excerpt.is_empty() {
        let _ = write!(content, "<p>{}</p>\n", escape_html(&row.excerpt));
    }
    content.push_str("</li>\n");
}

/// Absolute URL of a post on its tenant's subdomain.
fn tenant_post_url(state: &AppState, username: &str, slug: &str) -> String {
    let config = state.config();
    let base = &config.base_domain;
    if base == "localhost" || base.ends_with(".localhost") {
        format!(
            "http://{username}.{base}:{port}/blog/{slug}",
            port = config.port
        )
    } else {
        format!("https://{username}.{base}/blog/{slug}")
    }
}
