//! Blog route handlers: index, search, and single posts.

use axum::{
    extract::{Path, Query, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::layout::{Body, DocumentMeta, PostCard, SiteChrome, render_document};

use crate::db::posts::{PostRepository, PostRow};
use crate::db::tenants::TenantSite;
use crate::error::{AppError, Result};
use crate::markdown::{reading_time_minutes, render_markdown};
use crate::pagination::{Cursor, clamp_limit};
use crate::state::AppState;
use crate::tenant::{Tenant, resolve_username};

use super::path_chrome;

/// Query parameters for blog listings.
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    /// Opaque keyset cursor from a previous page.
    pub after: Option<String>,
    /// Search query (search endpoint only).
    pub q: Option<String>,
}

/// Display the blog index.
#[instrument(skip(state, site), fields(tenant = %site.0.username))]
pub async fn index(
    State(state): State<AppState>,
    site: Tenant,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let Tenant(site) = site;
    render_index(&state, &site, &site.chrome, query.after.as_deref()).await
}

/// Display blog search results.
#[instrument(skip(state, site), fields(tenant = %site.0.username))]
pub async fn search(
    State(state): State<AppState>,
    site: Tenant,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let Tenant(site) = site;
    render_search(&state, &site, &site.chrome, query).await
}

/// Display a single post by slug.
#[instrument(skip(state, site), fields(tenant = %site.0.username))]
pub async fn show(
    State(state): State<AppState>,
    site: Tenant,
    Path(slug): Path<String>,
) -> Result<Html<String>> {
    let Tenant(site) = site;
    render_post(&state, &site, &site.chrome, &slug).await
}

/// `/u/{username}/blog` - blog index through the path fallback.
#[instrument(skip(state))]
pub async fn index_by_path(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Html<String>> {
    let site = resolve_username(&state, &username).await?;
    let chrome = path_chrome(&site);
    render_index(&state, &site, &chrome, query.after.as_deref()).await
}

/// `/u/{username}/blog/search` - blog search through the path fallback.
#[instrument(skip(state))]
pub async fn search_by_path(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Query(query): Query<ListQuery>,
) -> Result<Response> {
    let site = resolve_username(&state, &username).await?;
    let chrome = path_chrome(&site);
    render_search(&state, &site, &chrome, query).await
}

/// `/u/{username}/blog/{slug}` - single post through the path fallback.
#[instrument(skip(state))]
pub async fn show_by_path(
    State(state): State<AppState>,
    Path((username, slug)): Path<(String, String)>,
) -> Result<Html<String>> {
    let site = resolve_username(&state, &username).await?;
    let chrome = path_chrome(&site);
    render_post(&state, &site, &chrome, &slug).await
}

async fn render_index(
    state: &AppState,
    site: &TenantSite,
    chrome: &SiteChrome,
    after: Option<&str>,
) -> Result<Html<String>> {
    if !chrome.blog_enabled {
        return Err(AppError::NotFound("blog".to_owned()));
    }

    let cursor = after.and_then(Cursor::decode);
    let limit = clamp_limit(None);
    let rows = PostRepository::new(state.pool())
        .list_published(site.user_id, cursor, limit)
        .await?;
    let (posts, next_cursor) = paginate(rows, limit);

    let body = Body::PostList {
        heading: "Blog".to_owned(),
        posts,
        style: site.blog_style,
        show_search: site.blog_show_search,
        search_query: None,
        next_cursor,
    };
    Ok(Html(render_document(chrome, &DocumentMeta::default(), &body)))
}

async fn render_search(
    state: &AppState,
    site: &TenantSite,
    chrome: &SiteChrome,
    query: ListQuery,
) -> Result<Response> {
    if !chrome.blog_enabled || !site.blog_show_search {
        return Err(AppError::NotFound("search".to_owned()));
    }

    let q = query.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        let target = format!("{}/blog", chrome.base_path);
        return Ok(Redirect::to(&target).into_response());
    }

    let cursor = query.after.as_deref().and_then(Cursor::decode);
    let limit = clamp_limit(None);
    let rows = PostRepository::new(state.pool())
        .search_published(site.user_id, q, cursor, limit)
        .await?;
    let (posts, next_cursor) = paginate(rows, limit);

    let body = Body::PostList {
        heading: format!("Search: {q}"),
        posts,
        style: site.blog_style,
        show_search: true,
        search_query: Some(q.to_owned()),
        next_cursor,
    };
    Ok(Html(render_document(chrome, &DocumentMeta::default(), &body)).into_response())
}

async fn render_post(
    state: &AppState,
    site: &TenantSite,
    chrome: &SiteChrome,
    slug: &str,
) -> Result<Html<String>> {
    if !chrome.blog_enabled {
        return Err(AppError::NotFound(slug.to_owned()));
    }

    let repo = PostRepository::new(state.pool());
    let post = repo
        .get_published_by_slug(site.user_id, slug)
        .await?
        .ok_or_else(|| AppError::NotFound(slug.to_owned()))?;

    // Best-effort read count; a lost increment never fails the request.
    let pool = state.pool().clone();
    let post_id = post.post_id();
    tokio::spawn(async move {
        if let Err(e) = PostRepository::new(&pool).increment_read_count(post_id).await {
            tracing::warn!(error = %e, post_id = %post_id, "Failed to increment read count");
        }
    });

    let content_html = render_markdown(&post.body);
    let card = post_card(&post);
    let meta = DocumentMeta {
        description: Some(post.excerpt.clone()).filter(|e| !e.is_empty()),
        canonical_url: None,
        language: None,
    };
    let body = Body::Post { card, content_html };

    Ok(Html(render_document(chrome, &meta, &body)))
}

/// Truncate the fetched `limit + 1` rows to a page and encode the cursor for
/// the next one, if any.
fn paginate(mut rows: Vec<PostRow>, limit: i64) -> (Vec<PostCard>, Option<String>) {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let limit = limit.max(0) as usize;
    let has_more = rows.len() > limit;
    if has_more {
        rows.truncate(limit);
    }
    let next_cursor = if has_more {
        rows.last().and_then(|row| {
            row.published_at.map(|published_at| {
                Cursor {
                    published_at,
                    id: row.id,
                }
                .encode()
            })
        })
    } else {
        None
    };
    (rows.iter().map(post_card).collect(), next_cursor)
}

/// Build the renderer's post summary from a row.
fn post_card(row: &PostRow) -> PostCard {
    PostCard {
        title: row.title.clone(),
        slug: row.slug.clone(),
        excerpt: row.excerpt.clone(),
        published_label: row.published_at.map(|ts| ts.format("%b %d, %Y").to_string()),
        reading_minutes: reading_time_minutes(&row.body),
        tags: row.tags.clone(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn row(id: i32) -> PostRow {
        PostRow {
            id,
            user_id: 1,
            title: format!("Post {id}"),
            slug: format!("post-{id}"),
            excerpt: String::new(),
            body: "some words here".to_owned(),
            tags: vec![],
            published_at: Some(Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, id as u32 % 60).unwrap()),
            read_count: 0,
        }
    }

    #[test]
    fn test_paginate_no_next_page() {
        let (cards, next) = paginate(vec![row(1), row(2)], 10);
        assert_eq!(cards.len(), 2);
        assert!(next.is_none());
    }

    #[test]
    fn test_paginate_with_next_page() {
        let rows: Vec<PostRow> = (1..=11).map(row).collect();
        let (cards, next) = paginate(rows, 10);
        assert_eq!(cards.len(), 10);
        let cursor = Cursor::decode(&next.unwrap()).unwrap();
        assert_eq!(cursor.id, 10);
    }

    #[test]
    fn test_post_card_formats_date() {
        let card = post_card(&row(3));
        assert_eq!(card.published_label.as_deref(), Some("Jan 01, 2026"));
        assert_eq!(card.reading_minutes, 1);
    }
}
