//! Layout preview endpoint.
//!
//! `GET /api/preview` renders a sample document with the requested layout,
//! theme, font and header/footer text, so the settings page can preview
//! appearance changes in an iframe before saving. Every parameter is
//! optional and unrecognized values fall back to defaults; the endpoint
//! never fails on bad input.

use axum::{extract::Query, response::Html};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::HexColor;
use minispace_core::layout::{
    Body, BlogStyle, DocumentMeta, FontFamily, LayoutId, PostCard, SiteChrome, ThemeId,
    render_document,
};

use crate::middleware::RequireAuth;

/// Preview query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct PreviewQuery {
    pub layout: Option<String>,
    pub theme: Option<String>,
    pub font: Option<String>,
    pub header: Option<String>,
    pub footer: Option<String>,
    pub accent: Option<String>,
    /// `page` (default) or `posts`.
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}

/// Render a preview document.
///
/// GET /api/preview
#[instrument(skip(user), fields(user = %user.0.username))]
pub async fn preview(user: RequireAuth, Query(query): Query<PreviewQuery>) -> Html<String> {
    let RequireAuth(user) = user;
    Html(render_preview(user.username.as_str(), &query))
}

/// Build the preview document. Pure so it can be tested directly.
fn render_preview(username: &str, query: &PreviewQuery) -> String {
    let chrome = SiteChrome {
        username: username.to_owned(),
        header_text: query.header.clone().filter(|h| !h.trim().is_empty()),
        footer_text: query.footer.clone().filter(|f| !f.trim().is_empty()),
        layout: query
            .layout
            .as_deref()
            .map(LayoutId::parse_or_default)
            .unwrap_or_default(),
        theme: query
            .theme
            .as_deref()
            .map(ThemeId::parse_or_default)
            .unwrap_or_default(),
        font: query
            .font
            .as_deref()
            .map(FontFamily::parse_or_default)
            .unwrap_or_default(),
        accent_color: query.accent.as_deref().and_then(|c| HexColor::parse(c).ok()),
        background_color: None,
        text_color: None,
        blog_enabled: true,
        base_path: String::new(),
    };

    let body = match query.content_type.as_deref() {
        Some("posts") => sample_post_list(),
        _ => sample_page(),
    };

    render_document(&chrome, &DocumentMeta::default(), &body)
}

fn sample_page() -> Body {
    Body::Page {
        title: "About".to_owned(),
        content_html: "<p>This is how a page on your site will look. Body text, \
                       <a href=\"#\">links</a>, and <code>inline code</code> all pick \
                       up the theme.</p>\n\
                       <h3>A heading</h3>\n\
                       <p>Another paragraph, just long enough to show the measure \
                       of a line of text in this layout.</p>"
            .to_owned(),
    }
}

fn sample_post_list() -> Body {
    let posts = vec![
        PostCard {
            title: "Hello, world".to_owned(),
            slug: "hello-world".to_owned(),
            excerpt: "The first post on a brand new site.".to_owned(),
            published_label: Some("Jun 04, 2026".to_owned()),
            reading_minutes: 2,
            tags: vec!["meta".to_owned()],
        },
        PostCard {
            title: "On keeping notes".to_owned(),
            slug: "on-keeping-notes".to_owned(),
            excerpt: "Why a plain text file beats most systems.".to_owned(),
            published_label: Some("May 28, 2026".to_owned()),
            reading_minutes: 5,
            tags: vec!["notes".to_owned(), "writing".to_owned()],
        },
        PostCard {
            title: "Small sites".to_owned(),
            slug: "small-sites".to_owned(),
            excerpt: "A personal site doesn't need a build pipeline.".to_owned(),
            published_label: Some("May 12, 2026".to_owned()),
            reading_minutes: 3,
            tags: vec![],
        },
    ];
    Body::PostList {
        heading: "Blog".to_owned(),
        posts,
        style: BlogStyle::Stacked,
        show_search: false,
        search_query: None,
        next_cursor: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview_contains_header_and_footer() {
        let query = PreviewQuery {
            header: Some("My Site".to_owned()),
            footer: Some("Bye".to_owned()),
            ..PreviewQuery::default()
        };
        let html = render_preview("ada", &query);
        assert!(html.contains("My Site"));
        assert!(html.contains("Bye"));
    }

    #[test]
    fn test_preview_defaults_header_to_username() {
        let html = render_preview("ada", &PreviewQuery::default());
        assert!(html.contains(">ada</a></h1>"));
    }

    #[test]
    fn test_preview_unknown_layout_falls_back() {
        let unknown = PreviewQuery {
            layout: Some("no-such-layout".to_owned()),
            ..PreviewQuery::default()
        };
        let html = render_preview("ada", &unknown);
        assert!(html.contains("layout-personal-blog"));
    }

    #[test]
    fn test_preview_posts_type() {
        let query = PreviewQuery {
            content_type: Some("posts".to_owned()),
            ..PreviewQuery::default()
        };
        let html = render_preview("ada", &query);
        assert!(html.contains("Hello, world"));
        assert!(html.contains("post-list"));
    }
}
