//! HTML document assembly.
//!
//! `render_document` is the single entry point: chrome + metadata + body in,
//! one self-contained HTML string out. Text fields are escaped here; the
//! `content_html` fields of [`Body`] are trusted, already-rendered HTML
//! produced by the markdown pipeline.

use std::fmt::Write;

use super::styles::stylesheet;
use super::{Body, BlogStyle, DocumentMeta, PostCard, SiteChrome};

/// Escape text for use in HTML content or attribute values.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Render a complete HTML document for a tenant site.
#[must_use]
pub fn render_document(chrome: &SiteChrome, meta: &DocumentMeta, body: &Body) -> String {
    let palette = chrome.palette();
    let css = stylesheet(chrome.layout, &palette, chrome.font);
    let site_title = escape_html(chrome.site_title());
    let lang = escape_html(meta.language.as_deref().unwrap_or("en"));

    let doc_title = match body {
        Body::Page { title, .. } if !title.is_empty() => {
            format!("{} · {site_title}", escape_html(title))
        }
        Body::Post { card, .. } => format!("{} · {site_title}", escape_html(&card.title)),
        Body::PostList { heading, .. } => {
            format!("{} · {site_title}", escape_html(heading))
        }
        Body::Page { .. } => site_title.clone(),
    };

    let mut html = String::with_capacity(4096 + css.len());
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html lang=\"{lang}\">\n<head>\n\
         <meta charset=\"utf-8\">\n\
         <meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n\
         <title>{doc_title}</title>\n"
    );
    if let Some(description) = meta.description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(
            html,
            "<meta name=\"description\" content=\"{}\">\n",
            escape_html(description)
        );
    }
    if let Some(canonical) = meta.canonical_url.as_deref().filter(|c| !c.is_empty()) {
        let _ = write!(
            html,
            "<link rel=\"canonical\" href=\"{}\">\n",
            escape_html(canonical)
        );
    }
    let _ = write!(html, "<style>{css}</style>\n</head>\n");

    let _ = write!(
        html,
        "<body class=\"layout-{layout} theme-{theme}\">\n<div class=\"wrap\">\n",
        layout = chrome.layout,
        theme = chrome.theme,
    );

    // Header with site title and navigation.
    let home_href = escape_html(&chrome.home_href());
    let base = escape_html(&chrome.base_path);
    let _ = write!(
        html,
        "<header class=\"site-header\">\n<h1><a href=\"{home_href}\">{site_title}</a></h1>\n<nav>\n\
         <a href=\"{home_href}\">Home</a>\n"
    );
    if chrome.blog_enabled {
        let _ = write!(html, "<a href=\"{base}/blog\">Blog</a>\n");
    }
    html.push_str("</nav>\n</header>\n");

    // Main and footer share a wrapper so two-column layouts can place the
    // header beside them.
    html.push_str("<div class=\"site-body\">\n<main class=\"page-content\">\n");
    match body {
        Body::Page {
            title,
            content_html,
        } => render_page(&mut html, title, content_html),
        Body::PostList {
            heading,
            posts,
            style,
            show_search,
            search_query,
            next_cursor,
        } => render_post_list(
            &mut html,
            &base,
            heading,
            posts,
            *style,
            *show_search,
            search_query.as_deref(),
            next_cursor.as_deref(),
        ),
        Body::Post { card, content_html } => render_post(&mut html, card, content_html),
    }
    html.push_str("</main>\n");

    html.push_str("<footer class=\"site-footer\">\n");
    if let Some(footer) = chrome.footer_text.as_deref().filter(|f| !f.trim().is_empty()) {
        let _ = write!(html, "<p>{}</p>\n", escape_html(footer));
    }
    let _ = write!(
        html,
        "<p><a href=\"{home_href}\">{site_title}</a> · powered by Minispace</p>\n"
    );
    html.push_str("</footer>\n</div>\n</div>\n</body>\n</html>\n");

    html
}

fn render_page(html: &mut String, title: &str, content_html: &str) {
    html.push_str("<article>\n");
    if !title.is_empty() {
        let _ = write!(html, "<h2>{}</h2>\n", escape_html(title));
    }
    html.push_str(content_html);
    html.push_str("\n</article>\n");
}

#[allow(clippy::too_many_arguments)]
fn render_post_list(
    html: &mut String,
    base: &str,
    heading: &str,
    posts: &[PostCard],
    style: BlogStyle,
    show_search: bool,
    search_query: Option<&str>,
    next_cursor: Option<&str>,
) {
    let _ = write!(html, "<h2>{}</h2>\n", escape_html(heading));

    if show_search {
        let query = escape_html(search_query.unwrap_or(""));
        let _ = write!(
            html,
            "<form class=\"search-form\" action=\"{base}/blog/search\" method=\"get\">\n\
             <input type=\"search\" name=\"q\" placeholder=\"Search posts\" value=\"{query}\">\n\
             </form>\n"
        );
    }

    if posts.is_empty() {
        html.push_str("<p class=\"post-meta\">Nothing here yet.</p>\n");
    } else {
        let class = match style {
            BlogStyle::Stacked => "post-list",
            BlogStyle::Cards => "post-list cards",
        };
        let _ = write!(html, "<ul class=\"{class}\">\n");
        for post in posts {
            html.push_str("<li>\n");
            let _ = write!(
                html,
                "<h3><a href=\"{base}/blog/{slug}\">{title}</a></h3>\n",
                slug = escape_html(&post.slug),
                title = escape_html(&post.title),
            );
            push_post_meta(html, post);
            if !post.excerpt.is_empty() {
                let _ = write!(html, "<p>{}</p>\n", escape_html(&post.excerpt));
            }
            push_tags(html, &post.tags);
            html.push_str("</li>\n");
        }
        html.push_str("</ul>\n");
    }

    if let Some(cursor) = next_cursor {
        let _ = write!(
            html,
            "<p class=\"pager\"><a href=\"{base}/blog?after={}\">Older posts →</a></p>\n",
            escape_html(cursor)
        );
    }
}

fn render_post(html: &mut String, card: &PostCard, content_html: &str) {
    html.push_str("<article>\n");
    let _ = write!(html, "<h2>{}</h2>\n", escape_html(&card.title));
    push_post_meta(html, card);
    html.push_str(content_html);
    html.push('\n');
    push_tags(html, &card.tags);
    html.push_str("</article>\n");
}

fn push_post_meta(html: &mut String, card: &PostCard) {
    html.push_str("<p class=\"post-meta\">");
    if let Some(label) = card.published_label.as_deref() {
        let _ = write!(html, "{} · ", escape_html(label));
    }
    let _ = write!(html, "{} min read</p>\n", card.reading_minutes);
}

fn push_tags(html: &mut String, tags: &[String]) {
    if tags.is_empty() {
        return;
    }
    html.push_str("<p>");
    for tag in tags {
        let _ = write!(html, "<span class=\"tag\">{}</span>", escape_html(tag));
    }
    html.push_str("</p>\n");
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::layout::{FontFamily, LayoutId, ThemeId};
    use crate::types::HexColor;

    fn chrome() -> SiteChrome {
        SiteChrome {
            username: "ada".to_owned(),
            header_text: Some("Ada's Notebook".to_owned()),
            footer_text: Some("© Ada".to_owned()),
            layout: LayoutId::PersonalBlog,
            theme: ThemeId::Classic,
            font: FontFamily::Sans,
            accent_color: None,
            background_color: None,
            text_color: None,
            blog_enabled: true,
            base_path: String::new(),
        }
    }

    fn sample_page() -> Body {
        Body::Page {
            title: "About".to_owned(),
            content_html: "<p>Hello.</p>".to_owned(),
        }
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"a" & 'b'</b>"#),
            "&lt;b&gt;&quot;a&quot; &amp; &#39;b&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_every_layout_renders_header_and_footer_text() {
        let meta = DocumentMeta::default();
        for layout in LayoutId::ALL {
            let mut chrome = chrome();
            chrome.layout = layout;
            let html = render_document(&chrome, &meta, &sample_page());
            assert!(!html.is_empty());
            assert!(html.contains("Ada&#39;s Notebook"), "header missing in {layout}");
            assert!(html.contains("© Ada"), "footer missing in {layout}");
            assert!(html.contains(&format!("layout-{layout}")));
        }
    }

    #[test]
    fn test_unrecognized_layout_matches_default_output() {
        let meta = DocumentMeta::default();
        let mut with_unknown = chrome();
        with_unknown.layout = LayoutId::parse_or_default("does-not-exist");
        let mut with_default = chrome();
        with_default.layout = LayoutId::default();
        assert_eq!(
            render_document(&with_unknown, &meta, &sample_page()),
            render_document(&with_default, &meta, &sample_page()),
        );
    }

    #[test]
    fn test_header_text_defaults_to_username() {
        let mut chrome = chrome();
        chrome.header_text = None;
        let html = render_document(&chrome, &DocumentMeta::default(), &sample_page());
        assert!(html.contains("<h1><a href=\"/\">ada</a></h1>"));
    }

    #[test]
    fn test_blog_nav_follows_setting() {
        let mut chrome = chrome();
        chrome.blog_enabled = false;
        let html = render_document(&chrome, &DocumentMeta::default(), &sample_page());
        assert!(!html.contains("href=\"/blog\""));
    }

    #[test]
    fn test_meta_description_and_canonical() {
        let meta = DocumentMeta {
            description: Some("A page about Ada".to_owned()),
            canonical_url: Some("https://ada.minispace.dev/about".to_owned()),
            language: Some("de".to_owned()),
        };
        let html = render_document(&chrome(), &meta, &sample_page());
        assert!(html.contains("<html lang=\"de\">"));
        assert!(html.contains("content=\"A page about Ada\""));
        assert!(html.contains("href=\"https://ada.minispace.dev/about\""));
    }

    #[test]
    fn test_post_list_rendering() {
        let body = Body::PostList {
            heading: "Blog".to_owned(),
            posts: vec![PostCard {
                title: "First & Last".to_owned(),
                slug: "first-last".to_owned(),
                excerpt: "A beginning.".to_owned(),
                published_label: Some("Jan 02, 2026".to_owned()),
                reading_minutes: 4,
                tags: vec!["meta".to_owned()],
            }],
            style: BlogStyle::Cards,
            show_search: true,
            search_query: None,
            next_cursor: Some("abc123".to_owned()),
        };
        let html = render_document(&chrome(), &DocumentMeta::default(), &body);
        assert!(html.contains("post-list cards"));
        assert!(html.contains("First &amp; Last"));
        assert!(html.contains("/blog/first-last"));
        assert!(html.contains("Jan 02, 2026 · 4 min read"));
        assert!(html.contains("/blog?after=abc123"));
        assert!(html.contains("search-form"));
        assert!(html.contains("<span class=\"tag\">meta</span>"));
    }

    #[test]
    fn test_empty_post_list() {
        let body = Body::PostList {
            heading: "Blog".to_owned(),
            posts: vec![],
            style: BlogStyle::Stacked,
            show_search: false,
            search_query: None,
            next_cursor: None,
        };
        let html = render_document(&chrome(), &DocumentMeta::default(), &body);
        assert!(html.contains("Nothing here yet."));
        assert!(!html.contains("search-form"));
    }

    #[test]
    fn test_post_body_is_trusted_html() {
        let body = Body::Post {
            card: PostCard {
                title: "Post".to_owned(),
                slug: "post".to_owned(),
                excerpt: String::new(),
                published_label: None,
                reading_minutes: 1,
                tags: vec![],
            },
            content_html: "<p><em>rendered</em></p>".to_owned(),
        };
        let html = render_document(&chrome(), &DocumentMeta::default(), &body);
        assert!(html.contains("<p><em>rendered</em></p>"));
    }

    #[test]
    fn test_base_path_prefixes_links() {
        let mut chrome = chrome();
        chrome.base_path = "/u/ada".to_owned();
        let body = Body::PostList {
            heading: "Blog".to_owned(),
            posts: vec![PostCard {
                title: "Post".to_owned(),
                slug: "post".to_owned(),
                excerpt: String::new(),
                published_label: None,
                reading_minutes: 1,
                tags: vec![],
            }],
            style: BlogStyle::Stacked,
            show_search: false,
            search_query: None,
            next_cursor: None,
        };
        let html = render_document(&chrome, &DocumentMeta::default(), &body);
        assert!(html.contains("href=\"/u/ada\""));
        assert!(html.contains("href=\"/u/ada/blog\""));
        assert!(html.contains("href=\"/u/ada/blog/post\""));
    }

    #[test]
    fn test_color_overrides_reach_stylesheet() {
        let mut chrome = chrome();
        chrome.accent_color = Some(HexColor::parse("#ff0000").unwrap());
        let html = render_document(&chrome, &DocumentMeta::default(), &sample_page());
        assert!(html.contains("--accent:#ff0000"));
    }
}
