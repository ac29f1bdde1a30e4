//! Markdown rendering and content-block assembly.
//!
//! Post bodies and markdown content blocks are stored as markdown and
//! rendered to HTML here with GitHub Flavored Markdown extensions. Raw HTML
//! blocks pass through untouched; the tenant authored them.

use comrak::{Options, markdown_to_html};

use crate::db::pages::BlockRow;

/// Words per minute assumed for the reading-time estimate.
const WORDS_PER_MINUTE: f32 = 200.0;

/// Render markdown to HTML with GitHub Flavored Markdown support.
#[must_use]
pub fn render_markdown(content: &str) -> String {
    let mut options = Options::default();

    // Enable GFM extensions
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.header_ids = Some(String::new());
    options.extension.footnotes = true;

    // Tenants author their own sites; raw HTML is allowed as in the
    // dedicated html block kind.
    options.render.r#unsafe = true;

    markdown_to_html(content, &options)
}

/// Estimate reading time in minutes (average 200 words per minute, min 1).
#[must_use]
pub fn reading_time_minutes(content: &str) -> u32 {
    let word_count = content.split_whitespace().count();
    #[allow(
        clippy::cast_precision_loss,
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss
    )]
    let minutes = ((word_count as f32) / WORDS_PER_MINUTE).ceil() as u32;
    minutes.max(1)
}

/// Render a page's content blocks, in order, into one HTML fragment.
///
/// `markdown` blocks are rendered; `html` blocks pass through; unknown
/// kinds are treated as markdown, which degrades gracefully for plain text.
#[must_use]
pub fn render_blocks(blocks: &[BlockRow]) -> String {
    let mut html = String::new();
    for block in blocks {
        match block.kind.as_str() {
            "html" => html.push_str(&block.body),
            _ => html.push_str(&render_markdown(&block.body)),
        }
        html.push('\n');
    }
    html
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(kind: &str, body: &str, position: i32) -> BlockRow {
        BlockRow {
            id: position,
            page_id: 1,
            position,
            kind: kind.to_owned(),
            body: body.to_owned(),
        }
    }

    #[test]
    fn test_render_markdown_basic() {
        let html = render_markdown("# Title\n\nSome *emphasis*.");
        assert!(html.contains("<h1"));
        assert!(html.contains("<em>emphasis</em>"));
    }

    #[test]
    fn test_render_markdown_gfm_table() {
        let html = render_markdown("| a | b |\n|---|---|\n| 1 | 2 |");
        assert!(html.contains("<table>"));
    }

    #[test]
    fn test_reading_time_minimum_one() {
        assert_eq!(reading_time_minutes("short"), 1);
        assert_eq!(reading_time_minutes(""), 1);
    }

    #[test]
    fn test_reading_time_scales_with_words() {
        let content = "word ".repeat(450);
        assert_eq!(reading_time_minutes(&content), 3);
    }

    #[test]
    fn test_render_blocks_mixes_kinds() {
        let blocks = vec![
            block("markdown", "**bold**", 0),
            block("html", "<div class=\"custom\">x</div>", 1),
        ];
        let html = render_blocks(&blocks);
        assert!(html.contains("<strong>bold</strong>"));
        assert!(html.contains("<div class=\"custom\">x</div>"));
    }

    #[test]
    fn test_render_blocks_unknown_kind_degrades_to_markdown() {
        let blocks = vec![block("text", "plain words", 0)];
        let html = render_blocks(&blocks);
        assert!(html.contains("<p>plain words</p>"));
    }
}
