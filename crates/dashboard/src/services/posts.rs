//! Post input validation and clamping.
//!
//! The editor limits mirror the public ones: at most three tags and a
//! 150-character excerpt. Over-limit input is clamped rather than rejected,
//! and each clamp is reported back as a warning so the editor can surface
//! what happened to the save.

use thiserror::Error;

use minispace_core::{Slug, SlugError};

use super::pages::parse_tags;
use crate::db::posts::PostInput;

/// Maximum number of tags per post.
pub const MAX_TAGS: usize = 3;

/// Maximum excerpt length in characters.
pub const MAX_EXCERPT_LENGTH: usize = 150;

/// Maximum post title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Errors produced while validating post input.
#[derive(Debug, Error)]
pub enum PostInputError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title must be at most {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
}

/// Raw post fields as they arrive from the form.
#[derive(Debug, Default, Clone)]
pub struct RawPostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: String,
    pub discoverable: bool,
}

/// A validated post plus warnings about clamped fields.
#[derive(Debug)]
pub struct NormalizedPost {
    pub input: PostInput,
    pub warnings: Vec<String>,
}

/// Validate and clamp raw form fields into a [`PostInput`].
///
/// # Errors
///
/// Returns a [`PostInputError`] for input that can't be clamped into shape
/// (an empty or oversized title, a malformed explicit slug).
pub fn normalize_post_input(raw: &RawPostInput) -> Result<NormalizedPost, PostInputError> {
    let mut warnings = Vec::new();

    let title = raw.title.trim();
    if title.is_empty() {
        return Err(PostInputError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(PostInputError::TitleTooLong);
    }

    let slug = if raw.slug.trim().is_empty() {
        Slug::from_title(title)?
    } else {
        Slug::parse(raw.slug.trim())?
    };

    let excerpt = raw.excerpt.trim();
    let excerpt = if excerpt.chars().count() > MAX_EXCERPT_LENGTH {
        warnings.push(format!(
            "excerpt truncated to {MAX_EXCERPT_LENGTH} characters"
        ));
        excerpt.chars().take(MAX_EXCERPT_LENGTH).collect()
    } else {
        excerpt.to_owned()
    };

    let (tags, dropped) = parse_tags(&raw.tags, MAX_TAGS);
    if dropped > 0 {
        warnings.push(format!("only the first {MAX_TAGS} tags were kept"));
    }

    Ok(NormalizedPost {
        input: PostInput {
            title: title.to_owned(),
            slug: slug.into_inner(),
            excerpt,
            body: raw.body.clone(),
            tags,
            discoverable: raw.discoverable,
        },
        warnings,
    })
}

/// Derive a fallback excerpt from the body when none was provided.
#[must_use]
pub fn derive_excerpt(body: &str) -> String {
    let first_paragraph = body
        .split("\n\n")
        .map(str::trim)
        .find(|p| !p.is_empty())
        .unwrap_or_default();
    first_paragraph.chars().take(MAX_EXCERPT_LENGTH).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(title: &str) -> RawPostInput {
        RawPostInput {
            title: title.to_owned(),
            ..RawPostInput::default()
        }
    }

    #[test]
    fn test_clean_input_has_no_warnings() {
        let mut input = raw("Hello");
        input.excerpt = "Short and sweet.".to_owned();
        input.tags = "a, b".to_owned();
        let normalized = normalize_post_input(&input).unwrap();
        assert!(normalized.warnings.is_empty());
        assert_eq!(normalized.input.slug, "hello");
        assert_eq!(normalized.input.tags, vec!["a", "b"]);
    }

    #[test]
    fn test_oversized_excerpt_and_tags_clamped() {
        // title="Hello", 200-char excerpt, four tags: the excerpt is
        // truncated to 150 chars and only the first three tags survive,
        // with a warning for each clamp.
        let mut input = raw("Hello");
        input.excerpt = "x".repeat(200);
        input.tags = "a,b,c,d".to_owned();

        let normalized = normalize_post_input(&input).unwrap();
        assert_eq!(normalized.input.excerpt.chars().count(), MAX_EXCERPT_LENGTH);
        assert_eq!(normalized.input.tags, vec!["a", "b", "c"]);
        assert_eq!(normalized.warnings.len(), 2);
    }

    #[test]
    fn test_excerpt_truncation_respects_char_boundaries() {
        let mut input = raw("Hello");
        input.excerpt = "é".repeat(160);
        let normalized = normalize_post_input(&input).unwrap();
        assert_eq!(normalized.input.excerpt.chars().count(), MAX_EXCERPT_LENGTH);
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(matches!(
            normalize_post_input(&raw("  ")),
            Err(PostInputError::EmptyTitle)
        ));
    }

    #[test]
    fn test_oversized_title_rejected() {
        assert!(matches!(
            normalize_post_input(&raw(&"t".repeat(201))),
            Err(PostInputError::TitleTooLong)
        ));
    }

    #[test]
    fn test_derive_excerpt_takes_first_paragraph() {
        let body = "\n\nFirst paragraph here.\n\nSecond paragraph.";
        assert_eq!(derive_excerpt(body), "First paragraph here.");
        assert_eq!(derive_excerpt(""), "");
    }
}
