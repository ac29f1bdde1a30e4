//! Page input validation.
//!
//! Turns raw form fields into a validated [`PageInput`]. Slugs are derived
//! from the title when left blank; aliases are held to the same slug rules.

use thiserror::Error;

use minispace_core::layout::LayoutId;
use minispace_core::{Slug, SlugError};

use crate::db::pages::PageInput;

/// Maximum page title length.
pub const MAX_TITLE_LENGTH: usize = 200;

/// Errors produced while validating page input.
#[derive(Debug, Error)]
pub enum PageInputError {
    #[error("title cannot be empty")]
    EmptyTitle,
    #[error("title must be at most {MAX_TITLE_LENGTH} characters")]
    TitleTooLong,
    #[error("invalid slug: {0}")]
    InvalidSlug(#[from] SlugError),
    #[error("alias cannot equal the slug")]
    AliasEqualsSlug,
}

/// Raw page fields as they arrive from the form.
#[derive(Debug, Default, Clone)]
pub struct RawPageInput {
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

/// Validate raw form fields into a [`PageInput`].
///
/// # Errors
///
/// Returns a [`PageInputError`] naming the first rejected field.
pub fn validate_page_input(raw: &RawPageInput) -> Result<PageInput, PageInputError> {
    let title = raw.title.trim();
    if title.is_empty() {
        return Err(PageInputError::EmptyTitle);
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(PageInputError::TitleTooLong);
    }

    let slug = if raw.slug.trim().is_empty() {
        Slug::from_title(title)?
    } else {
        Slug::parse(raw.slug.trim())?
    };

    let alias = match raw.alias.trim() {
        "" => None,
        value => Some(Slug::parse(value)?),
    };
    if alias.as_ref().is_some_and(|a| a == &slug) {
        return Err(PageInputError::AliasEqualsSlug);
    }

    // A per-page layout override is only kept when it names a real layout.
    let layout = LayoutId::parse(&raw.layout).map(|l| l.as_str().to_owned());

    Ok(PageInput {
        title: title.to_owned(),
        slug: slug.into_inner(),
        is_home: raw.is_home,
        layout,
        seo_description: non_empty(&raw.seo_description),
        canonical_url: non_empty(&raw.canonical_url),
        alias: alias.map(Slug::into_inner),
        language: non_empty(&raw.language),
        tags: parse_tags(&raw.tags, usize::MAX).0,
        discoverable: raw.discoverable,
    })
}

/// Trimmed `Some`, or `None` when blank.
pub(crate) fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Split a comma-separated tag field, trimming and dropping blanks and
/// duplicates. Returns the kept tags and how many were dropped by `max`.
pub(crate) fn parse_tags(raw: &str, max: usize) -> (Vec<String>, usize) {
    let mut tags: Vec<String> = Vec::new();
    for tag in raw.split(',') {
        let tag = tag.trim();
        if tag.is_empty() || tags.iter().any(|t| t.eq_ignore_ascii_case(tag)) {
            continue;
        }
        tags.push(tag.to_owned());
    }
    let dropped = tags.len().saturating_sub(max);
    tags.truncate(max);
    (tags, dropped)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn raw(title: &str, slug: &str) -> RawPageInput {
        RawPageInput {
            title: title.to_owned(),
            slug: slug.to_owned(),
            ..RawPageInput::default()
        }
    }

    #[test]
    fn test_slug_derived_from_title() {
        let input = validate_page_input(&raw("About Me!", "")).unwrap();
        assert_eq!(input.slug, "about-me");
    }

    #[test]
    fn test_explicit_slug_wins() {
        let input = validate_page_input(&raw("About Me!", "about")).unwrap();
        assert_eq!(input.slug, "about");
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(matches!(
            validate_page_input(&raw("   ", "x")),
            Err(PageInputError::EmptyTitle)
        ));
    }

    #[test]
    fn test_bad_slug_rejected() {
        assert!(matches!(
            validate_page_input(&raw("Title", "Has Spaces")),
            Err(PageInputError::InvalidSlug(_))
        ));
    }

    #[test]
    fn test_alias_must_differ_from_slug() {
        let mut input = raw("About", "about");
        input.alias = "about".to_owned();
        assert!(matches!(
            validate_page_input(&input),
            Err(PageInputError::AliasEqualsSlug)
        ));
    }

    #[test]
    fn test_unknown_layout_override_dropped() {
        let mut input = raw("About", "about");
        input.layout = "mystery-grid".to_owned();
        assert!(validate_page_input(&input).unwrap().layout.is_none());

        input.layout = "modern-card-deck".to_owned();
        assert_eq!(
            validate_page_input(&input).unwrap().layout.as_deref(),
            Some("portfolio-grid")
        );
    }

    #[test]
    fn test_parse_tags_dedupes_and_truncates() {
        let (tags, dropped) = parse_tags("rust, Web,  , rust, systems, extra", 3);
        assert_eq!(tags, vec!["rust", "Web", "systems"]);
        assert_eq!(dropped, 1);
    }
}
