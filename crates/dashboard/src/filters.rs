//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// Format an optional publish timestamp as a short date, or "Draft".
///
/// Usage in templates: `{{ post.published_at|publish_label }}`
#[askama::filter_fn]
pub fn publish_label(
    value: &Option<chrono::DateTime<chrono::Utc>>,
    _env: &dyn askama::Values,
) -> askama::Result<String> {
    Ok(value.map_or_else(|| "Draft".to_string(), |ts| ts.format("%b %d, %Y").to_string()))
}
