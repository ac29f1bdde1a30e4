//! Appearance and blog settings routes.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use tracing::instrument;

use minispace_core::HexColor;
use minispace_core::layout::{BlogStyle, FontFamily, LayoutId, ThemeId};

use crate::db::RepositoryError;
use crate::db::settings::{AppearanceUpdate, SettingsRepository, SiteSettings};
use crate::error::{AppError, Result};
use crate::filters;
use crate::middleware::RequireAuth;
use crate::state::AppState;

// =============================================================================
// Form & Query Types
// =============================================================================

/// Appearance form data.
#[derive(Debug, Deserialize)]
pub struct AppearanceForm {
    #[serde(default)]
    pub layout: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub font_family: String,
    #[serde(default)]
    pub accent_color: String,
    #[serde(default)]
    pub background_color: String,
    #[serde(default)]
    pub text_color: String,
    #[serde(default)]
    pub header_text: String,
    #[serde(default)]
    pub footer_text: String,
    #[serde(default)]
    pub custom_domain: String,
}

/// Blog settings form data.
#[derive(Debug, Deserialize)]
pub struct BlogForm {
    /// Checkbox; present when checked.
    #[serde(default)]
    pub enabled: Option<String>,
    #[serde(default)]
    pub layout_style: String,
    /// Checkbox; present when checked.
    #[serde(default)]
    pub show_search: Option<String>,
}

/// Query parameters for error/success display.
#[derive(Debug, Deserialize)]
pub struct MessageQuery {
    pub error: Option<String>,
    pub success: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// A select option for the settings form.
#[derive(Debug, Clone)]
pub struct SelectOption {
    pub id: String,
    pub name: String,
}

/// Settings page template.
#[derive(Template, WebTemplate)]
#[template(path = "settings/index.html")]
pub struct SettingsTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub settings: SiteSettings,
    pub layouts: Vec<SelectOption>,
    pub themes: Vec<SelectOption>,
    pub fonts: Vec<SelectOption>,
    pub success_message: Option<String>,
    pub error_message: Option<String>,
}

// =============================================================================
// Handlers
// =============================================================================

/// Render the settings page.
///
/// GET /settings
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn settings_page(
    State(state): State<AppState>,
    user: RequireAuth,
    Query(query): Query<MessageQuery>,
) -> Result<SettingsTemplate> {
    let RequireAuth(user) = user;
    let settings = SettingsRepository::new(state.pool()).get(user.id).await?;

    let layouts = LayoutId::ALL
        .iter()
        .map(|l| SelectOption {
            id: l.as_str().to_owned(),
            name: l.display_name().to_owned(),
        })
        .collect();
    let themes = ThemeId::ALL
        .iter()
        .map(|t| SelectOption {
            id: t.as_str().to_owned(),
            name: t.as_str().to_owned(),
        })
        .collect();
    let fonts = FontFamily::ALL
        .iter()
        .map(|f| SelectOption {
            id: f.as_str().to_owned(),
            name: f.as_str().to_owned(),
        })
        .collect();

    Ok(SettingsTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/settings".to_owned(),
        settings,
        layouts,
        themes,
        fonts,
        success_message: query.success.map(|s| match s.as_str() {
            "appearance" => "Appearance saved.".to_owned(),
            "blog" => "Blog settings saved.".to_owned(),
            other => other.to_owned(),
        }),
        error_message: query.error,
    })
}

/// Save appearance settings.
///
/// POST /settings/appearance
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn update_appearance(
    State(state): State<AppState>,
    user: RequireAuth,
    Form(form): Form<AppearanceForm>,
) -> Response {
    let RequireAuth(user) = user;

    let accent_color = match parse_color_field(&form.accent_color, "accent color") {
        Ok(color) => color,
        Err(msg) => return redirect_with_error(&msg),
    };
    let background_color = match parse_color_field(&form.background_color, "background color") {
        Ok(color) => color,
        Err(msg) => return redirect_with_error(&msg),
    };
    let text_color = match parse_color_field(&form.text_color, "text color") {
        Ok(color) => color,
        Err(msg) => return redirect_with_error(&msg),
    };

    // Unknown layout/theme/font names quietly become the defaults, like
    // everywhere else in the pipeline.
    let update = AppearanceUpdate {
        layout: LayoutId::parse_or_default(&form.layout).as_str().to_owned(),
        theme: ThemeId::parse_or_default(&form.theme).as_str().to_owned(),
        font_family: FontFamily::parse_or_default(&form.font_family)
            .as_str()
            .to_owned(),
        accent_color,
        background_color,
        text_color,
        header_text: trimmed(&form.header_text),
        footer_text: trimmed(&form.footer_text),
        custom_domain: trimmed(&form.custom_domain).map(|d| d.to_ascii_lowercase()),
    };

    match SettingsRepository::new(state.pool())
        .update_appearance(user.id, &update)
        .await
    {
        Ok(()) => Redirect::to("/settings?success=appearance").into_response(),
        Err(RepositoryError::Conflict(msg)) => redirect_with_error(&msg),
        Err(e) => AppError::from(e).into_response(),
    }
}

/// Save blog settings.
///
/// POST /settings/blog
#[instrument(skip(state, user, form), fields(user = %user.0.username))]
pub async fn update_blog(
    State(state): State<AppState>,
    user: RequireAuth,
    Form(form): Form<BlogForm>,
) -> Result<Redirect> {
    let RequireAuth(user) = user;

    let layout_style = BlogStyle::parse_or_default(&form.layout_style);
    SettingsRepository::new(state.pool())
        .update_blog(
            user.id,
            form.enabled.is_some(),
            layout_style.as_str(),
            form.show_search.is_some(),
        )
        .await?;

    Ok(Redirect::to("/settings?success=blog"))
}

/// Parse an optional color field; blank means unset.
fn parse_color_field(value: &str, label: &str) -> std::result::Result<Option<String>, String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    HexColor::parse(trimmed)
        .map(|c| Some(c.to_string()))
        .map_err(|_| format!("{label} must be a #rrggbb hex value"))
}

/// Trimmed `Some`, or `None` when blank.
fn trimmed(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_owned())
    }
}

/// Redirect back to the settings page with a urlencoded error message.
fn redirect_with_error(message: &str) -> Response {
    Redirect::to(&format!(
        "/settings?error={}",
        urlencoding::encode(message)
    ))
    .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_color_field() {
        assert_eq!(parse_color_field("", "accent").unwrap(), None);
        assert_eq!(
            parse_color_field(" #AABBCC ", "accent").unwrap(),
            Some("#aabbcc".to_owned())
        );
        assert!(parse_color_field("tomato", "accent").is_err());
    }
}
