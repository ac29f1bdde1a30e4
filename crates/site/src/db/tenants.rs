//! Tenant lookup: user plus site settings, resolved into rendering chrome.

use sqlx::PgPool;

use minispace_core::layout::{BlogStyle, FontFamily, LayoutId, SiteChrome, ThemeId};
use minispace_core::{HexColor, UserId};

use super::RepositoryError;

/// Joined `users` + `site_settings` row.
#[derive(Debug, Clone, sqlx::FromRow)]
struct TenantRow {
    id: i32,
    username: String,
    layout: String,
    theme: String,
    font_family: String,
    accent_color: Option<String>,
    background_color: Option<String>,
    text_color: Option<String>,
    header_text: Option<String>,
    footer_text: Option<String>,
    blog_enabled: bool,
    blog_layout_style: String,
    blog_show_search: bool,
}

/// A resolved tenant: identity plus everything the renderer needs.
#[derive(Debug, Clone)]
pub struct TenantSite {
    /// Owning user id.
    pub user_id: UserId,
    /// Tenant username.
    pub username: String,
    /// Rendering chrome derived from the settings row.
    pub chrome: SiteChrome,
    /// Blog index listing style.
    pub blog_style: BlogStyle,
    /// Whether the blog search form/endpoint is enabled.
    pub blog_show_search: bool,
}

impl TenantSite {
    fn from_row(row: TenantRow) -> Self {
        // Stored appearance values are lenient: unknown names fall back to
        // defaults, unparseable colors fall back to the theme preset.
        let chrome = SiteChrome {
            username: row.username.clone(),
            header_text: row.header_text,
            footer_text: row.footer_text,
            layout: LayoutId::parse_or_default(&row.layout),
            theme: ThemeId::parse_or_default(&row.theme),
            font: FontFamily::parse_or_default(&row.font_family),
            accent_color: row.accent_color.as_deref().and_then(|c| HexColor::parse(c).ok()),
            background_color: row
                .background_color
                .as_deref()
                .and_then(|c| HexColor::parse(c).ok()),
            text_color: row.text_color.as_deref().and_then(|c| HexColor::parse(c).ok()),
            blog_enabled: row.blog_enabled,
            base_path: String::new(),
        };

        Self {
            user_id: UserId::new(row.id),
            username: row.username,
            chrome,
            blog_style: BlogStyle::parse_or_default(&row.blog_layout_style),
            blog_show_search: row.blog_show_search,
        }
    }
}

/// Repository for tenant lookups.
pub struct TenantRepository<'a> {
    pool: &'a PgPool,
}

const TENANT_COLUMNS: &str = "u.id, u.username, s.layout, s.theme, s.font_family, \
     s.accent_color, s.background_color, s.text_color, s.header_text, s.footer_text, \
     s.blog_enabled, s.blog_layout_style, s.blog_show_search";

impl<'a> TenantRepository<'a> {
    /// Create a new tenant repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Resolve a tenant by username (subdomain label).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_username(
        &self,
        username: &str,
    ) -> Result<Option<TenantSite>, RepositoryError> {
        let sql = format!(
            "SELECT {TENANT_COLUMNS}
             FROM users u
             JOIN site_settings s ON s.user_id = u.id
             WHERE u.username = $1"
        );
        let row = sqlx::query_as::<_, TenantRow>(&sql)
            .bind(username)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(TenantSite::from_row))
    }

    /// Resolve a tenant by an exact custom-domain match.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_custom_domain(
        &self,
        domain: &str,
    ) -> Result<Option<TenantSite>, RepositoryError> {
        let sql = format!(
            "SELECT {TENANT_COLUMNS}
             FROM users u
             JOIN site_settings s ON s.user_id = u.id
             WHERE s.custom_domain = $1"
        );
        let row = sqlx::query_as::<_, TenantRow>(&sql)
            .bind(domain)
            .fetch_optional(self.pool)
            .await?;

        Ok(row.map(TenantSite::from_row))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row() -> TenantRow {
        TenantRow {
            id: 1,
            username: "ada".to_owned(),
            layout: "portfolio-grid".to_owned(),
            theme: "midnight".to_owned(),
            font_family: "serif".to_owned(),
            accent_color: Some("#ff0000".to_owned()),
            background_color: Some("not-a-color".to_owned()),
            text_color: None,
            header_text: Some("Ada".to_owned()),
            footer_text: None,
            blog_enabled: true,
            blog_layout_style: "cards".to_owned(),
            blog_show_search: false,
        }
    }

    #[test]
    fn test_from_row_parses_appearance() {
        let site = TenantSite::from_row(row());
        assert_eq!(site.user_id, UserId::new(1));
        assert_eq!(site.chrome.layout, LayoutId::PortfolioGrid);
        assert_eq!(site.chrome.theme, ThemeId::Midnight);
        assert_eq!(site.chrome.font, FontFamily::Serif);
        assert_eq!(site.blog_style, BlogStyle::Cards);
        assert!(site.chrome.accent_color.is_some());
        // Unparseable stored color falls back to the theme preset
        assert!(site.chrome.background_color.is_none());
    }

    #[test]
    fn test_from_row_defaults_unknown_names() {
        let mut r = row();
        r.layout = "three-column-mega".to_owned();
        r.theme = "neon".to_owned();
        r.blog_layout_style = "spiral".to_owned();
        let site = TenantSite::from_row(r);
        assert_eq!(site.chrome.layout, LayoutId::PersonalBlog);
        assert_eq!(site.chrome.theme, ThemeId::Classic);
        assert_eq!(site.blog_style, BlogStyle::Stacked);
    }
}
