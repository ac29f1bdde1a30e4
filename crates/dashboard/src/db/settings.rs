//! Site settings database operations.
//!
//! One settings row per user, created at signup. Appearance and blog
//! settings are updated as two separate forms, so they are two separate
//! statements here.

use sqlx::PgPool;

use minispace_core::UserId;

use super::RepositoryError;

/// A tenant's site settings row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct SiteSettings {
    pub user_id: i32,
    pub layout: String,
    pub theme: String,
    pub font_family: String,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub custom_domain: Option<String>,
    pub blog_enabled: bool,
    pub blog_layout_style: String,
    pub blog_show_search: bool,
}

/// Appearance settings update.
#[derive(Debug, Clone)]
pub struct AppearanceUpdate {
    pub layout: String,
    pub theme: String,
    pub font_family: String,
    pub accent_color: Option<String>,
    pub background_color: Option<String>,
    pub text_color: Option<String>,
    pub header_text: Option<String>,
    pub footer_text: Option<String>,
    pub custom_domain: Option<String>,
}

const SETTINGS_COLUMNS: &str = "user_id, layout, theme, font_family, accent_color, \
     background_color, text_color, header_text, footer_text, custom_domain, \
     blog_enabled, blog_layout_style, blog_show_search";

/// Repository for site settings.
pub struct SettingsRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> SettingsRepository<'a> {
    /// Create a new settings repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user's settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the settings row is missing
    /// (which would mean a half-created account), `RepositoryError::Database`
    /// if the query fails.
    pub async fn get(&self, user_id: UserId) -> Result<SiteSettings, RepositoryError> {
        let sql = format!("SELECT {SETTINGS_COLUMNS} FROM site_settings WHERE user_id = $1");
        sqlx::query_as::<_, SiteSettings>(&sql)
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    /// Update a user's appearance settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the custom domain is already
    /// claimed, `RepositoryError::NotFound` if the settings row is missing,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_appearance(
        &self,
        user_id: UserId,
        update: &AppearanceUpdate,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE site_settings SET
                 layout = $1, theme = $2, font_family = $3,
                 accent_color = $4, background_color = $5, text_color = $6,
                 header_text = $7, footer_text = $8, custom_domain = $9,
                 updated_at = NOW()
             WHERE user_id = $10",
        )
        .bind(&update.layout)
        .bind(&update.theme)
        .bind(&update.font_family)
        .bind(update.accent_color.as_deref())
        .bind(update.background_color.as_deref())
        .bind(update.text_color.as_deref())
        .bind(update.header_text.as_deref())
        .bind(update.footer_text.as_deref())
        .bind(update.custom_domain.as_deref())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await
        .map_err(|e| RepositoryError::from_unique(e, "custom domain already in use"))?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Update a user's blog settings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the settings row is missing,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_blog(
        &self,
        user_id: UserId,
        enabled: bool,
        layout_style: &str,
        show_search: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE site_settings SET
                 blog_enabled = $1, blog_layout_style = $2, blog_show_search = $3,
                 updated_at = NOW()
             WHERE user_id = $4",
        )
        .bind(enabled)
        .bind(layout_style)
        .bind(show_search)
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
