//! Read-side page and content-block queries.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minispace_core::{PageId, UserId};

use super::RepositoryError;

/// A page row as stored.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PageRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub slug: String,
    pub is_home: bool,
    pub layout: Option<String>,
    pub seo_description: Option<String>,
    pub canonical_url: Option<String>,
    pub alias: Option<String>,
    pub language: Option<String>,
    pub tags: Vec<String>,
    pub discoverable: bool,
    pub updated_at: DateTime<Utc>,
}

impl PageRow {
    /// The page id as a typed id.
    #[must_use]
    pub const fn page_id(&self) -> PageId {
        PageId::new(self.id)
    }
}

/// A content block row, ordered within its page.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BlockRow {
    pub id: i32,
    pub page_id: i32,
    pub position: i32,
    pub kind: String,
    pub body: String,
}

const PAGE_COLUMNS: &str = "id, user_id, title, slug, is_home, layout, seo_description, \
     canonical_url, alias, language, tags, discoverable, updated_at";

/// Repository for public page reads.
pub struct PageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PageRepository<'a> {
    /// Create a new page repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get the tenant's home page, if one is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_home(&self, user_id: UserId) -> Result<Option<PageRow>, RepositoryError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE user_id = $1 AND is_home");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Get a page by its slug.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_slug(
        &self,
        user_id: UserId,
        slug: &str,
    ) -> Result<Option<PageRow>, RepositoryError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE user_id = $1 AND slug = $2");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Get a page by its alias (an alternate slug that redirects to the
    /// canonical one).
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_by_alias(
        &self,
        user_id: UserId,
        alias: &str,
    ) -> Result<Option<PageRow>, RepositoryError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE user_id = $1 AND alias = $2");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .bind(alias)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// List all of a tenant's pages, home first, then by title.
    ///
    /// Used for the generated profile page when no home page is set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<PageRow>, RepositoryError> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE user_id = $1
             ORDER BY is_home DESC, title ASC"
        );
        let rows = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;
        Ok(rows)
    }

    /// List a page's content blocks in render order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_blocks(&self, page_id: PageId) -> Result<Vec<BlockRow>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlockRow>(
            "SELECT id, page_id, position, kind, body FROM content_blocks
             WHERE page_id = $1 ORDER BY position ASC",
        )
        .bind(page_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows)
    }
}
