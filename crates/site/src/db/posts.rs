//! Read-side post queries: published listings, search, and the discover
//! feed.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minispace_core::{PostId, UserId};

use super::RepositoryError;
use crate::pagination::Cursor;

/// A published post row.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct PostRow {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: Vec<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub read_count: i64,
}

impl PostRow {
    /// The post id as a typed id.
    #[must_use]
    pub const fn post_id(&self) -> PostId {
        PostId::new(self.id)
    }
}

/// A discover-feed row: a published post joined with its author.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct DiscoverRow {
    pub id: i32,
    pub username: String,
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub published_at: Option<DateTime<Utc>>,
}

const POST_COLUMNS: &str =
    "id, user_id, title, slug, excerpt, body, tags, published_at, read_count";

/// Repository for public post reads.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List a tenant's published posts, newest first, from an optional
    /// cursor. Fetches `limit + 1` rows so the caller can detect whether a
    /// next page exists.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_published(
        &self,
        user_id: UserId,
        cursor: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<PostRow>, RepositoryError> {
        let rows = match cursor {
            Some(c) => {
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts
                     WHERE user_id = $1 AND published
                       AND (published_at, id) < ($2, $3)
                     ORDER BY published_at DESC, id DESC
                     LIMIT $4"
                );
                sqlx::query_as::<_, PostRow>(&sql)
                    .bind(user_id.as_i32())
                    .bind(c.published_at)
                    .bind(c.id)
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts
                     WHERE user_id = $1 AND published
                     ORDER BY published_at DESC, id DESC
                     LIMIT $2"
                );
                sqlx::query_as::<_, PostRow>(&sql)
                    .bind(user_id.as_i32())
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Case-insensitive title/excerpt search over a tenant's published
    /// posts, with the same cursor semantics as [`Self::list_published`].
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn search_published(
        &self,
        user_id: UserId,
        query: &str,
        cursor: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<PostRow>, RepositoryError> {
        let pattern = format!("%{}%", escape_like(query));
        let rows = match cursor {
            Some(c) => {
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts
                     WHERE user_id = $1 AND published
                       AND (title ILIKE $2 OR excerpt ILIKE $2)
                       AND (published_at, id) < ($3, $4)
                     ORDER BY published_at DESC, id DESC
                     LIMIT $5"
                );
                sqlx::query_as::<_, PostRow>(&sql)
                    .bind(user_id.as_i32())
                    .bind(&pattern)
                    .bind(c.published_at)
                    .bind(c.id)
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {POST_COLUMNS} FROM posts
                     WHERE user_id = $1 AND published
                       AND (title ILIKE $2 OR excerpt ILIKE $2)
                     ORDER BY published_at DESC, id DESC
                     LIMIT $3"
                );
                sqlx::query_as::<_, PostRow>(&sql)
                    .bind(user_id.as_i32())
                    .bind(&pattern)
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
        };
        Ok(rows)
    }

    /// Get a single published post by slug.
    ///
    /// Drafts are invisible here by construction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get_published_by_slug(
        &self,
        user_id: UserId,
        slug: &str,
    ) -> Result<Option<PostRow>, RepositoryError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts
             WHERE user_id = $1 AND slug = $2 AND published"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(user_id.as_i32())
            .bind(slug)
            .fetch_optional(self.pool)
            .await?;
        Ok(row)
    }

    /// Increment a post's read count.
    ///
    /// Callers treat this as best-effort; a lost increment is acceptable.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn increment_read_count(&self, post_id: PostId) -> Result<(), RepositoryError> {
        sqlx::query("UPDATE posts SET read_count = read_count + 1 WHERE id = $1")
            .bind(post_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(())
    }

    /// List published posts from tenants who opted into discovery, newest
    /// first, with the usual `limit + 1` cursor semantics.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_discoverable(
        &self,
        cursor: Option<Cursor>,
        limit: i64,
    ) -> Result<Vec<DiscoverRow>, RepositoryError> {
        const DISCOVER_COLUMNS: &str =
            "p.id, u.username, p.title, p.slug, p.excerpt, p.published_at";
        let rows = match cursor {
            Some(c) => {
                let sql = format!(
                    "SELECT {DISCOVER_COLUMNS} FROM posts p
                     JOIN users u ON u.id = p.user_id
                     JOIN site_settings s ON s.user_id = p.user_id
                     WHERE p.published AND p.discoverable AND s.blog_enabled
                       AND (p.published_at, p.id) < ($1, $2)
                     ORDER BY p.published_at DESC, p.id DESC
                     LIMIT $3"
                );
                sqlx::query_as::<_, DiscoverRow>(&sql)
                    .bind(c.published_at)
                    .bind(c.id)
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
            None => {
                let sql = format!(
                    "SELECT {DISCOVER_COLUMNS} FROM posts p
                     JOIN users u ON u.id = p.user_id
                     JOIN site_settings s ON s.user_id = p.user_id
                     WHERE p.published AND p.discoverable AND s.blog_enabled
                     ORDER BY p.published_at DESC, p.id DESC
                     LIMIT $1"
                );
                sqlx::query_as::<_, DiscoverRow>(&sql)
                    .bind(limit + 1)
                    .fetch_all(self.pool)
                    .await?
            }
        };
        Ok(rows)
    }
}

/// Escape `%`, `_` and `\` so user input can't act as LIKE syntax.
fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("50%_off\\"), "50\\%\\_off\\\\");
    }
}
