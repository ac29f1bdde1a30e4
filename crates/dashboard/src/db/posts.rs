//! Post repository.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minispace_core::{PostId, UserId};

use super::RepositoryError;
use crate::models::Post;

#[derive(Debug, sqlx::FromRow)]
struct PostRow {
    id: i32,
    user_id: i32,
    title: String,
    slug: String,
    excerpt: String,
    body: String,
    tags: Vec<String>,
    published: bool,
    published_at: Option<DateTime<Utc>>,
    discoverable: bool,
    read_count: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PostRow> for Post {
    fn from(row: PostRow) -> Self {
        Self {
            id: PostId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            slug: row.slug,
            excerpt: row.excerpt,
            body: row.body,
            tags: row.tags,
            published: row.published,
            published_at: row.published_at,
            discoverable: row.discoverable,
            read_count: row.read_count,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Validated post fields for create/update.
#[derive(Debug, Clone)]
pub struct PostInput {
    pub title: String,
    pub slug: String,
    pub excerpt: String,
    pub body: String,
    pub tags: Vec<String>,
    pub discoverable: bool,
}

const POST_COLUMNS: &str = "id, user_id, title, slug, excerpt, body, tags, published, \
     published_at, discoverable, read_count, created_at, updated_at";

const SLUG_CONFLICT: &str = "a post with this slug already exists";

/// Repository for post database operations.
pub struct PostRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PostRepository<'a> {
    /// Create a new post repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all of a user's posts, most recently updated first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Post>, RepositoryError> {
        let sql = format!(
            "SELECT {POST_COLUMNS} FROM posts WHERE user_id = $1
             ORDER BY updated_at DESC"
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Post::from).collect())
    }

    /// Count a user's posts: `(total, published)`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<(i64, i64), RepositoryError> {
        let row: (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE published)
             FROM posts WHERE user_id = $1",
        )
        .bind(user_id.as_i32())
        .fetch_one(self.pool)
        .await?;
        Ok(row)
    }

    /// Get one of the user's posts by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        post_id: PostId,
    ) -> Result<Option<Post>, RepositoryError> {
        let sql = format!("SELECT {POST_COLUMNS} FROM posts WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Post::from))
    }

    /// Create a draft post.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a slug collision,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &PostInput,
    ) -> Result<Post, RepositoryError> {
        let sql = format!(
            "INSERT INTO posts (user_id, title, slug, excerpt, body, tags, discoverable)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(user_id.as_i32())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.body)
            .bind(&input.tags)
            .bind(input.discoverable)
            .fetch_one(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique(e, SLUG_CONFLICT))?;

        Ok(Post::from(row))
    }

    /// Update a post's editable fields.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist or
    /// isn't the user's, `RepositoryError::Conflict` on a slug collision,
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        user_id: UserId,
        post_id: PostId,
        input: &PostInput,
    ) -> Result<Post, RepositoryError> {
        let sql = format!(
            "UPDATE posts SET
                 title = $1, slug = $2, excerpt = $3, body = $4, tags = $5,
                 discoverable = $6, updated_at = NOW()
             WHERE id = $7 AND user_id = $8
             RETURNING {POST_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.body)
            .bind(&input.tags)
            .bind(input.discoverable)
            .bind(post_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await
            .map_err(|e| RepositoryError::from_unique(e, SLUG_CONFLICT))?
            .ok_or(RepositoryError::NotFound)?;

        Ok(Post::from(row))
    }

    /// Publish or unpublish a post.
    ///
    /// Publishing stamps `published_at` once; it survives later
    /// unpublish/republish cycles so the post keeps its place in listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the post doesn't exist or
    /// isn't the user's, `RepositoryError::Database` for other failures.
    pub async fn set_published(
        &self,
        user_id: UserId,
        post_id: PostId,
        published: bool,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE posts SET
                 published = $1,
                 published_at = CASE WHEN $1 THEN COALESCE(published_at, NOW())
                                     ELSE published_at END,
                 updated_at = NOW()
             WHERE id = $2 AND user_id = $3",
        )
        .bind(published)
        .bind(post_id.as_i32())
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete a post.
    ///
    /// # Returns
    ///
    /// Returns `true` if the post was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, user_id: UserId, post_id: PostId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1 AND user_id = $2")
            .bind(post_id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
