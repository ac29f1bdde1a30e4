//! Page and content-block repository.
//!
//! Every statement is scoped to the owning user, so a handler can never
//! touch another tenant's pages by id. The single-home-page rule is a
//! partial unique index plus a clear-then-set transaction.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use minispace_core::{BlockId, PageId, UserId};

use super::RepositoryError;
use crate::models::{ContentBlock, Page};

#[derive(Debug, sqlx::FromRow)]
struct PageRow {
    id: i32,
    user_id: i32,
    title: String,
    slug: String,
    is_home: bool,
    layout: Option<String>,
    seo_description: Option<String>,
    canonical_url: Option<String>,
    alias: Option<String>,
    language: Option<String>,
    tags: Vec<String>,
    discoverable: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PageRow> for Page {
    fn from(row: PageRow) -> Self {
        Self {
            id: PageId::new(row.id),
            user_id: UserId::new(row.user_id),
            title: row.title,
            slug: row.slug,
            is_home: row.is_home,
            layout: row.layout,
            seo_description: row.seo_description,
            canonical_url: row.canonical_url,
            alias: row.alias,
            language: row.language,
            tags: row.tags,
            discoverable: row.discoverable,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct BlockRow {
    id: i32,
    page_id: i32,
    position: i32,
    kind: String,
    body: String,
}

impl From<BlockRow> for ContentBlock {
    fn from(row: BlockRow) -> Self {
        Self {
            id: BlockId::new(row.id),
            page_id: PageId::new(row.page_id),
            position: row.position,
            kind: row.kind,
            body: row.body,
        }
    }
}

/// Validated page fields for create/update.
#[derive(Debug, Clone)]
pub struct PageInput {
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
}

const PAGE_COLUMNS: &str = "id, user_id, title, slug, is_home, layout, seo_description, \
     canonical_url, alias, language, tags, discoverable, created_at, updated_at";

const SLUG_CONFLICT: &str = "a page with this slug already exists";

/// Direction for block reordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Repository for page database operations.
pub struct PageRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> PageRepository<'a> {
    /// Create a new page repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// List all of a user's pages, home first, then by title.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Page>, RepositoryError> {
        let sql = format!(
            "SELECT {PAGE_COLUMNS} FROM pages WHERE user_id = $1
             ORDER BY is_home DESC, title ASC"
        );
        let rows = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .fetch_all(self.pool)
            .await?;
        Ok(rows.into_iter().map(Page::from).collect())
    }

    /// Count a user's pages.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count_for_user(&self, user_id: UserId) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM pages WHERE user_id = $1")
            .bind(user_id.as_i32())
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Get one of the user's pages by id.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(
        &self,
        user_id: UserId,
        page_id: PageId,
    ) -> Result<Option<Page>, RepositoryError> {
        let sql = format!("SELECT {PAGE_COLUMNS} FROM pages WHERE id = $1 AND user_id = $2");
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(page_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        Ok(row.map(Page::from))
    }

    /// Create a page. When `is_home` is set, the previous home page is
    /// unset in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` on a slug collision,
    /// `RepositoryError::Database` for other failures.
    pub async fn create(
        &self,
        user_id: UserId,
        input: &PageInput,
    ) -> Result<Page, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_home {
            clear_home(&mut tx, user_id).await?;
        }

        let sql = format!(
            "INSERT INTO pages (user_id, title, slug, is_home, layout, seo_description,
                                canonical_url, alias, language, tags, discoverable)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
             RETURNING {PAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(user_id.as_i32())
            .bind(&input.title)
            .bind(&input.slug)
            .bind(input.is_home)
            .bind(input.layout.as_deref())
            .bind(input.seo_description.as_deref())
            .bind(input.canonical_url.as_deref())
            .bind(input.alias.as_deref())
            .bind(input.language.as_deref())
            .bind(&input.tags)
            .bind(input.discoverable)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_unique(e, SLUG_CONFLICT))?;

        tx.commit().await?;

        Ok(Page::from(row))
    }

    /// Update a page. When `is_home` is set, the previous home page is
    /// unset in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the page doesn't exist or
    /// isn't the user's, `RepositoryError::Conflict` on a slug collision,
    /// `RepositoryError::Database` for other failures.
    pub async fn update(
        &self,
        user_id: UserId,
        page_id: PageId,
        input: &PageInput,
    ) -> Result<Page, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        if input.is_home {
            clear_home_except(&mut tx, user_id, page_id).await?;
        }

        let sql = format!(
            "UPDATE pages SET
                 title = $1, slug = $2, is_home = $3, layout = $4,
                 seo_description = $5, canonical_url = $6, alias = $7,
                 language = $8, tags = $9, discoverable = $10, updated_at = NOW()
             WHERE id = $11 AND user_id = $12
             RETURNING {PAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, PageRow>(&sql)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(input.is_home)
            .bind(input.layout.as_deref())
            .bind(input.seo_description.as_deref())
            .bind(input.canonical_url.as_deref())
            .bind(input.alias.as_deref())
            .bind(input.language.as_deref())
            .bind(&input.tags)
            .bind(input.discoverable)
            .bind(page_id.as_i32())
            .bind(user_id.as_i32())
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| RepositoryError::from_unique(e, SLUG_CONFLICT))?
            .ok_or(RepositoryError::NotFound)?;

        tx.commit().await?;

        Ok(Page::from(row))
    }

    /// Make a page the home page, unsetting the previous one atomically.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the page doesn't exist or
    /// isn't the user's, `RepositoryError::Database` for other failures.
    pub async fn set_home(&self, user_id: UserId, page_id: PageId) -> Result<(), RepositoryError> {
        let mut tx = self.pool.begin().await?;

        clear_home_except(&mut tx, user_id, page_id).await?;

        let result = sqlx::query(
            "UPDATE pages SET is_home = TRUE, updated_at = NOW()
             WHERE id = $1 AND user_id = $2",
        )
        .bind(page_id.as_i32())
        .bind(user_id.as_i32())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        tx.commit().await?;

        Ok(())
    }

    /// Delete a page (content blocks cascade).
    ///
    /// # Returns
    ///
    /// Returns `true` if the page was deleted, `false` if it didn't exist.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn delete(&self, user_id: UserId, page_id: PageId) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM pages WHERE id = $1 AND user_id = $2")
            .bind(page_id.as_i32())
            .bind(user_id.as_i32())
            .execute(self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    // =========================================================================
    // Content Blocks
    // =========================================================================

    /// List a page's content blocks in render order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_blocks(
        &self,
        user_id: UserId,
        page_id: PageId,
    ) -> Result<Vec<ContentBlock>, RepositoryError> {
        let rows = sqlx::query_as::<_, BlockRow>(
            "SELECT b.id, b.page_id, b.position, b.kind, b.body
             FROM content_blocks b
             JOIN pages p ON p.id = b.page_id
             WHERE b.page_id = $1 AND p.user_id = $2
             ORDER BY b.position ASC",
        )
        .bind(page_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_all(self.pool)
        .await?;
        Ok(rows.into_iter().map(ContentBlock::from).collect())
    }

    /// Append a content block to a page.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the page doesn't exist or
    /// isn't the user's, `RepositoryError::Database` for other failures.
    pub async fn create_block(
        &self,
        user_id: UserId,
        page_id: PageId,
        kind: &str,
        body: &str,
    ) -> Result<ContentBlock, RepositoryError> {
        // Ownership check and position assignment in one statement: the
        // insert only happens when the page belongs to the user.
        let row = sqlx::query_as::<_, BlockRow>(
            "INSERT INTO content_blocks (page_id, position, kind, body)
             SELECT p.id,
                    COALESCE((SELECT MAX(position) + 1 FROM content_blocks WHERE page_id = p.id), 0),
                    $3, $4
             FROM pages p
             WHERE p.id = $1 AND p.user_id = $2
             RETURNING id, page_id, position, kind, body",
        )
        .bind(page_id.as_i32())
        .bind(user_id.as_i32())
        .bind(kind)
        .bind(body)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ContentBlock::from(row))
    }

    /// Update a content block's kind and body.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the block doesn't exist or
    /// belongs to another user's page, `RepositoryError::Database` for
    /// other failures.
    pub async fn update_block(
        &self,
        user_id: UserId,
        block_id: BlockId,
        kind: &str,
        body: &str,
    ) -> Result<ContentBlock, RepositoryError> {
        let row = sqlx::query_as::<_, BlockRow>(
            "UPDATE content_blocks b SET kind = $3, body = $4, updated_at = NOW()
             FROM pages p
             WHERE b.id = $1 AND b.page_id = p.id AND p.user_id = $2
             RETURNING b.id, b.page_id, b.position, b.kind, b.body",
        )
        .bind(block_id.as_i32())
        .bind(user_id.as_i32())
        .bind(kind)
        .bind(body)
        .fetch_optional(self.pool)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        Ok(ContentBlock::from(row))
    }

    /// Delete a content block.
    ///
    /// # Returns
    ///
    /// The page the block belonged to, for redirecting back to its editor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the block doesn't exist or
    /// belongs to another user's page, `RepositoryError::Database` for
    /// other failures.
    pub async fn delete_block(
        &self,
        user_id: UserId,
        block_id: BlockId,
    ) -> Result<PageId, RepositoryError> {
        let page_id: Option<i32> = sqlx::query_scalar(
            "DELETE FROM content_blocks b
             USING pages p
             WHERE b.id = $1 AND b.page_id = p.id AND p.user_id = $2
             RETURNING b.page_id",
        )
        .bind(block_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(self.pool)
        .await?;

        page_id.map(PageId::new).ok_or(RepositoryError::NotFound)
    }

    /// Swap a block with its neighbor in the given direction.
    ///
    /// Moving the first block up (or the last down) is a no-op.
    ///
    /// # Returns
    ///
    /// The page the block belongs to, for redirecting back to its editor.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the block doesn't exist or
    /// belongs to another user's page, `RepositoryError::Database` for
    /// other failures.
    pub async fn move_block(
        &self,
        user_id: UserId,
        block_id: BlockId,
        direction: MoveDirection,
    ) -> Result<PageId, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let block = sqlx::query_as::<_, BlockRow>(
            "SELECT b.id, b.page_id, b.position, b.kind, b.body
             FROM content_blocks b
             JOIN pages p ON p.id = b.page_id
             WHERE b.id = $1 AND p.user_id = $2
             FOR UPDATE OF b",
        )
        .bind(block_id.as_i32())
        .bind(user_id.as_i32())
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(RepositoryError::NotFound)?;

        let neighbor_sql = match direction {
            MoveDirection::Up => {
                "SELECT id, page_id, position, kind, body FROM content_blocks
                 WHERE page_id = $1 AND position < $2
                 ORDER BY position DESC LIMIT 1 FOR UPDATE"
            }
            MoveDirection::Down => {
                "SELECT id, page_id, position, kind, body FROM content_blocks
                 WHERE page_id = $1 AND position > $2
                 ORDER BY position ASC LIMIT 1 FOR UPDATE"
            }
        };
        let neighbor = sqlx::query_as::<_, BlockRow>(neighbor_sql)
            .bind(block.page_id)
            .bind(block.position)
            .fetch_optional(&mut *tx)
            .await?;

        if let Some(neighbor) = neighbor {
            swap_positions(&mut tx, block.id, block.position, neighbor.id, neighbor.position)
                .await?;
        }

        tx.commit().await?;

        Ok(PageId::new(block.page_id))
    }
}

async fn clear_home(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE pages SET is_home = FALSE, updated_at = NOW() WHERE user_id = $1 AND is_home")
        .bind(user_id.as_i32())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn clear_home_except(
    tx: &mut Transaction<'_, Postgres>,
    user_id: UserId,
    keep: PageId,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE pages SET is_home = FALSE, updated_at = NOW()
         WHERE user_id = $1 AND is_home AND id <> $2",
    )
    .bind(user_id.as_i32())
    .bind(keep.as_i32())
    .execute(&mut **tx)
    .await?;
    Ok(())
}

async fn swap_positions(
    tx: &mut Transaction<'_, Postgres>,
    first_id: i32,
    first_position: i32,
    second_id: i32,
    second_position: i32,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE content_blocks SET position = $1, updated_at = NOW() WHERE id = $2")
        .bind(second_position)
        .bind(first_id)
        .execute(&mut **tx)
        .await?;
    sqlx::query("UPDATE content_blocks SET position = $1, updated_at = NOW() WHERE id = $2")
        .bind(first_position)
        .bind(second_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}
