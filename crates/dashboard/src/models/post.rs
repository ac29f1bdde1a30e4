//! Blog post model.

use chrono::{DateTime, Utc};

use minispace_core::{PostId, UserId};

/// A blog post, draft or published.
#[derive(Debug, Clone)]
pub struct Post {
    /// Database ID.
    pub id: PostId,
    /// Owning user.
    pub user_id: UserId,
    /// Post title.
    pub title: String,
    /// URL slug, unique per user.
    pub slug: String,
    /// Short summary shown on index pages (at most 150 characters).
    pub excerpt: String,
    /// Markdown body.
    pub body: String,
    /// Post tags (at most three).
    pub tags: Vec<String>,
    /// Whether the post is visible on the public site.
    pub published: bool,
    /// First publish time; survives unpublish/republish cycles.
    pub published_at: Option<DateTime<Utc>>,
    /// Whether the post may appear in the platform discover feed.
    pub discoverable: bool,
    /// Public view counter, incremented best-effort by the site.
    pub read_count: i64,
    /// When the post was created.
    pub created_at: DateTime<Utc>,
    /// Last post update.
    pub updated_at: DateTime<Utc>,
}
