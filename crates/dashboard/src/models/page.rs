//! Page and content-block models.

use chrono::{DateTime, Utc};

use minispace_core::{BlockId, PageId, UserId};

/// A static page on a tenant's site.
#[derive(Debug, Clone)]
pub struct Page {
    /// Database ID.
    pub id: PageId,
    /// Owning user.
    pub user_id: UserId,
    /// Page title.
    pub title: String,
    /// URL slug, unique per user.
    pub slug: String,
    /// Whether this page is the site's home page. At most one page per
    /// user carries this flag; the toggle is transactional.
    pub is_home: bool,
    /// Optional per-page layout override.
    pub layout: Option<String>,
    /// Meta description for SEO.
    pub seo_description: Option<String>,
    /// Canonical URL override.
    pub canonical_url: Option<String>,
    /// Alternate slug that permanently redirects to this page.
    pub alias: Option<String>,
    /// Content language (BCP 47 tag).
    pub language: Option<String>,
    /// Free-form tags.
    pub tags: Vec<String>,
    /// Whether the page may appear in platform-wide listings.
    pub discoverable: bool,
    /// When the page was created.
    pub created_at: DateTime<Utc>,
    /// Last page update.
    pub updated_at: DateTime<Utc>,
}

/// One ordered unit of page content.
#[derive(Debug, Clone)]
pub struct ContentBlock {
    /// Database ID.
    pub id: BlockId,
    /// Owning page.
    pub page_id: PageId,
    /// Render order within the page, starting at 0.
    pub position: i32,
    /// Block kind: `markdown` or `html`.
    pub kind: String,
    /// Raw block body.
    pub body: String,
}
