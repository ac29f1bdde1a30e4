//! Dashboard overview route.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;
use chrono::{DateTime, Utc};
use tracing::instrument;

use crate::db::pages::PageRepository;
use crate::db::posts::PostRepository;
use crate::error::Result;
use crate::filters;
use crate::middleware::RequireAuth;
use crate::models::Post;
use crate::state::AppState;

/// How many posts the overview shows.
const RECENT_POSTS_COUNT: usize = 5;

/// Post row for overview and list templates.
#[derive(Debug, Clone)]
pub struct PostView {
    pub id: i32,
    pub title: String,
    pub slug: String,
    pub published: bool,
    pub published_at: Option<DateTime<Utc>>,
    pub read_count: i64,
}

impl From<&Post> for PostView {
    fn from(post: &Post) -> Self {
        Self {
            id: post.id.as_i32(),
            title: post.title.clone(),
            slug: post.slug.clone(),
            published: post.published,
            published_at: post.published_at,
            read_count: post.read_count,
        }
    }
}

/// Overview page template.
#[derive(Template, WebTemplate)]
#[template(path = "dashboard/index.html")]
pub struct OverviewTemplate {
    pub username: String,
    pub site_url: String,
    pub current_path: String,
    pub page_count: i64,
    pub post_count: i64,
    pub published_count: i64,
    pub recent_posts: Vec<PostView>,
}

/// Render the overview page.
///
/// GET /
#[instrument(skip(state, user), fields(user = %user.0.username))]
pub async fn overview(
    State(state): State<AppState>,
    user: RequireAuth,
) -> Result<OverviewTemplate> {
    let RequireAuth(user) = user;

    let page_count = PageRepository::new(state.pool())
        .count_for_user(user.id)
        .await?;
    let posts_repo = PostRepository::new(state.pool());
    let (post_count, published_count) = posts_repo.count_for_user(user.id).await?;
    let recent_posts: Vec<PostView> = posts_repo
        .list_for_user(user.id)
        .await?
        .iter()
        .take(RECENT_POSTS_COUNT)
        .map(PostView::from)
        .collect();

    Ok(OverviewTemplate {
        site_url: state.config().tenant_site_url(user.username.as_str()),
        username: user.username.into_inner(),
        current_path: "/".to_owned(),
        page_count,
        post_count,
        published_count,
        recent_posts,
    })
}
