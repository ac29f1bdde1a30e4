//! Application state shared across handlers.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::SiteConfig;
use crate::db::tenants::TenantSite;

/// How long resolved tenants stay cached per host.
const TENANT_CACHE_TTL: Duration = Duration::from_secs(60);

/// Upper bound on cached hosts.
const TENANT_CACHE_CAPACITY: u64 = 10_000;

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// shared resources like the database pool and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: SiteConfig,
    pool: PgPool,
    /// Tenant lookups keyed by normalized host. Negative results are cached
    /// too, so unknown-host traffic doesn't hammer the database.
    tenants: Cache<String, Option<Arc<TenantSite>>>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(config: SiteConfig, pool: PgPool) -> Self {
        let tenants = Cache::builder()
            .max_capacity(TENANT_CACHE_CAPACITY)
            .time_to_live(TENANT_CACHE_TTL)
            .build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                tenants,
            }),
        }
    }

    /// Get a reference to the site configuration.
    #[must_use]
    pub fn config(&self) -> &SiteConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the tenant cache.
    #[must_use]
    pub fn tenants(&self) -> &Cache<String, Option<Arc<TenantSite>>> {
        &self.inner.tenants
    }
}
