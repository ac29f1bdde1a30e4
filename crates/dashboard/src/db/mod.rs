//! Database operations for the dashboard.
//!
//! The dashboard owns the schema: users and passwords, site settings, pages
//! with their content blocks, and posts. Migrations live in this crate's
//! `migrations/` directory and run via the CLI:
//!
//! ```bash
//! cargo run -p minispace-cli -- migrate
//! ```
//!
//! Queries use the runtime `query_as` API with `FromRow` row structs so the
//! workspace builds without a live database. Uniqueness rules (username,
//! email, per-user slugs, single home page) are database constraints;
//! violations surface as [`RepositoryError::Conflict`].

pub mod pages;
pub mod posts;
pub mod settings;
pub mod users;

use std::time::Duration;

use secrecy::ExposeSecret;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

/// Errors surfaced by the repository layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    /// Underlying database error.
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// The requested row does not exist (or belongs to someone else).
    #[error("not found")]
    NotFound,

    /// A uniqueness constraint rejected the write.
    #[error("conflict: {0}")]
    Conflict(String),

    /// A stored value no longer parses into its domain type.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

impl From<sqlx::Error> for RepositoryError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e)
    }
}

impl RepositoryError {
    /// Map a sqlx error, turning unique violations into a `Conflict` with
    /// the given message.
    pub(crate) fn from_unique(e: sqlx::Error, conflict_message: &str) -> Self {
        if let sqlx::Error::Database(ref db_err) = e
            && db_err.is_unique_violation()
        {
            return Self::Conflict(conflict_message.to_owned());
        }
        Self::Database(e)
    }
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}
