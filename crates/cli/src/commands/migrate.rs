//! Database migration command.
//!
//! Migrations are embedded from `crates/dashboard/migrations/` at compile
//! time; the dashboard crate owns the schema.

use super::CommandError;

/// Run the database migrations.
///
/// # Errors
///
/// Returns an error if the database is unreachable or a migration fails.
pub async fn run() -> Result<(), CommandError> {
    let pool = super::connect().await?;

    tracing::info!("Running migrations...");
    sqlx::migrate!("../dashboard/migrations").run(&pool).await?;
    tracing::info!("Migrations complete");

    Ok(())
}
