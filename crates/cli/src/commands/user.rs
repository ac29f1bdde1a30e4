//! User management commands.

use minispace_dashboard::services::auth::AuthService;

use super::CommandError;

/// Create a user account with their default site settings.
///
/// # Errors
///
/// Returns an error if the input fails validation, the username or email
/// is taken, or the database is unreachable.
pub async fn create(username: &str, email: &str, password: &str) -> Result<(), CommandError> {
    let pool = super::connect().await?;

    let auth = AuthService::new(&pool);
    let user = auth.signup(username, email, password).await?;

    tracing::info!(
        "Created user {} (id {}) with site {}",
        user.username,
        user.id,
        user.username
    );

    Ok(())
}
