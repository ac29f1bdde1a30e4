//! User repository for database operations.
//!
//! Signup is a single transaction: the user row, their password hash, and a
//! default settings row are created together, so a half-registered account
//! can't exist. Username and email uniqueness are database constraints.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use minispace_core::{Email, UserId, Username};

use super::RepositoryError;
use crate::models::User;

/// Default appearance values for a fresh account.
const DEFAULT_LAYOUT: &str = "personal-blog";
const DEFAULT_THEME: &str = "classic";
const DEFAULT_FONT: &str = "sans";

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: i32,
    username: String,
    email: String,
    display_name: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> Result<User, RepositoryError> {
        let username = Username::parse(&self.username).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid username in database: {e}"))
        })?;
        let email = Email::parse(&self.email).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid email in database: {e}"))
        })?;
        Ok(User {
            id: UserId::new(self.id),
            username,
            email,
            display_name: self.display_name,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

const USER_COLUMNS: &str = "id, username, email, display_name, created_at, updated_at";

/// Repository for user database operations.
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Get a user by their ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored values no longer parse.
    pub async fn get_by_id(&self, id: UserId) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    /// Get a user by their email address.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored values no longer parse.
    pub async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepositoryError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(email.as_str())
            .fetch_optional(self.pool)
            .await?;
        row.map(UserRow::into_user).transpose()
    }

    /// Create a new user with their password hash and default site
    /// settings, all in one transaction.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the username or email is
    /// already taken, `RepositoryError::Database` for other failures.
    pub async fn create_with_password(
        &self,
        username: &Username,
        email: &Email,
        password_hash: &str,
    ) -> Result<User, RepositoryError> {
        let mut tx = self.pool.begin().await?;

        let sql = format!(
            "INSERT INTO users (username, email) VALUES ($1, $2)
             RETURNING {USER_COLUMNS}"
        );
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(username.as_str())
            .bind(email.as_str())
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| {
                if let sqlx::Error::Database(ref db_err) = e
                    && db_err.is_unique_violation()
                {
                    let constraint = db_err.constraint().unwrap_or_default();
                    if constraint.contains("username") {
                        return RepositoryError::Conflict("username already taken".to_owned());
                    }
                    return RepositoryError::Conflict("email already registered".to_owned());
                }
                RepositoryError::Database(e)
            })?;

        let user = row.into_user()?;

        sqlx::query("INSERT INTO user_passwords (user_id, password_hash) VALUES ($1, $2)")
            .bind(user.id.as_i32())
            .bind(password_hash)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO site_settings (user_id, layout, theme, font_family)
             VALUES ($1, $2, $3, $4)",
        )
        .bind(user.id.as_i32())
        .bind(DEFAULT_LAYOUT)
        .bind(DEFAULT_THEME)
        .bind(DEFAULT_FONT)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(user)
    }

    /// Get a user's password hash by email.
    ///
    /// Returns `None` if the user doesn't exist or has no password set.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails, or
    /// `RepositoryError::DataCorruption` if stored values no longer parse.
    pub async fn get_password_hash(
        &self,
        email: &Email,
    ) -> Result<Option<(User, String)>, RepositoryError> {
        #[derive(sqlx::FromRow)]
        struct Row {
            id: i32,
            username: String,
            email: String,
            display_name: Option<String>,
            created_at: DateTime<Utc>,
            updated_at: DateTime<Utc>,
            password_hash: Option<String>,
        }

        let row = sqlx::query_as::<_, Row>(
            "SELECT u.id, u.username, u.email, u.display_name,
                    u.created_at, u.updated_at, p.password_hash
             FROM users u
             LEFT JOIN user_passwords p ON u.id = p.user_id
             WHERE u.email = $1",
        )
        .bind(email.as_str())
        .fetch_optional(self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let Some(password_hash) = row.password_hash else {
            return Ok(None);
        };

        let user = UserRow {
            id: row.id,
            username: row.username,
            email: row.email,
            display_name: row.display_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
        .into_user()?;

        Ok(Some((user, password_hash)))
    }

    /// Update a user's display name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the user doesn't exist,
    /// `RepositoryError::Database` for other failures.
    pub async fn update_display_name(
        &self,
        user_id: UserId,
        display_name: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE users SET display_name = $1, updated_at = NOW() WHERE id = $2",
        )
        .bind(display_name)
        .bind(user_id.as_i32())
        .execute(self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}
