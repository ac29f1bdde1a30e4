//! User model.

use chrono::{DateTime, Utc};

use minispace_core::{Email, UserId, Username};

/// A registered Minispace user (one tenant site each).
#[derive(Debug, Clone)]
pub struct User {
    /// Database ID.
    pub id: UserId,
    /// Tenant username, also the subdomain label.
    pub username: Username,
    /// Login email address.
    pub email: Email,
    /// Optional display name shown in the dashboard chrome.
    pub display_name: Option<String>,
    /// When the account was created.
    pub created_at: DateTime<Utc>,
    /// Last account update.
    pub updated_at: DateTime<Utc>,
}
