//! Tenant username type.
//!
//! A username doubles as the tenant's subdomain label, so the rules are the
//! DNS label rules narrowed to lowercase: 3-30 characters, `a-z`, `0-9` and
//! `-`, starting and ending with an alphanumeric.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Subdomain labels that can never become usernames.
const RESERVED: &[&str] = &[
    "www", "api", "app", "admin", "dashboard", "mail", "blog", "static",
    "assets", "help", "about", "status",
];

/// Errors that can occur when parsing a [`Username`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum UsernameError {
    /// Too short or too long.
    #[error("username must be {min}-{max} characters")]
    BadLength {
        /// Minimum allowed length.
        min: usize,
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains a character outside `a-z`, `0-9`, `-`.
    #[error("username may only contain lowercase letters, digits and hyphens")]
    InvalidCharacter,
    /// Starts or ends with a hyphen.
    #[error("username cannot start or end with a hyphen")]
    EdgeHyphen,
    /// Matches a reserved subdomain label.
    #[error("username '{0}' is reserved")]
    Reserved(String),
}

/// A validated tenant username (also the tenant's subdomain label).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Username(String);

impl Username {
    /// Minimum username length.
    pub const MIN_LENGTH: usize = 3;
    /// Maximum username length.
    pub const MAX_LENGTH: usize = 30;

    /// Parse a `Username` from a string. Uppercase input is lowered, so
    /// `Ada` and `ada` resolve to the same tenant.
    ///
    /// # Errors
    ///
    /// Returns an error if the input violates the length, character, edge
    /// or reserved-name rules.
    pub fn parse(s: &str) -> Result<Self, UsernameError> {
        let lowered = s.trim().to_ascii_lowercase();

        if lowered.len() < Self::MIN_LENGTH || lowered.len() > Self::MAX_LENGTH {
            return Err(UsernameError::BadLength {
                min: Self::MIN_LENGTH,
                max: Self::MAX_LENGTH,
            });
        }

        if !lowered
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(UsernameError::InvalidCharacter);
        }

        if lowered.starts_with('-') || lowered.ends_with('-') {
            return Err(UsernameError::EdgeHyphen);
        }

        if RESERVED.contains(&lowered.as_str()) {
            return Err(UsernameError::Reserved(lowered));
        }

        Ok(Self(lowered))
    }

    /// Returns the username as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Username` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Username {
    type Err = UsernameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Username {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Username {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Username {
    fn encode_by_ref(
        &self,
        buf: &mut sqlx::postgres::PgArgumentBuffer,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <String as sqlx::Encode<sqlx::Postgres>>::encode_by_ref(&self.0, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        assert_eq!(Username::parse("ada").unwrap().as_str(), "ada");
        assert_eq!(Username::parse("ada-lovelace").unwrap().as_str(), "ada-lovelace");
        assert_eq!(Username::parse("user42").unwrap().as_str(), "user42");
    }

    #[test]
    fn test_parse_lowercases() {
        assert_eq!(Username::parse("Ada").unwrap().as_str(), "ada");
    }

    #[test]
    fn test_parse_length_limits() {
        assert!(matches!(
            Username::parse("ab"),
            Err(UsernameError::BadLength { .. })
        ));
        assert!(matches!(
            Username::parse(&"a".repeat(31)),
            Err(UsernameError::BadLength { .. })
        ));
    }

    #[test]
    fn test_parse_invalid_characters() {
        assert!(matches!(
            Username::parse("ada.lovelace"),
            Err(UsernameError::InvalidCharacter)
        ));
        assert!(matches!(
            Username::parse("ada lovelace"),
            Err(UsernameError::InvalidCharacter)
        ));
    }

    #[test]
    fn test_parse_edge_hyphen() {
        assert!(matches!(
            Username::parse("-ada"),
            Err(UsernameError::EdgeHyphen)
        ));
        assert!(matches!(
            Username::parse("ada-"),
            Err(UsernameError::EdgeHyphen)
        ));
    }

    #[test]
    fn test_parse_reserved() {
        assert!(matches!(
            Username::parse("www"),
            Err(UsernameError::Reserved(_))
        ));
        assert!(matches!(
            Username::parse("Dashboard"),
            Err(UsernameError::Reserved(_))
        ));
    }
}
