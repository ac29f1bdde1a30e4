//! URL slug type and the slugify helper.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Slug`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum SlugError {
    /// The input string is empty (or reduces to empty after slugification).
    #[error("slug cannot be empty")]
    Empty,
    /// The input string is too long.
    #[error("slug must be at most {max} characters")]
    TooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// Contains a character outside `a-z`, `0-9`, `-`.
    #[error("slug may only contain lowercase letters, digits and hyphens")]
    InvalidCharacter,
    /// Starts or ends with a hyphen.
    #[error("slug cannot start or end with a hyphen")]
    EdgeHyphen,
}

/// A validated URL slug: 1-80 characters of `a-z`, `0-9` and `-`, with
/// alphanumerics at both ends. Uniqueness is per tenant and enforced by the
/// database, not by this type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Slug(String);

impl Slug {
    /// Maximum slug length.
    pub const MAX_LENGTH: usize = 80;

    /// Parse a `Slug` from a string that is already in slug form.
    ///
    /// # Errors
    ///
    /// Returns an error if the input violates the length, character or edge
    /// rules. Use [`slugify`] first for free-form input.
    pub fn parse(s: &str) -> Result<Self, SlugError> {
        if s.is_empty() {
            return Err(SlugError::Empty);
        }

        if s.len() > Self::MAX_LENGTH {
            return Err(SlugError::TooLong {
                max: Self::MAX_LENGTH,
            });
        }

        if !s
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SlugError::InvalidCharacter);
        }

        if s.starts_with('-') || s.ends_with('-') {
            return Err(SlugError::EdgeHyphen);
        }

        Ok(Self(s.to_owned()))
    }

    /// Derive a `Slug` from free-form text (typically a title).
    ///
    /// # Errors
    ///
    /// Returns [`SlugError::Empty`] if nothing slug-worthy survives.
    pub fn from_title(title: &str) -> Result<Self, SlugError> {
        let candidate = slugify(title);
        if candidate.is_empty() {
            return Err(SlugError::Empty);
        }
        Self::parse(&candidate)
    }

    /// Returns the slug as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the `Slug` and returns its inner string.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Slug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for Slug {
    type Err = SlugError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Slug {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Create a URL-friendly slug from free-form text.
///
/// Lowercases, keeps ASCII alphanumerics, collapses runs of everything else
/// into single hyphens, and truncates to [`Slug::MAX_LENGTH`].
#[must_use]
pub fn slugify(text: &str) -> String {
    let mut out = String::with_capacity(text.len().min(Slug::MAX_LENGTH));
    let mut last_dash = false;
    for ch in text.chars() {
        if out.len() >= Slug::MAX_LENGTH {
            break;
        }
        let c = ch.to_ascii_lowercase();
        if c.is_ascii_alphanumeric() {
            out.push(c);
            last_dash = false;
        } else if !last_dash && !out.is_empty() {
            out.push('-');
            last_dash = true;
        }
    }
    while out.ends_with('-') {
        out.pop();
    }
    out
}

// SQLx support (with postgres feature)
#[cfg(feature = "postgres")]
impl sqlx::Type<sqlx::Postgres> for Slug {
    fn type_info() -> sqlx::postgres::PgTypeInfo {
        <String as sqlx::Type<sqlx::Postgres>>::type_info()
    }

    fn compatible(ty: &sqlx::postgres::PgTypeInfo) -> bool {
        <String as sqlx::Type<sqlx::Postgres>>::compatible(ty)
    }
}

#[cfg(feature = "postgres")]
impl<'r> sqlx::Decode<'r, sqlx::Postgres> for Slug {
    fn decode(value: sqlx::postgres::PgValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <String as sqlx::Decode<sqlx::Postgres>>::decode(value)?;
        // Database values are assumed valid
        Ok(Self(s))
    }
}

#[cfg(feature = "postgres")]
impl sqlx::Encode<'_, sqlx::Postgres> for Slug {
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
    fn test_slugify_basic() {
        assert_eq!(slugify("Hello World"), "hello-world");
        assert_eq!(slugify("My First Post!"), "my-first-post");
    }

    #[test]
    fn test_slugify_collapses_punctuation() {
        assert_eq!(slugify("a -- b ... c"), "a-b-c");
    }

    #[test]
    fn test_slugify_strips_edges() {
        assert_eq!(slugify("  !hello!  "), "hello");
        assert_eq!(slugify("???"), "");
    }

    #[test]
    fn test_slugify_truncates() {
        let long = "word ".repeat(40);
        let slug = slugify(&long);
        assert!(slug.len() <= Slug::MAX_LENGTH);
        assert!(!slug.ends_with('-'));
    }

    #[test]
    fn test_parse_valid() {
        assert!(Slug::parse("about-me").is_ok());
        assert!(Slug::parse("2024-retrospective").is_ok());
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(matches!(Slug::parse(""), Err(SlugError::Empty)));
        assert!(matches!(
            Slug::parse("About Me"),
            Err(SlugError::InvalidCharacter)
        ));
        assert!(matches!(Slug::parse("-about"), Err(SlugError::EdgeHyphen)));
        assert!(matches!(
            Slug::parse(&"a".repeat(81)),
            Err(SlugError::TooLong { .. })
        ));
    }

    #[test]
    fn test_from_title() {
        assert_eq!(Slug::from_title("Hello, World!").unwrap().as_str(), "hello-world");
        assert!(matches!(Slug::from_title("!!!"), Err(SlugError::Empty)));
    }
}
