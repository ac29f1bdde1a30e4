//! Keyset pagination cursors.
//!
//! Published listings page over `(published_at DESC, id DESC)`. The cursor
//! is the last row of the previous page, encoded as URL-safe base64 of
//! `"{rfc3339}|{id}"`. Cursors are advisory: anything that fails to decode
//! is treated as absent, which restarts from the first page rather than
//! erroring.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};

/// Default page size for listings.
pub const DEFAULT_PAGE_SIZE: i64 = 10;

/// Hard cap on requested page sizes.
pub const MAX_PAGE_SIZE: i64 = 50;

/// A position in a published listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// `published_at` of the last row seen.
    pub published_at: DateTime<Utc>,
    /// Row id tiebreaker.
    pub id: i32,
}

impl Cursor {
    /// Encode into the opaque query-parameter form.
    #[must_use]
    pub fn encode(&self) -> String {
        let raw = format!("{}|{}", self.published_at.to_rfc3339(), self.id);
        URL_SAFE_NO_PAD.encode(raw)
    }

    /// Decode from the query-parameter form. Returns `None` for anything
    /// malformed.
    #[must_use]
    pub fn decode(token: &str) -> Option<Self> {
        let bytes = URL_SAFE_NO_PAD.decode(token).ok()?;
        let raw = String::from_utf8(bytes).ok()?;
        let (timestamp, id) = raw.split_once('|')?;
        let published_at = DateTime::parse_from_rfc3339(timestamp).ok()?.with_timezone(&Utc);
        let id = id.parse::<i32>().ok()?;
        Some(Self { published_at, id })
    }
}

/// Clamp a requested page size to `1..=MAX_PAGE_SIZE`.
#[must_use]
pub fn clamp_limit(requested: Option<i64>) -> i64 {
    requested
        .unwrap_or(DEFAULT_PAGE_SIZE)
        .clamp(1, MAX_PAGE_SIZE)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_cursor_roundtrip() {
        let cursor = Cursor {
            published_at: Utc.with_ymd_and_hms(2026, 1, 2, 3, 4, 5).unwrap(),
            id: 17,
        };
        let token = cursor.encode();
        assert_eq!(Cursor::decode(&token), Some(cursor));
    }

    #[test]
    fn test_cursor_token_is_url_safe() {
        let cursor = Cursor {
            published_at: Utc.with_ymd_and_hms(2026, 6, 30, 23, 59, 59).unwrap(),
            id: i32::MAX,
        };
        let token = cursor.encode();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert_eq!(Cursor::decode(""), None);
        assert_eq!(Cursor::decode("not base64!!"), None);
        // Valid base64 of something that isn't a cursor
        assert_eq!(Cursor::decode(&URL_SAFE_NO_PAD.encode("hello")), None);
        assert_eq!(Cursor::decode(&URL_SAFE_NO_PAD.encode("2026-01-01|x")), None);
    }

    #[test]
    fn test_clamp_limit() {
        assert_eq!(clamp_limit(None), DEFAULT_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(0)), 1);
        assert_eq!(clamp_limit(Some(500)), MAX_PAGE_SIZE);
        assert_eq!(clamp_limit(Some(25)), 25);
    }
}
