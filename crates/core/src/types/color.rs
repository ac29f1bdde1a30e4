//! CSS hex color type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`HexColor`].
#[derive(thiserror::Error, Debug, Clone)]
pub enum HexColorError {
    /// Not of the form `#rrggbb`.
    #[error("color must be a #rrggbb hex value")]
    BadFormat,
}

/// A `#rrggbb` CSS color, stored lowercase.
///
/// Tenant appearance settings accept raw color input; validating here keeps
/// unparseable strings out of generated style sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HexColor([u8; 3]);

impl HexColor {
    /// Parse a `HexColor` from a `#rrggbb` string. A `#rgb` shorthand is
    /// expanded; anything else is rejected.
    ///
    /// # Errors
    ///
    /// Returns [`HexColorError::BadFormat`] for malformed input.
    pub fn parse(s: &str) -> Result<Self, HexColorError> {
        let hex = s.trim().strip_prefix('#').ok_or(HexColorError::BadFormat)?;

        #[allow(clippy::cast_possible_truncation)]
        fn expand(c: char) -> Option<u8> {
            let d = c.to_digit(16)?;
            Some((d * 16 + d) as u8)
        }

        #[allow(clippy::cast_possible_truncation)]
        fn parse_pair(a: Option<char>, b: Option<char>) -> Option<u8> {
            let hi = a?.to_digit(16)?;
            let lo = b?.to_digit(16)?;
            Some((hi * 16 + lo) as u8)
        }

        let mut chars = hex.chars();
        match hex.len() {
            3 => {
                let r = chars.next().and_then(expand);
                let g = chars.next().and_then(expand);
                let b = chars.next().and_then(expand);
                match (r, g, b) {
                    (Some(r), Some(g), Some(b)) => Ok(Self([r, g, b])),
                    _ => Err(HexColorError::BadFormat),
                }
            }
            6 => {
                let r = parse_pair(chars.next(), chars.next());
                let g = parse_pair(chars.next(), chars.next());
                let b = parse_pair(chars.next(), chars.next());
                match (r, g, b) {
                    (Some(r), Some(g), Some(b)) => Ok(Self([r, g, b])),
                    _ => Err(HexColorError::BadFormat),
                }
            }
            _ => Err(HexColorError::BadFormat),
        }
    }

    /// Construct a color from its components.
    #[must_use]
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    /// The red/green/blue components.
    #[must_use]
    pub const fn rgb(&self) -> (u8, u8, u8) {
        (self.0[0], self.0[1], self.0[2])
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0[0], self.0[1], self.0[2])
    }
}

impl std::str::FromStr for HexColor {
    type Err = HexColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for HexColor {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for HexColor {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_form() {
        let c = HexColor::parse("#1a2b3c").unwrap();
        assert_eq!(c.rgb(), (0x1a, 0x2b, 0x3c));
        assert_eq!(c.to_string(), "#1a2b3c");
    }

    #[test]
    fn test_parse_shorthand() {
        let c = HexColor::parse("#fff").unwrap();
        assert_eq!(c.to_string(), "#ffffff");
    }

    #[test]
    fn test_parse_uppercase() {
        assert_eq!(HexColor::parse("#AABBCC").unwrap().to_string(), "#aabbcc");
    }

    #[test]
    fn test_parse_rejects_malformed() {
        assert!(HexColor::parse("red").is_err());
        assert!(HexColor::parse("#12345").is_err());
        assert!(HexColor::parse("#gggggg").is_err());
        assert!(HexColor::parse("").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let c = HexColor::parse("#336699").unwrap();
        let json = serde_json::to_string(&c).unwrap();
        assert_eq!(json, "\"#336699\"");
        let parsed: HexColor = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, c);
    }
}
