//! Place identifier parsed from the request path.

use regex::Regex;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

/// Compiled regex for place identifier validation.
static PLACE_ID_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_-]+$").unwrap());

/// Error returned when a path segment is not a valid place identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid place identifier: {0:?}")]
pub struct InvalidPlaceId(pub String);

/// Opaque store identifier (usually a Google Place ID).
///
/// Only ASCII letters, digits, `-` and `_` are accepted, so the value is
/// always safe to append to a URL path without escaping. No existence check
/// is performed; any syntactically valid identifier is forwarded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PlaceId(String);

impl PlaceId {
    /// Validates `raw` and wraps it.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidPlaceId`] if `raw` is empty or contains characters
    /// outside `[A-Za-z0-9-_]`.
    pub fn parse(raw: impl Into<String>) -> Result<Self, InvalidPlaceId> {
        let raw = raw.into();

        if PLACE_ID_REGEX.is_match(&raw) {
            Ok(Self(raw))
        } else {
            Err(InvalidPlaceId(raw))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for PlaceId {
    type Err = InvalidPlaceId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for PlaceId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
