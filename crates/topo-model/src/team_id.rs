//! Stable team identifiers
//!
//! Provides [`TeamId`], a validated slug-safe identifier.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

/// Stable, slug-safe team identifier
///
/// Lowercase ASCII alphanumeric segments joined by single dashes, with no
/// leading, trailing or consecutive dashes (`^[a-z0-9]+(-[a-z0-9]+)*$`).
///
/// # Examples
/// - `api-gateway-team` is valid
/// - `API_Gateway` and `api--gateway` are not
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TeamId(String);

impl TeamId {
    /// Check whether `value` is a well-formed identifier
    #[must_use]
    pub fn is_valid(value: &str) -> bool {
        !value.is_empty()
            && value.split('-').all(|segment| {
                !segment.is_empty()
                    && segment
                        .bytes()
                        .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit())
            })
    }

    /// Borrow the identifier text
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl Display for TeamId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for TeamId {
    type Err = TeamIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s.to_string())
    }
}

impl TryFrom<String> for TeamId {
    type Error = TeamIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value.is_empty() {
            return Err(TeamIdError::Empty);
        }
        if !Self::is_valid(&value) {
            return Err(TeamIdError::InvalidFormat(value));
        }
        Ok(Self(value))
    }
}

impl From<TeamId> for String {
    fn from(id: TeamId) -> Self {
        id.0
    }
}

impl AsRef<str> for TeamId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for TeamId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for TeamId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Errors related to team identifiers
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeamIdError {
    /// Identifier is empty
    #[error("team_id is empty")]
    Empty,

    /// Identifier is not slug-safe
    #[error("invalid team_id '{0}' (must be lowercase alphanumeric with single dashes)")]
    InvalidFormat(String),
}
