//! Route number value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Public route number, e.g. "20" or "2A"
///
/// Stored trimmed. Ordering is plain lexicographic on the string, which is
/// also how query results are sorted ("110" sorts before "20").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteNumber(String);

impl RouteNumber {
    /// Trim and wrap a raw route number
    ///
    /// # Errors
    ///
    /// Returns `DomainError::MissingField` if the value is blank.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(DomainError::missing_field("route_number"));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Get the route number as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for RouteNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
