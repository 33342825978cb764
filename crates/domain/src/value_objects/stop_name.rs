//! Normalized stop name value object

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{errors::DomainError, normalize::normalize_stop_name};

/// A stop name that has already been through [`normalize_stop_name`]
///
/// Holding a `StopName` guarantees the value is trimmed, has single spaces
/// between words and is not empty, so it can be compared directly with
/// stored names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct StopName(String);

impl StopName {
    /// Normalize and wrap a raw stop name
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidStopName` if nothing is left after normalization.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        let normalized = normalize_stop_name(raw);
        if normalized.is_empty() {
            return Err(DomainError::InvalidStopName(raw.to_string()));
        }
        Ok(Self(normalized))
    }

    /// Get the normalized name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ASCII case-insensitive equality, the way the store compares names
    #[must_use]
    pub fn eq_ignore_case(&self, other: &Self) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }
}

impl fmt::Display for StopName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StopName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for StopName {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<StopName> for String {
    fn from(name: StopName) -> Self {
        name.0
    }
}
