//! Route direction value object
//!
//! A route number has up to two independent itineraries, one per direction.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::errors::DomainError;

/// Traversal direction of a route
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Outbound itinerary
    Up,
    /// Return itinerary
    Down,
}

impl Direction {
    /// Parse a raw direction: trimmed, uppercased, must be `UP` or `DOWN`
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidDirection` with the untouched input.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim().to_uppercase().as_str() {
            "UP" => Ok(Self::Up),
            "DOWN" => Ok(Self::Down),
            _ => Err(DomainError::InvalidDirection(raw.to_string())),
        }
    }

    /// Canonical stored form
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Up => "UP",
            Self::Down => "DOWN",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Direction {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
