//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required payload field is absent or blank
    #[error("Missing field: {field}")]
    MissingField { field: String },

    /// Direction did not resolve to UP or DOWN
    #[error("Invalid direction: '{0}' (expected UP or DOWN)")]
    InvalidDirection(String),

    /// Fewer than two usable stops in a route payload
    #[error("Route {route_number} needs at least 2 stops, got {count}")]
    InsufficientStops { route_number: String, count: usize },

    /// The same stop is listed more than once in one itinerary
    #[error("Duplicate stop '{stop}' in route {route_number} {direction}")]
    DuplicateStopInRoute {
        route_number: String,
        direction: String,
        stop: String,
    },

    /// Stop name is empty after normalization
    #[error("Invalid stop name: '{0}'")]
    InvalidStopName(String),

    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

impl DomainError {
    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }
}
