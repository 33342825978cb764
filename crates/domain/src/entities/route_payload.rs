//! Route import payloads and their validation
//!
//! A payload is one route definition as supplied by the source of truth:
//!
//! ```json
//! { "route_number": "20", "direction": "down", "stops": ["Kharar", "ISBT Sector 43"] }
//! ```
//!
//! [`RawRoutePayload::validate`] turns it into a [`ValidatedRoute`] or the
//! first validation error found. No store access happens here.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{
    errors::DomainError,
    normalize::{normalize_stop_name, stop_name_key},
    value_objects::{Direction, RouteNumber, StopName},
};

/// Minimum number of stops a route must keep after normalization
pub const MIN_ROUTE_STOPS: usize = 2;

/// A route definition exactly as read from the source, before validation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRoutePayload {
    #[serde(default)]
    pub route_number: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// `None` when the field is absent or is not a list
    #[serde(default)]
    pub stops: Option<Vec<String>>,
}

impl RawRoutePayload {
    /// Create a payload from already-typed parts
    #[must_use]
    pub fn new(
        route_number: impl Into<String>,
        direction: impl Into<String>,
        stops: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            route_number: Some(route_number.into()),
            direction: Some(direction.into()),
            stops: Some(stops.into_iter().map(Into::into).collect()),
        }
    }

    /// Leniently extract a payload from a parsed JSON document
    ///
    /// `route_number` may be a string or a number. A `stops` value that is not
    /// an array is treated as absent; numeric entries are kept as text and any
    /// other non-string entry becomes an empty name (dropped by validation).
    ///
    /// # Errors
    ///
    /// Returns `DomainError::ValidationError` if the document is not a JSON object.
    pub fn from_json(value: &Value) -> Result<Self, DomainError> {
        let Value::Object(obj) = value else {
            return Err(DomainError::ValidationError(
                "route payload must be a JSON object".to_string(),
            ));
        };

        let route_number = obj.get("route_number").and_then(scalar_text);
        let direction = obj.get("direction").and_then(scalar_text);
        let stops = obj.get("stops").and_then(Value::as_array).map(|items| {
            items
                .iter()
                .map(|item| scalar_text(item).unwrap_or_default())
                .collect()
        });

        Ok(Self {
            route_number,
            direction,
            stops,
        })
    }

    /// Short label for reports, e.g. `20 down`
    #[must_use]
    pub fn label(&self) -> String {
        let number = self.route_number.as_deref().map_or("?", str::trim);
        let direction = self.direction.as_deref().map_or("?", str::trim);
        format!("{number} {direction}")
    }

    /// Validate and normalize the payload
    ///
    /// Checks, in order: route number present, direction resolves, at least
    /// two raw stops, at least two non-empty stops after normalization, and
    /// no stop listed twice (ASCII case-insensitive, like the store's `NOCASE`).
    ///
    /// # Errors
    ///
    /// `MissingField`, `InvalidDirection`, `InsufficientStops` or
    /// `DuplicateStopInRoute`.
    pub fn validate(&self) -> Result<ValidatedRoute, DomainError> {
        let route_number = RouteNumber::parse(self.route_number.as_deref().unwrap_or_default())?;

        let direction = match self.direction.as_deref() {
            Some(raw) => Direction::parse(raw)?,
            None => return Err(DomainError::InvalidDirection(String::new())),
        };

        let raw_stops = self.stops.as_deref().unwrap_or_default();
        if raw_stops.len() < MIN_ROUTE_STOPS {
            return Err(DomainError::InsufficientStops {
                route_number: route_number.to_string(),
                count: raw_stops.len(),
            });
        }

        let names: Vec<String> = raw_stops
            .iter()
            .map(|raw| normalize_stop_name(raw))
            .filter(|name| !name.is_empty())
            .collect();
        if names.len() < MIN_ROUTE_STOPS {
            return Err(DomainError::InsufficientStops {
                route_number: route_number.to_string(),
                count: names.len(),
            });
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut stops = Vec::with_capacity(names.len());
        for name in names {
            if !seen.insert(stop_name_key(&name)) {
                return Err(DomainError::DuplicateStopInRoute {
                    route_number: route_number.to_string(),
                    direction: direction.to_string(),
                    stop: name,
                });
            }
            stops.push(StopName::parse(&name)?);
        }

        Ok(ValidatedRoute {
            route_number,
            direction,
            stops,
        })
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A payload that passed validation: normalized and ready to write
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatedRoute {
    pub route_number: RouteNumber,
    pub direction: Direction,
    /// Itinerary in payload order, at least two distinct names
    pub stops: Vec<StopName>,
}
