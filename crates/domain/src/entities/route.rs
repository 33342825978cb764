//! Route and route-stop entities

use serde::{Deserialize, Serialize};

use crate::value_objects::{Direction, RouteId, RouteNumber, StopId};

/// A directional route, unique by `(route_number, direction)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
    /// Store-assigned identifier
    pub id: RouteId,
    /// Public route number
    pub route_number: RouteNumber,
    /// Which of the two itineraries this record holds
    pub direction: Direction,
}

/// One ordered visit of a stop within a route's itinerary
///
/// For a fixed `route_id` the `sequence_no` values are exactly `1..=n`
/// after an import, and ascending order is the canonical stop order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteStop {
    pub route_id: RouteId,
    pub stop_id: StopId,
    /// 1-based position in the itinerary
    pub sequence_no: u32,
}

impl RouteStop {
    /// Build the rows for an ordered stop list, numbering from 1
    #[must_use]
    pub fn sequence(route_id: RouteId, stop_ids: &[StopId]) -> Vec<Self> {
        (1..)
            .zip(stop_ids)
            .map(|(sequence_no, &stop_id)| Self {
                route_id,
                stop_id,
                sequence_no,
            })
            .collect()
    }
}
