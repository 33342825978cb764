//! Read models returned by route queries

use serde::{Deserialize, Serialize};

use crate::value_objects::{Direction, RouteId, RouteNumber, StopId};

/// A route whose itinerary visits the origin strictly before the destination
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteMatch {
    pub route_number: RouteNumber,
    pub direction: Direction,
    /// Sequence number of the origin stop
    pub from_sequence: u32,
    /// Sequence number of the destination stop, always greater than `from_sequence`
    pub to_sequence: u32,
    pub route_id: RouteId,
}

/// One entry of an itinerary
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItineraryStop {
    pub sequence_no: u32,
    pub name: String,
}

/// Full itinerary of one route/direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDetail {
    pub route_number: RouteNumber,
    pub direction: Direction,
    /// Ascending by `sequence_no`
    pub stops: Vec<ItineraryStop>,
}

/// A route/direction serving a given stop, and where in it the stop sits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRouteEntry {
    pub route_number: RouteNumber,
    pub direction: Direction,
    pub sequence_no: u32,
}

/// Reverse lookup result: every route visiting a stop
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StopRoutes {
    pub stop_id: StopId,
    pub stop_name: String,
    /// Ordered by route number, then direction
    pub routes: Vec<StopRouteEntry>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn route_detail_serializes_itinerary_in_order() {
        let detail = RouteDetail {
            route_number: RouteNumber::parse("20").unwrap(),
            direction: Direction::Up,
            stops: vec![
                ItineraryStop {
                    sequence_no: 1,
                    name: "Kharar".to_string(),
                },
                ItineraryStop {
                    sequence_no: 2,
                    name: "Mohali".to_string(),
                },
            ],
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["direction"], "UP");
        assert_eq!(json["stops"][0]["sequence_no"], 1);
        assert_eq!(json["stops"][1]["name"], "Mohali");
    }

    #[test]
    fn route_match_serializes_flat() {
        let m = RouteMatch {
            route_number: RouteNumber::parse("20").unwrap(),
            direction: Direction::Down,
            from_sequence: 1,
            to_sequence: 4,
            route_id: RouteId::new(9),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["route_number"], "20");
        assert_eq!(json["direction"], "DOWN");
        assert_eq!(json["route_id"], 9);
    }
}
