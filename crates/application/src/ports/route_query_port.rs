//! Route query port
//!
//! Read-only access to the route schema. Every call is a single bounded read
//! against the current committed snapshot; implementations hold no state
//! between calls. Absence is `Ok(None)` or an empty list, never an error.

use async_trait::async_trait;
use domain::{
    entities::{RouteDetail, RouteMatch, Stop, StopRoutes},
    value_objects::{Direction, RouteId, RouteNumber, StopId, StopName},
};
#[cfg(test)]
use mockall::automock;

use crate::error::ApplicationError;

/// Port for route and stop lookups
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteQueryPort: Send + Sync {
    /// Routes visiting `from` strictly before `to`, ascending by route number
    async fn find_route_matches(
        &self,
        from: &StopName,
        to: &StopName,
        limit: u32,
    ) -> Result<Vec<RouteMatch>, ApplicationError>;

    /// Stop names of `route_id` with sequence in `from_seq..=to_seq`, in order
    async fn stops_between(
        &self,
        route_id: RouteId,
        from_seq: u32,
        to_seq: u32,
    ) -> Result<Vec<String>, ApplicationError>;

    /// Full itinerary of one route/direction
    async fn route_detail(
        &self,
        route_number: &RouteNumber,
        direction: Direction,
    ) -> Result<Option<RouteDetail>, ApplicationError>;

    /// Every route visiting a stop, by route number then direction
    async fn routes_for_stop(
        &self,
        stop_id: StopId,
    ) -> Result<Option<StopRoutes>, ApplicationError>;

    /// Stops whose name starts with `prefix` (case-insensitive), alphabetical
    async fn search_stops_by_prefix(
        &self,
        prefix: &StopName,
        limit: u32,
    ) -> Result<Vec<Stop>, ApplicationError>;
}
