//! Route write port
//!
//! Defines the transactional interface the importer writes through.
//! A [`RouteWriteUnit`] is one open transaction: every write made through it
//! becomes visible to readers only when [`RouteWriteUnit::commit`] succeeds,
//! and dropping the unit without committing rolls everything back.

use async_trait::async_trait;
use domain::value_objects::{Direction, RouteId, RouteNumber, StopId, StopName};

use crate::error::ApplicationError;

/// Port that hands out write transactions against the route schema
#[async_trait]
pub trait RouteWriteStore: Send + Sync {
    /// Open a new write transaction
    async fn begin(&self) -> Result<Box<dyn RouteWriteUnit>, ApplicationError>;
}

/// One open write transaction
///
/// Implementations must roll back on drop if `commit` was never called.
#[async_trait]
pub trait RouteWriteUnit: Send {
    /// Insert the route if its `(route_number, direction)` key is new, and
    /// return its id either way
    async fn upsert_route(
        &mut self,
        route_number: &RouteNumber,
        direction: Direction,
    ) -> Result<RouteId, ApplicationError>;

    /// Insert the stop if its name is new, and return its id either way
    async fn upsert_stop(&mut self, name: &StopName) -> Result<StopId, ApplicationError>;

    /// Delete every route-stop row of `route_id` and insert `stop_ids` with
    /// sequence numbers `1..=n` in list order
    async fn replace_route_stops(
        &mut self,
        route_id: RouteId,
        stop_ids: &[StopId],
    ) -> Result<(), ApplicationError>;

    /// Mark a point inside the transaction that can be rolled back to
    async fn savepoint(&mut self) -> Result<(), ApplicationError>;

    /// Keep everything written since the last savepoint
    async fn release_savepoint(&mut self) -> Result<(), ApplicationError>;

    /// Discard everything written since the last savepoint
    async fn rollback_to_savepoint(&mut self) -> Result<(), ApplicationError>;

    /// Commit the transaction
    async fn commit(self: Box<Self>) -> Result<(), ApplicationError>;
}
