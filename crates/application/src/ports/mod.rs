//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod database_health_port;
mod route_query_port;
mod route_store;

#[cfg(test)]
pub use database_health_port::MockDatabaseHealthPort;
pub use database_health_port::{DatabaseHealth, DatabaseHealthPort};
#[cfg(test)]
pub use route_query_port::MockRouteQueryPort;
pub use route_query_port::RouteQueryPort;
pub use route_store::{RouteWriteStore, RouteWriteUnit};
