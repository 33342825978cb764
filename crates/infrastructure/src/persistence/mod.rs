//! Persistence module
//!
//! SQLite storage for stops, routes and itineraries via sqlx.

pub mod async_connection;
pub mod database_health;
pub mod error;
pub mod route_query_store;
pub mod route_store;

pub use async_connection::{AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError};
pub use database_health::SqliteDatabaseHealth;
pub use route_query_store::SqliteRouteQueryStore;
pub use route_store::{SqliteRouteStore, SqliteRouteWriteUnit};
