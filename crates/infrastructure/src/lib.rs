//! Infrastructure layer - Adapters for external systems
//!
//! Implements ports defined in the application layer on SQLite via sqlx,
//! and provides configuration loading, logging setup and payload file
//! loading for the binaries.

pub mod config;
pub mod payload_loader;
pub mod persistence;
pub mod telemetry;

pub use config::{
    AppConfig, DatabaseConfig, ImportAppConfig, LogFormat, LoggingConfig, QueryAppConfig,
};
pub use payload_loader::{PayloadLoadError, load_payloads};
pub use persistence::{
    AsyncDatabase, AsyncDatabaseConfig, AsyncDatabaseError, SqliteDatabaseHealth,
    SqliteRouteQueryStore, SqliteRouteStore,
};
pub use telemetry::{TelemetryError, init_logging};
