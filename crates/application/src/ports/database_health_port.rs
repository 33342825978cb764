//! Database health check port
//!
//! Lets operators confirm the route store is reachable and populated
//! without coupling to a specific database.

use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;
use serde::Serialize;

use crate::error::ApplicationError;

/// Database health information
#[derive(Debug, Clone, Default, Serialize)]
pub struct DatabaseHealth {
    /// Whether the database is reachable and responding
    pub reachable: bool,
    /// Engine version (if available)
    pub version: Option<String>,
    /// Response time of the health check in milliseconds
    pub response_time_ms: Option<u64>,
    /// Number of stored routes (both directions counted)
    pub route_count: Option<u64>,
    /// Number of stored stops
    pub stop_count: Option<u64>,
}

impl DatabaseHealth {
    /// Create a healthy status with version info
    #[must_use]
    pub fn healthy(version: impl Into<String>) -> Self {
        Self {
            reachable: true,
            version: Some(version.into()),
            ..Self::default()
        }
    }

    /// Create an unhealthy status
    #[must_use]
    pub fn unhealthy() -> Self {
        Self::default()
    }

    /// Add response time to the health status
    #[must_use]
    pub const fn with_response_time(mut self, ms: u64) -> Self {
        self.response_time_ms = Some(ms);
        self
    }

    /// Add schema row counts
    #[must_use]
    pub const fn with_counts(mut self, routes: u64, stops: u64) -> Self {
        self.route_count = Some(routes);
        self.stop_count = Some(stops);
        self
    }

    /// Reachable but nothing imported yet
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.reachable && self.route_count.unwrap_or(0) == 0
    }
}

/// Port for database health checking operations
#[cfg_attr(test, automock)]
#[async_trait]
pub trait DatabaseHealthPort: Send + Sync {
    /// Lightweight `SELECT 1` style probe
    async fn is_available(&self) -> bool;

    /// Version, latency and row counts
    async fn check_health(&self) -> Result<DatabaseHealth, ApplicationError>;
}
