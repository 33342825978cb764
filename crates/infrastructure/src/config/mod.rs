//! Application configuration
//!
//! Split into focused sub-modules:
//! - `database`: SQLite pool settings
//! - `import`: commit mode and payload file discovery
//! - `query`: route and stop search bounds
//! - `logging`: tracing filter and output format
//!
//! Built once at startup and handed to constructors; nothing below reads
//! configuration on its own.

mod database;
mod import;
mod logging;
mod query;

use std::path::Path;

use application::{ImportServiceConfig, RouteQueryConfig};
use serde::{Deserialize, Serialize};
use tracing::debug;

pub use database::DatabaseConfig;
pub use import::ImportAppConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use query::QueryAppConfig;

/// Environment variable prefix, e.g. `ROUTELENS_DATABASE__URL`
pub const ENV_PREFIX: &str = "ROUTELENS";

/// Shared default for boolean `true` fields across config structs
pub(crate) const fn default_true() -> bool {
    true
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Importer configuration
    #[serde(default)]
    pub import: ImportAppConfig,

    /// Query engine configuration
    #[serde(default)]
    pub query: QueryAppConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from defaults, a config file and the environment
    ///
    /// Without `path`, an optional `config.{toml,yaml,json}` in the working
    /// directory is used. An explicit `path` must exist.
    pub fn load(path: Option<&Path>) -> Result<Self, config::ConfigError> {
        Self::load_with_env(
            path,
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with_env(
        path: Option<&Path>,
        env: config::Environment,
    ) -> Result<Self, config::ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder()
            .set_default("database.url", "sqlite:routelens.db")?
            .set_default("logging.filter", "info")?
            .add_source(file)
            .add_source(env);

        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(database = %config.database.url, "Configuration loaded");
        Ok(config)
    }

    /// Reject settings no component could honor
    pub fn validate(&self) -> Result<(), config::ConfigError> {
        let invalid = |msg: &str| Err(config::ConfigError::Message(msg.to_string()));

        if self.database.max_connections == 0 {
            return invalid("database.max_connections must be at least 1");
        }
        if self.query.max_stop_limit == 0 {
            return invalid("query.max_stop_limit must be at least 1");
        }
        if self.query.default_stop_limit == 0
            || self.query.default_stop_limit > self.query.max_stop_limit
        {
            return invalid("query.default_stop_limit must be between 1 and query.max_stop_limit");
        }
        if self.query.min_query_len > self.query.max_query_len {
            return invalid("query.min_query_len must not exceed query.max_query_len");
        }
        if self.import.file_extension.trim().is_empty() {
            return invalid("import.file_extension must not be empty");
        }
        Ok(())
    }

    /// Settings for [`application::ImportService`]
    #[must_use]
    pub fn import_service_config(&self) -> ImportServiceConfig {
        ImportServiceConfig::from(&self.import)
    }

    /// Settings for [`application::RouteQueryService`]
    #[must_use]
    pub fn query_service_config(&self) -> RouteQueryConfig {
        RouteQueryConfig::from(&self.query)
    }
}
