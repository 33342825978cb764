//! Query engine configuration.

use application::RouteQueryConfig;
use serde::{Deserialize, Serialize};

use super::default_true;

/// Route query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryAppConfig {
    /// Cap on route search results
    #[serde(default = "default_max_route_matches")]
    pub max_route_matches: u32,

    /// Stop search limit when none is given
    #[serde(default = "default_stop_limit")]
    pub default_stop_limit: u32,

    /// Largest accepted stop search limit
    #[serde(default = "default_max_stop_limit")]
    pub max_stop_limit: u32,

    /// Shorter stop queries return nothing
    #[serde(default = "default_min_query_len")]
    pub min_query_len: usize,

    /// Longer stop queries are rejected
    #[serde(default = "default_max_query_len")]
    pub max_query_len: usize,

    /// Attach intermediate stops to route search results (default: true)
    #[serde(default = "default_true")]
    pub include_stops_between: bool,
}

const fn default_max_route_matches() -> u32 {
    30
}

const fn default_stop_limit() -> u32 {
    10
}

const fn default_max_stop_limit() -> u32 {
    50
}

const fn default_min_query_len() -> usize {
    1
}

const fn default_max_query_len() -> usize {
    200
}

impl Default for QueryAppConfig {
    fn default() -> Self {
        Self {
            max_route_matches: default_max_route_matches(),
            default_stop_limit: default_stop_limit(),
            max_stop_limit: default_max_stop_limit(),
            min_query_len: default_min_query_len(),
            max_query_len: default_max_query_len(),
            include_stops_between: true,
        }
    }
}

impl From<&QueryAppConfig> for RouteQueryConfig {
    fn from(config: &QueryAppConfig) -> Self {
        Self {
            max_route_matches: config.max_route_matches,
            default_stop_limit: config.default_stop_limit,
            max_stop_limit: config.max_stop_limit,
            min_query_len: config.min_query_len,
            max_query_len: config.max_query_len,
            include_stops_between: config.include_stops_between,
        }
    }
}
