//! Route query engine
//!
//! Read-only lookups over the imported schema. Raw user input is normalized
//! here with the same rules the importer applies, so the port only ever sees
//! canonical names. Every call is independent and holds no state.

use std::{fmt, sync::Arc};

use domain::{
    DomainError, normalize_direction, normalize_stop_name,
    entities::{RouteDetail, RouteMatch, Stop, StopRoutes},
    value_objects::{Direction, RouteId, RouteNumber, StopId, StopName},
};
use serde::Serialize;
use tracing::{debug, instrument};

use crate::{error::ApplicationError, ports::RouteQueryPort};

/// Configuration for the route query service
#[derive(Debug, Clone)]
pub struct RouteQueryConfig {
    /// Cap applied by [`RouteQueryService::search_routes`]
    pub max_route_matches: u32,
    /// Stop search limit when the caller gives none
    pub default_stop_limit: u32,
    /// Largest accepted stop search limit
    pub max_stop_limit: u32,
    /// Normalized queries shorter than this return nothing
    pub min_query_len: usize,
    /// Longer raw queries are rejected
    pub max_query_len: usize,
    /// Attach the intermediate itinerary to route search results
    pub include_stops_between: bool,
}

impl Default for RouteQueryConfig {
    fn default() -> Self {
        Self {
            max_route_matches: 30,
            default_stop_limit: 10,
            max_stop_limit: 50,
            min_query_len: 1,
            max_query_len: 200,
            include_stops_between: true,
        }
    }
}

/// A route match enriched with the stops the rider passes through
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteSearchResult {
    pub route_number: RouteNumber,
    pub direction: Direction,
    pub from_sequence: u32,
    pub to_sequence: u32,
    /// Origin to destination inclusive
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stops_between: Option<Vec<String>>,
}

impl From<&RouteMatch> for RouteSearchResult {
    fn from(m: &RouteMatch) -> Self {
        Self {
            route_number: m.route_number.clone(),
            direction: m.direction,
            from_sequence: m.from_sequence,
            to_sequence: m.to_sequence,
            stops_between: None,
        }
    }
}

/// Stop autocomplete response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StopSearchResult {
    /// The normalized query that was matched
    pub query: String,
    pub results: Vec<Stop>,
}

/// Service answering route and stop queries
pub struct RouteQueryService {
    port: Arc<dyn RouteQueryPort>,
    config: RouteQueryConfig,
}

impl fmt::Debug for RouteQueryService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteQueryService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RouteQueryService {
    /// Create a new route query service
    #[must_use]
    pub fn new(port: Arc<dyn RouteQueryPort>, config: RouteQueryConfig) -> Self {
        Self { port, config }
    }

    fn ensure_query_len(&self, field: &str, raw: &str) -> Result<(), DomainError> {
        if raw.chars().count() > self.config.max_query_len {
            return Err(DomainError::ValidationError(format!(
                "{field} longer than {} characters",
                self.config.max_query_len
            )));
        }
        Ok(())
    }

    /// Routes visiting `from` strictly before `to`
    ///
    /// Blank stop names or a zero limit match nothing.
    #[instrument(skip(self))]
    pub async fn find_route_matches(
        &self,
        from: &str,
        to: &str,
        limit: u32,
    ) -> Result<Vec<RouteMatch>, ApplicationError> {
        let (Ok(from), Ok(to)) = (StopName::parse(from), StopName::parse(to)) else {
            return Ok(Vec::new());
        };
        if limit == 0 {
            return Ok(Vec::new());
        }

        let matches = self.port.find_route_matches(&from, &to, limit).await?;
        debug!(count = matches.len(), "Route matches found");
        Ok(matches)
    }

    /// Stop names of a route between two sequence numbers, inclusive
    #[instrument(skip(self))]
    pub async fn get_stops_between(
        &self,
        route_id: RouteId,
        from_seq: u32,
        to_seq: u32,
    ) -> Result<Vec<String>, ApplicationError> {
        if from_seq > to_seq {
            return Ok(Vec::new());
        }
        self.port.stops_between(route_id, from_seq, to_seq).await
    }

    /// Full itinerary of one route/direction, `None` if it was never imported
    ///
    /// # Errors
    ///
    /// Blank route numbers and unknown directions are rejected before any read.
    #[instrument(skip(self))]
    pub async fn get_route_detail(
        &self,
        route_number: &str,
        direction: &str,
    ) -> Result<Option<RouteDetail>, ApplicationError> {
        let route_number = RouteNumber::parse(route_number)?;
        let direction = normalize_direction(direction)?;
        self.port.route_detail(&route_number, direction).await
    }

    /// Every route serving a stop, `None` if the stop does not exist
    #[instrument(skip(self))]
    pub async fn get_routes_for_stop(
        &self,
        stop_id: StopId,
    ) -> Result<Option<StopRoutes>, ApplicationError> {
        self.port.routes_for_stop(stop_id).await
    }

    /// Stops whose name starts with `query`, case-insensitive, alphabetical
    #[instrument(skip(self))]
    pub async fn search_stops(&self, query: &str, limit: u32) -> Result<Vec<Stop>, ApplicationError> {
        let normalized = normalize_stop_name(query);
        if limit == 0 || normalized.chars().count() < self.config.min_query_len {
            return Ok(Vec::new());
        }
        let Ok(prefix) = StopName::parse(&normalized) else {
            return Ok(Vec::new());
        };

        self.port.search_stops_by_prefix(&prefix, limit).await
    }

    /// Route search from one stop to another with bounded, enriched results
    ///
    /// # Errors
    ///
    /// `InvalidStopName` for blank input, `ValidationError` when either name is
    /// longer than `max_query_len`, `InvalidOperation` when both ends name the
    /// same stop.
    #[instrument(skip(self))]
    pub async fn search_routes(
        &self,
        from: &str,
        to: &str,
    ) -> Result<Vec<RouteSearchResult>, ApplicationError> {
        self.ensure_query_len("from_stop", from)?;
        self.ensure_query_len("to_stop", to)?;
        let from = StopName::parse(from)?;
        let to = StopName::parse(to)?;
        if from.eq_ignore_case(&to) {
            return Err(ApplicationError::InvalidOperation(
                "from_stop and to_stop cannot be the same".to_string(),
            ));
        }

        let matches = self
            .port
            .find_route_matches(&from, &to, self.config.max_route_matches)
            .await?;

        let mut results = Vec::with_capacity(matches.len());
        for m in &matches {
            let mut result = RouteSearchResult::from(m);
            if self.config.include_stops_between {
                result.stops_between = Some(
                    self.get_stops_between(m.route_id, m.from_sequence, m.to_sequence)
                        .await?,
                );
            }
            results.push(result);
        }

        debug!(count = results.len(), "Route search complete");
        Ok(results)
    }

    /// Stop autocomplete with validated bounds
    ///
    /// # Errors
    ///
    /// `InvalidOperation` when `limit` is outside `1..=max_stop_limit`;
    /// `ValidationError` when the query is longer than `max_query_len`.
    #[instrument(skip(self))]
    pub async fn autocomplete(
        &self,
        query: &str,
        limit: Option<u32>,
    ) -> Result<StopSearchResult, ApplicationError> {
        let limit = limit.unwrap_or(self.config.default_stop_limit);
        if limit == 0 || limit > self.config.max_stop_limit {
            return Err(ApplicationError::InvalidOperation(format!(
                "limit must be between 1 and {}",
                self.config.max_stop_limit
            )));
        }
        self.ensure_query_len("query", query)?;

        let results = self.search_stops(query, limit).await?;
        Ok(StopSearchResult {
            query: normalize_stop_name(query),
            results,
        })
    }
}
