//! SQLite read adapter for route and stop queries
//!
//! Stop names are compared through the column's `NOCASE` collation, so
//! lookups ignore ASCII case the same way the unique constraint does.

use application::{error::ApplicationError, ports::RouteQueryPort};
use async_trait::async_trait;
use domain::{
    entities::{ItineraryStop, RouteDetail, RouteMatch, Stop, StopRouteEntry, StopRoutes},
    value_objects::{Direction, RouteId, RouteNumber, StopId, StopName},
};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use super::error::map_sqlx_error;

/// Route query store backed by the shared sqlx pool
#[derive(Debug, Clone)]
pub struct SqliteRouteQueryStore {
    pool: SqlitePool,
}

impl SqliteRouteQueryStore {
    /// Create a new route query store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn itinerary(&self, route_id: i64) -> Result<Vec<ItineraryStop>, ApplicationError> {
        let rows: Vec<ItineraryRow> = sqlx::query_as(
            r"
            SELECT rs.sequence_no, s.name
            FROM route_stops rs
            JOIN stops s ON s.id = rs.stop_id
            WHERE rs.route_id = $1
            ORDER BY rs.sequence_no ASC
            ",
        )
        .bind(route_id)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(ItineraryRow::into_stop).collect())
    }
}

/// Escape `LIKE` metacharacters so the prefix matches literally
fn like_prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for c in prefix.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn parse_direction(raw: &str) -> Result<Direction, ApplicationError> {
    Direction::parse(raw)
        .map_err(|e| ApplicationError::Internal(format!("Corrupt route row: {e}")))
}

fn parse_route_number(raw: &str) -> Result<RouteNumber, ApplicationError> {
    RouteNumber::parse(raw)
        .map_err(|e| ApplicationError::Internal(format!("Corrupt route row: {e}")))
}

#[async_trait]
impl RouteQueryPort for SqliteRouteQueryStore {
    #[instrument(skip_all, fields(from = %from, to = %to, limit))]
    async fn find_route_matches(
        &self,
        from: &StopName,
        to: &StopName,
        limit: u32,
    ) -> Result<Vec<RouteMatch>, ApplicationError> {
        let rows: Vec<RouteMatchRow> = sqlx::query_as(
            r"
            SELECT r.id AS route_id,
                   r.route_number,
                   r.direction,
                   rs_from.sequence_no AS from_sequence,
                   rs_to.sequence_no AS to_sequence
            FROM stops s_from
            JOIN route_stops rs_from ON rs_from.stop_id = s_from.id
            JOIN route_stops rs_to ON rs_to.route_id = rs_from.route_id
            JOIN stops s_to ON s_to.id = rs_to.stop_id
            JOIN routes r ON r.id = rs_from.route_id
            WHERE s_from.name = $1
              AND s_to.name = $2
              AND rs_from.sequence_no < rs_to.sequence_no
            ORDER BY r.route_number ASC, r.direction ASC
            LIMIT $3
            ",
        )
        .bind(from.as_str())
        .bind(to.as_str())
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        debug!(count = rows.len(), "Route matches loaded");
        rows.into_iter().map(RouteMatchRow::into_match).collect()
    }

    #[instrument(skip(self))]
    async fn stops_between(
        &self,
        route_id: RouteId,
        from_seq: u32,
        to_seq: u32,
    ) -> Result<Vec<String>, ApplicationError> {
        sqlx::query_scalar(
            r"
            SELECT s.name
            FROM route_stops rs
            JOIN stops s ON s.id = rs.stop_id
            WHERE rs.route_id = $1
              AND rs.sequence_no BETWEEN $2 AND $3
            ORDER BY rs.sequence_no ASC
            ",
        )
        .bind(route_id.as_i64())
        .bind(from_seq)
        .bind(to_seq)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)
    }

    #[instrument(skip_all, fields(route_number = %route_number, direction = %direction))]
    async fn route_detail(
        &self,
        route_number: &RouteNumber,
        direction: Direction,
    ) -> Result<Option<RouteDetail>, ApplicationError> {
        let route_id: Option<i64> = sqlx::query_scalar(
            "SELECT id FROM routes WHERE route_number = $1 AND direction = $2",
        )
        .bind(route_number.as_str())
        .bind(direction.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(route_id) = route_id else {
            debug!("Route not found");
            return Ok(None);
        };

        Ok(Some(RouteDetail {
            route_number: route_number.clone(),
            direction,
            stops: self.itinerary(route_id).await?,
        }))
    }

    #[instrument(skip(self))]
    async fn routes_for_stop(
        &self,
        stop_id: StopId,
    ) -> Result<Option<StopRoutes>, ApplicationError> {
        let stop_name: Option<String> = sqlx::query_scalar("SELECT name FROM stops WHERE id = $1")
            .bind(stop_id.as_i64())
            .fetch_optional(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        let Some(stop_name) = stop_name else {
            debug!("Stop not found");
            return Ok(None);
        };

        let rows: Vec<StopRouteRow> = sqlx::query_as(
            r"
            SELECT r.route_number, r.direction, rs.sequence_no
            FROM route_stops rs
            JOIN routes r ON r.id = rs.route_id
            WHERE rs.stop_id = $1
            ORDER BY r.route_number ASC, r.direction ASC
            ",
        )
        .bind(stop_id.as_i64())
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let routes = rows
            .into_iter()
            .map(StopRouteRow::into_entry)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Some(StopRoutes {
            stop_id,
            stop_name,
            routes,
        }))
    }

    #[instrument(skip_all, fields(prefix = %prefix, limit))]
    async fn search_stops_by_prefix(
        &self,
        prefix: &StopName,
        limit: u32,
    ) -> Result<Vec<Stop>, ApplicationError> {
        let rows: Vec<StopRow> = sqlx::query_as(
            r"
            SELECT id, name
            FROM stops
            WHERE name LIKE $1 ESCAPE '\'
            ORDER BY name ASC
            LIMIT $2
            ",
        )
        .bind(like_prefix_pattern(prefix.as_str()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| Stop::new(StopId::new(row.id), row.name))
            .collect())
    }
}

// Internal row types for sqlx

#[derive(sqlx::FromRow)]
struct RouteMatchRow {
    route_id: i64,
    route_number: String,
    direction: String,
    from_sequence: u32,
    to_sequence: u32,
}

impl RouteMatchRow {
    fn into_match(self) -> Result<RouteMatch, ApplicationError> {
        Ok(RouteMatch {
            route_number: parse_route_number(&self.route_number)?,
            direction: parse_direction(&self.direction)?,
            from_sequence: self.from_sequence,
            to_sequence: self.to_sequence,
            route_id: RouteId::new(self.route_id),
        })
    }
}

#[derive(sqlx::FromRow)]
struct ItineraryRow {
    sequence_no: u32,
    name: String,
}

impl ItineraryRow {
    fn into_stop(self) -> ItineraryStop {
        ItineraryStop {
            sequence_no: self.sequence_no,
            name: self.name,
        }
    }
}

#[derive(sqlx::FromRow)]
struct StopRouteRow {
    route_number: String,
    direction: String,
    sequence_no: u32,
}

impl StopRouteRow {
    fn into_entry(self) -> Result<StopRouteEntry, ApplicationError> {
        Ok(StopRouteEntry {
            route_number: parse_route_number(&self.route_number)?,
            direction: parse_direction(&self.direction)?,
            sequence_no: self.sequence_no,
        })
    }
}

#[derive(sqlx::FromRow)]
struct StopRow {
    id: i64,
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_prefix_pattern("Sector"), "Sector%");
        assert_eq!(like_prefix_pattern("50%_off"), "50\\%\\_off%");
        assert_eq!(like_prefix_pattern("a\\b"), "a\\\\b%");
    }

    #[test]
    fn corrupt_direction_is_internal_error() {
        let err = parse_direction("LEFT").unwrap_err();
        assert!(matches!(err, ApplicationError::Internal(_)));
    }
}
