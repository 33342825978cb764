//! SQLite write adapter for the route importer
//!
//! Each [`SqliteRouteWriteUnit`] owns one sqlx transaction. Readers on other
//! connections keep seeing the previous itinerary until `commit`, so the
//! delete-then-reinsert of a route's stops is never observed half done.

use application::{
    error::ApplicationError,
    ports::{RouteWriteStore, RouteWriteUnit},
};
use async_trait::async_trait;
use domain::{
    entities::RouteStop,
    value_objects::{Direction, RouteId, RouteNumber, StopId, StopName},
};
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, instrument};

use super::error::map_sqlx_error;

/// Hands out write transactions on the shared pool
#[derive(Debug, Clone)]
pub struct SqliteRouteStore {
    pool: SqlitePool,
}

impl SqliteRouteStore {
    /// Create a new route write store
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteWriteStore for SqliteRouteStore {
    #[instrument(skip(self))]
    async fn begin(&self) -> Result<Box<dyn RouteWriteUnit>, ApplicationError> {
        let tx = self.pool.begin().await.map_err(map_sqlx_error)?;
        Ok(Box::new(SqliteRouteWriteUnit {
            tx,
            savepoint_depth: 0,
        }))
    }
}

/// One open write transaction; rolled back by sqlx when dropped uncommitted
pub struct SqliteRouteWriteUnit {
    tx: Transaction<'static, Sqlite>,
    savepoint_depth: u32,
}

impl std::fmt::Debug for SqliteRouteWriteUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteRouteWriteUnit")
            .field("savepoint_depth", &self.savepoint_depth)
            .finish_non_exhaustive()
    }
}

impl SqliteRouteWriteUnit {
    fn savepoint_name(&self) -> String {
        format!("route_import_{}", self.savepoint_depth)
    }

    async fn execute_raw(&mut self, sql: &str) -> Result<(), ApplicationError> {
        sqlx::query(sql)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    fn ensure_savepoint(&self) -> Result<(), ApplicationError> {
        if self.savepoint_depth == 0 {
            return Err(ApplicationError::Internal(
                "No open savepoint in this transaction".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl RouteWriteUnit for SqliteRouteWriteUnit {
    #[instrument(skip_all, fields(route_number = %route_number, direction = %direction))]
    async fn upsert_route(
        &mut self,
        route_number: &RouteNumber,
        direction: Direction,
    ) -> Result<RouteId, ApplicationError> {
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO routes (route_number, direction)
            VALUES ($1, $2)
            ON CONFLICT(route_number, direction) DO UPDATE SET
                route_number = routes.route_number
            RETURNING id
            ",
        )
        .bind(route_number.as_str())
        .bind(direction.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(RouteId::new(id))
    }

    #[instrument(skip_all, fields(stop = %name))]
    async fn upsert_stop(&mut self, name: &StopName) -> Result<StopId, ApplicationError> {
        // The stored spelling wins when only the casing differs
        let id: i64 = sqlx::query_scalar(
            r"
            INSERT INTO stops (name)
            VALUES ($1)
            ON CONFLICT(name) DO UPDATE SET
                name = stops.name
            RETURNING id
            ",
        )
        .bind(name.as_str())
        .fetch_one(&mut *self.tx)
        .await
        .map_err(map_sqlx_error)?;

        Ok(StopId::new(id))
    }

    #[instrument(skip_all, fields(route_id = %route_id, stops = stop_ids.len()))]
    async fn replace_route_stops(
        &mut self,
        route_id: RouteId,
        stop_ids: &[StopId],
    ) -> Result<(), ApplicationError> {
        let removed = sqlx::query("DELETE FROM route_stops WHERE route_id = $1")
            .bind(route_id.as_i64())
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?
            .rows_affected();

        for row in RouteStop::sequence(route_id, stop_ids) {
            sqlx::query(
                r"
                INSERT INTO route_stops (route_id, stop_id, sequence_no)
                VALUES ($1, $2, $3)
                ",
            )
            .bind(row.route_id.as_i64())
            .bind(row.stop_id.as_i64())
            .bind(row.sequence_no)
            .execute(&mut *self.tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        debug!(removed, inserted = stop_ids.len(), "Route stops replaced");
        Ok(())
    }

    async fn savepoint(&mut self) -> Result<(), ApplicationError> {
        self.savepoint_depth += 1;
        let sql = format!("SAVEPOINT {}", self.savepoint_name());
        if let Err(e) = self.execute_raw(&sql).await {
            self.savepoint_depth -= 1;
            return Err(e);
        }
        Ok(())
    }

    async fn release_savepoint(&mut self) -> Result<(), ApplicationError> {
        self.ensure_savepoint()?;
        let sql = format!("RELEASE SAVEPOINT {}", self.savepoint_name());
        self.execute_raw(&sql).await?;
        self.savepoint_depth -= 1;
        Ok(())
    }

    async fn rollback_to_savepoint(&mut self) -> Result<(), ApplicationError> {
        self.ensure_savepoint()?;
        let name = self.savepoint_name();
        // ROLLBACK TO leaves the savepoint open; release it so depth stays in step
        self.execute_raw(&format!("ROLLBACK TO SAVEPOINT {name}"))
            .await?;
        self.execute_raw(&format!("RELEASE SAVEPOINT {name}"))
            .await?;
        self.savepoint_depth -= 1;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn commit(self: Box<Self>) -> Result<(), ApplicationError> {
        self.tx.commit().await.map_err(map_sqlx_error)?;
        debug!("Route transaction committed");
        Ok(())
    }
}
