//! Route data importer
//!
//! Converges the stored schema to a batch of route payloads. Every payload is
//! validated before anything is written for it; failures are recorded per
//! payload and never stop the batch. For each accepted payload the importer
//! upserts the route, upserts each stop, then replaces the route's stop
//! sequence, all inside one transaction so readers see either the old or the
//! new itinerary.
//!
//! Imports of the same route must be serialized by the caller; no locking
//! happens here and the last writer wins.

use std::{fmt, sync::Arc};

use domain::{DomainError, RawRoutePayload, ValidatedRoute};
use serde::{Deserialize, Serialize, ser::SerializeStruct};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::ApplicationError,
    ports::{RouteWriteStore, RouteWriteUnit},
};

/// When accepted payloads become durable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommitMode {
    /// Commit each payload on its own; a later failure never undoes an
    /// earlier success
    #[default]
    PerPayload,
    /// One transaction for the whole batch, each payload in a savepoint.
    /// If the final commit fails nothing is kept and the batch returns an error.
    Batch,
}

impl fmt::Display for CommitMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PerPayload => write!(f, "per_payload"),
            Self::Batch => write!(f, "batch"),
        }
    }
}

/// Configuration for the import service
#[derive(Debug, Clone, Default)]
pub struct ImportServiceConfig {
    pub commit_mode: CommitMode,
}

/// One unit of import input: where it came from and what was read
#[derive(Debug, Clone)]
pub struct PayloadInput {
    /// Identifier used in the report (file path, index, ...)
    pub source: String,
    /// The payload, or why it could not be read
    pub payload: Result<RawRoutePayload, String>,
}

impl PayloadInput {
    /// Input that was read and parsed
    #[must_use]
    pub fn parsed(source: impl Into<String>, payload: RawRoutePayload) -> Self {
        Self {
            source: source.into(),
            payload: Ok(payload),
        }
    }

    /// Input that could not be read or parsed
    #[must_use]
    pub fn unreadable(source: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            payload: Err(reason.into()),
        }
    }
}

/// Why a single payload was not imported
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ImportError {
    /// The input could not be read or parsed
    #[error("Unreadable payload: {0}")]
    Parse(String),

    /// The payload failed validation; nothing was written
    #[error(transparent)]
    Invalid(DomainError),

    /// The store rejected a write; the payload's writes were rolled back
    #[error("Store error: {0}")]
    Store(String),
}

impl ImportError {
    /// Short machine-readable category
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Parse(_) => "parse",
            Self::Invalid(_) => "validation",
            Self::Store(_) => "store",
        }
    }
}

impl From<ApplicationError> for ImportError {
    fn from(err: ApplicationError) -> Self {
        match err {
            ApplicationError::Domain(e) => Self::Invalid(e),
            other => Self::Store(other.to_string()),
        }
    }
}

/// A failed payload and its error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportFailure {
    pub source: String,
    pub error: ImportError,
}

impl Serialize for ImportFailure {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("ImportFailure", 3)?;
        state.serialize_field("source", &self.source)?;
        state.serialize_field("kind", self.error.kind())?;
        state.serialize_field("message", &self.error.to_string())?;
        state.end()
    }
}

/// Outcome of one batch
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportReport {
    pub succeeded: usize,
    pub failed: usize,
    /// In input order
    pub errors: Vec<ImportFailure>,
}

impl ImportReport {
    fn record_success(&mut self) {
        self.succeeded += 1;
    }

    fn record_failure(&mut self, source: String, error: ImportError) {
        warn!(%source, kind = error.kind(), error = %error, "Route payload not imported");
        self.failed += 1;
        self.errors.push(ImportFailure { source, error });
    }

    /// Total number of payloads processed
    #[must_use]
    pub const fn total(&self) -> usize {
        self.succeeded + self.failed
    }

    /// Whether every payload was imported
    #[must_use]
    pub const fn is_clean(&self) -> bool {
        self.failed == 0
    }
}

/// Service that imports route payloads into the store
pub struct ImportService {
    store: Arc<dyn RouteWriteStore>,
    config: ImportServiceConfig,
}

impl fmt::Debug for ImportService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImportService")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ImportService {
    /// Create a new import service
    #[must_use]
    pub fn new(store: Arc<dyn RouteWriteStore>, config: ImportServiceConfig) -> Self {
        Self { store, config }
    }

    /// Import already-parsed payloads, labelled by position and route
    pub async fn import_payloads(
        &self,
        payloads: &[RawRoutePayload],
    ) -> Result<ImportReport, ApplicationError> {
        let inputs = payloads
            .iter()
            .enumerate()
            .map(|(i, p)| PayloadInput::parsed(format!("#{} ({})", i + 1, p.label()), p.clone()))
            .collect();
        self.import_batch(inputs).await
    }

    /// Import a batch, continuing past per-payload failures
    ///
    /// # Errors
    ///
    /// Per-payload problems land in the report. An `Err` is returned only in
    /// [`CommitMode::Batch`] when the batch transaction itself cannot be
    /// opened, kept consistent, or committed; in that case nothing from the
    /// batch was persisted.
    #[instrument(skip(self, inputs), fields(count = inputs.len(), mode = %self.config.commit_mode))]
    pub async fn import_batch(
        &self,
        inputs: Vec<PayloadInput>,
    ) -> Result<ImportReport, ApplicationError> {
        info!("Starting route import");

        let report = match self.config.commit_mode {
            CommitMode::PerPayload => self.import_per_payload(inputs).await,
            CommitMode::Batch => self.import_in_one_transaction(inputs).await?,
        };

        info!(
            total = report.total(),
            succeeded = report.succeeded,
            failed = report.failed,
            "Route import finished"
        );
        Ok(report)
    }

    async fn import_per_payload(&self, inputs: Vec<PayloadInput>) -> ImportReport {
        let mut report = ImportReport::default();

        for input in inputs {
            let route = match prepare(input.payload) {
                Ok(route) => route,
                Err(e) => {
                    report.record_failure(input.source, e);
                    continue;
                },
            };

            match self.write_and_commit(&route).await {
                Ok(()) => {
                    log_imported(&input.source, &route);
                    report.record_success();
                },
                Err(e) => report.record_failure(input.source, e.into()),
            }
        }

        report
    }

    async fn write_and_commit(&self, route: &ValidatedRoute) -> Result<(), ApplicationError> {
        let mut unit = self.store.begin().await?;
        write_route(unit.as_mut(), route).await?;
        unit.commit().await
    }

    async fn import_in_one_transaction(
        &self,
        inputs: Vec<PayloadInput>,
    ) -> Result<ImportReport, ApplicationError> {
        let mut report = ImportReport::default();
        let mut unit = self.store.begin().await?;

        for input in inputs {
            let route = match prepare(input.payload) {
                Ok(route) => route,
                Err(e) => {
                    report.record_failure(input.source, e);
                    continue;
                },
            };

            unit.savepoint().await?;
            match write_route(unit.as_mut(), &route).await {
                Ok(()) => {
                    unit.release_savepoint().await?;
                    log_imported(&input.source, &route);
                    report.record_success();
                },
                Err(e) => {
                    unit.rollback_to_savepoint().await?;
                    report.record_failure(input.source, e.into());
                },
            }
        }

        if let Err(e) = unit.commit().await {
            warn!(
                error = %e,
                discarded = report.succeeded,
                "Batch commit failed, no payload from this batch was persisted"
            );
            return Err(e);
        }
        Ok(report)
    }
}

fn prepare(payload: Result<RawRoutePayload, String>) -> Result<ValidatedRoute, ImportError> {
    payload
        .map_err(ImportError::Parse)?
        .validate()
        .map_err(ImportError::Invalid)
}

/// Upsert the route and its stops, then swap in the new sequence
async fn write_route(
    unit: &mut dyn RouteWriteUnit,
    route: &ValidatedRoute,
) -> Result<(), ApplicationError> {
    let route_id = unit
        .upsert_route(&route.route_number, route.direction)
        .await?;

    let mut stop_ids = Vec::with_capacity(route.stops.len());
    for name in &route.stops {
        stop_ids.push(unit.upsert_stop(name).await?);
    }

    unit.replace_route_stops(route_id, &stop_ids).await?;
    debug!(%route_id, stops = stop_ids.len(), "Route stops replaced");
    Ok(())
}

fn log_imported(source: &str, route: &ValidatedRoute) {
    info!(
        %source,
        route_number = %route.route_number,
        direction = %route.direction,
        stops = route.stops.len(),
        "Imported route"
    );
}
