//! Subcommand handlers
//!
//! Results are printed to stdout as pretty JSON; diagnostics go to stderr.

use std::{path::Path, process::ExitCode, sync::Arc};

use anyhow::Context as _;
use application::{
    ImportService, RouteQueryService,
    ports::DatabaseHealthPort,
};
use domain::{StopId, normalize_stop_name};
use infrastructure::{
    AppConfig, AsyncDatabase, AsyncDatabaseConfig, SqliteDatabaseHealth, SqliteRouteQueryStore,
    SqliteRouteStore, load_payloads,
};
use serde::Serialize;
use tracing::{info, warn};

/// Open database plus the services built on it
#[derive(Debug)]
pub struct Context {
    db: AsyncDatabase,
    query: RouteQueryService,
}

impl Context {
    /// Connect and, unless `skip_migrations`, apply configured migrations
    pub async fn open(config: &AppConfig, skip_migrations: bool) -> anyhow::Result<Self> {
        let db = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database))
            .await
            .with_context(|| format!("failed to open database {}", config.database.url))?;

        if config.database.run_migrations && !skip_migrations {
            db.migrate().await.context("failed to migrate database")?;
        }

        let query = RouteQueryService::new(
            Arc::new(SqliteRouteQueryStore::new(db.pool().clone())),
            config.query_service_config(),
        );

        Ok(Self { db, query })
    }

    pub async fn close(&self) {
        self.db.close().await;
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub async fn migrate(ctx: &Context) -> anyhow::Result<ExitCode> {
    ctx.db.migrate().await.context("failed to migrate database")?;
    print_json(&serde_json::json!({ "status": "migrated" }))?;
    Ok(ExitCode::SUCCESS)
}

pub async fn import(ctx: &Context, config: &AppConfig, path: &Path) -> anyhow::Result<ExitCode> {
    let inputs = load_payloads(path, &config.import.file_extension).await?;
    let service = ImportService::new(
        Arc::new(SqliteRouteStore::new(ctx.db.pool().clone())),
        config.import_service_config(),
    );

    let report = service.import_batch(inputs).await?;
    print_json(&report)?;

    if report.is_clean() {
        Ok(ExitCode::SUCCESS)
    } else {
        info!(failed = report.failed, "Import finished with failures");
        Ok(ExitCode::FAILURE)
    }
}

pub async fn search(ctx: &Context, from: &str, to: &str) -> anyhow::Result<ExitCode> {
    let results = ctx.query.search_routes(from, to).await?;
    print_json(&serde_json::json!({
        "from_stop": normalize_stop_name(from),
        "to_stop": normalize_stop_name(to),
        "matches": results,
    }))?;
    Ok(ExitCode::SUCCESS)
}

pub async fn route(ctx: &Context, route_number: &str, direction: &str) -> anyhow::Result<ExitCode> {
    match ctx.query.get_route_detail(route_number, direction).await? {
        Some(detail) => {
            print_json(&detail)?;
            Ok(ExitCode::SUCCESS)
        },
        None => {
            eprintln!("Route {} {} not found", route_number.trim(), direction.trim());
            Ok(ExitCode::FAILURE)
        },
    }
}

pub async fn stop_routes(ctx: &Context, stop_id: i64) -> anyhow::Result<ExitCode> {
    match ctx.query.get_routes_for_stop(StopId::new(stop_id)).await? {
        Some(routes) => {
            print_json(&routes)?;
            Ok(ExitCode::SUCCESS)
        },
        None => {
            eprintln!("Stop {stop_id} not found");
            Ok(ExitCode::FAILURE)
        },
    }
}

pub async fn stops(ctx: &Context, query: &str, limit: Option<u32>) -> anyhow::Result<ExitCode> {
    let result = ctx.query.autocomplete(query, limit).await?;
    print_json(&result)?;
    Ok(ExitCode::SUCCESS)
}

pub async fn health(ctx: &Context) -> anyhow::Result<ExitCode> {
    let port = SqliteDatabaseHealth::new(ctx.db.pool().clone());

    if !port.is_available().await {
        eprintln!("Database unavailable");
        return Ok(ExitCode::FAILURE);
    }

    let health = port.check_health().await?;
    if health.is_empty() {
        warn!("Database holds no routes yet; run the import command first");
    }
    print_json(&health)?;
    Ok(ExitCode::SUCCESS)
}
