//! RouteLens CLI
//!
//! Operator interface for importing route data and querying it.

#![allow(clippy::print_stdout, clippy::print_stderr)]

mod commands;

use std::{path::PathBuf, process::ExitCode};

use application::CommitMode;
use clap::{Parser, Subcommand, ValueEnum};
use infrastructure::{AppConfig, init_logging};

/// RouteLens CLI
#[derive(Parser)]
#[command(name = "routelens-cli")]
#[command(author, version, about = "RouteLens transit route importer and query tool", long_about = None)]
struct Cli {
    /// Verbosity level (overrides the configured log filter)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a configuration file (default: ./config.toml if present)
    #[arg(short, long, global = true, env = "ROUTELENS_CONFIG")]
    config: Option<PathBuf>,

    /// Database URL, overriding the configuration
    #[arg(long, global = true)]
    database: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create or upgrade the database schema
    Migrate,

    /// Import route payloads from a JSON file or a directory of them
    ///
    /// Prints the import report and exits non-zero if any payload failed.
    /// Example: routelens-cli import ./routes/
    Import {
        /// Payload file or directory
        path: PathBuf,

        /// Commit each payload separately or the whole batch at once
        #[arg(long, value_enum)]
        commit_mode: Option<CommitModeArg>,
    },

    /// Find routes going from one stop to another
    Search {
        /// Origin stop name
        from: String,

        /// Destination stop name
        to: String,
    },

    /// Show the full itinerary of a route
    Route {
        /// Route number, e.g. 20
        route_number: String,

        /// UP or DOWN (any case)
        direction: String,
    },

    /// List every route serving a stop
    StopRoutes {
        /// Stop id
        stop_id: i64,
    },

    /// Search stops by name prefix
    Stops {
        /// Name prefix (case-insensitive)
        query: String,

        /// Maximum number of results
        #[arg(short, long)]
        limit: Option<u32>,
    },

    /// Check database connectivity and contents
    Health,
}

/// Command-line spelling of [`CommitMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum CommitModeArg {
    PerPayload,
    Batch,
}

impl From<CommitModeArg> for CommitMode {
    fn from(arg: CommitModeArg) -> Self {
        match arg {
            CommitModeArg::PerPayload => Self::PerPayload,
            CommitModeArg::Batch => Self::Batch,
        }
    }
}

/// Determine log filter level from verbosity count, `None` keeps the configured one
const fn log_filter_from_verbosity(verbose: u8) -> Option<&'static str> {
    match verbose {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

/// Fold command-line overrides into the loaded configuration
fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(filter) = log_filter_from_verbosity(cli.verbose) {
        config.logging.filter = filter.to_string();
    }
    if let Some(url) = &cli.database {
        config.database.url.clone_from(url);
    }
    if let Commands::Import {
        commit_mode: Some(mode),
        ..
    } = &cli.command
    {
        config.import.commit_mode = (*mode).into();
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_overrides(&mut config, &cli);
    init_logging(&config.logging)?;

    let context = commands::Context::open(&config, matches!(cli.command, Commands::Migrate)).await?;

    let code = match cli.command {
        Commands::Migrate => commands::migrate(&context).await?,
        Commands::Import { path, .. } => commands::import(&context, &config, &path).await?,
        Commands::Search { from, to } => commands::search(&context, &from, &to).await?,
        Commands::Route {
            route_number,
            direction,
        } => commands::route(&context, &route_number, &direction).await?,
        Commands::StopRoutes { stop_id } => commands::stop_routes(&context, stop_id).await?,
        Commands::Stops { query, limit } => commands::stops(&context, &query, limit).await?,
        Commands::Health => commands::health(&context).await?,
    };

    context.close().await;
    Ok(code)
}
