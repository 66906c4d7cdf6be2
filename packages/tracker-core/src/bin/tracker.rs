//! Tracker CLI - Command line interface for portfolio analysis.
//!
//! Reads a snapshot file and prints JSON for integration with other tools.

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};
use tracker_core::{ApiResponse, Snapshot, TrackerConfig};

#[derive(Parser)]
#[command(name = "tracker")]
#[command(about = "Portfolio tracker CLI - performance analysis of account transactions")]
#[command(version)]
struct Cli {
    /// Config file (defaults to ~/.tracker/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze all accounts and each account separately
    Report {
        #[command(flatten)]
        source: SourceArgs,
        /// Day to analyze as of (defaults to today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// Analyze a single account
    Account {
        /// Account ID
        #[arg(short, long)]
        id: String,
        #[command(flatten)]
        source: SourceArgs,
        /// Day to analyze as of (defaults to today, UTC)
        #[arg(long)]
        as_of: Option<NaiveDate>,
    },
    /// List the merged, date-ordered transactions
    Transactions {
        /// Account ID (all accounts when omitted)
        #[arg(short, long)]
        id: Option<String>,
        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(clap::Args)]
struct SourceArgs {
    /// Snapshot JSON file (overrides the config)
    #[arg(short, long)]
    snapshot: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match cli.config.as_deref() {
        Some(path) => TrackerConfig::load_from_path(path),
        None => TrackerConfig::load(),
    };
    let config = match config {
        Ok(config) => config,
        Err(e) => {
            init_logging(None);
            return print_error(format!("Failed to load config: {}", e));
        }
    };

    init_logging(config.log_filter.as_deref());

    match run(cli.command, &config) {
        Ok(output) => {
            println!("{}", output);
            ExitCode::SUCCESS
        }
        Err(e) => print_error(e.to_string()),
    }
}

fn init_logging(filter: Option<&str>) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(filter.unwrap_or("info")));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(command: Commands, config: &TrackerConfig) -> Result<String> {
    match command {
        Commands::Report { source, as_of } => {
            let snapshot = load_snapshot(&source, config)?;
            let report = snapshot.report(as_of.unwrap_or_else(today), config.display.clone());
            to_json(&ApiResponse::ok(report))
        }
        Commands::Account { id, source, as_of } => {
            let snapshot = load_snapshot(&source, config)?;
            let report = snapshot.report(as_of.unwrap_or_else(today), config.display.clone());
            let portfolio = report.account(&id)?;
            to_json(&ApiResponse::ok(portfolio))
        }
        Commands::Transactions { id, source } => {
            let snapshot = load_snapshot(&source, config)?;
            let transactions = snapshot.merged_transactions(id.as_deref())?;
            to_json(&ApiResponse::ok(transactions))
        }
    }
}

fn load_snapshot(source: &SourceArgs, config: &TrackerConfig) -> Result<Snapshot> {
    let path = source
        .snapshot
        .clone()
        .unwrap_or_else(|| config.snapshot_path());
    tracing::debug!("Reading snapshot from {}", path.display());
    Ok(Snapshot::load_from_path(&path)?)
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn print_error(message: String) -> ExitCode {
    tracing::error!("{}", message);
    match to_json(&ApiResponse::<()>::err(message.clone())) {
        Ok(output) => println!("{}", output),
        Err(_) => println!("{{\"ok\":false,\"error\":{:?}}}", message),
    }
    ExitCode::FAILURE
}
