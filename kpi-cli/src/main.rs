//! KPI CLI - intern portal dashboards in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;
mod output;

use commands::{calendar, dashboard, parse, status};

/// KPI - membership, partner and sales dashboards from spreadsheet exports
#[derive(Parser)]
#[command(name = "kpi", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show configured spreadsheet sources
    Status {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Fetch every source and print the dashboard for a business vertical
    Dashboard {
        /// Business vertical (career or design)
        #[arg(long, default_value = "career")]
        business: String,
        /// Sort rows by year/month before accumulating
        #[arg(long)]
        chronological: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Parse a local CSV export through the KPI pipeline
    Parse {
        /// Path to CSV file
        file: PathBuf,
        /// Metric family (membership, partner, sales)
        #[arg(long)]
        family: String,
        /// Sort rows by year/month before accumulating
        #[arg(long)]
        chronological: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show upcoming calendar events (this month and next)
    Calendar {
        /// Reference date (YYYY-MM-DD), defaults to today
        #[arg(long)]
        today: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Replace job-fair events with rows from an event sheet CSV export
    CalendarImport {
        /// Path to CSV file
        file: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

/// Log filter: `KPI_LOG`, then `RUST_LOG`, else warnings only
fn resolve_env_filter() -> EnvFilter {
    if let Ok(level) = std::env::var("KPI_LOG") {
        if let Ok(filter) = EnvFilter::try_new(level) {
            return filter;
        }
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
}

/// Logs go to stderr so `--json` output stays parseable
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(resolve_env_filter())
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn main() -> ExitCode {
    init_tracing();

    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Status { json } => status::run(json),
        Commands::Dashboard { business, chronological, json } => {
            dashboard::run(&business, chronological, json)
        }
        Commands::Parse { file, family, chronological, json } => {
            parse::run(&file, &family, chronological, json)
        }
        Commands::Calendar { today, json } => calendar::run(today.as_deref(), json),
        Commands::CalendarImport { file, json } => calendar::run_import(&file, json),
    }
}
