//! `availability` CLI: list free working-hour slots across several calendars.
//!
//! ## Usage
//!
//! ```sh
//! # Today's remaining free time (free/busy data on stdin)
//! cat freebusy.json | availability
//!
//! # Five working days starting on a given date
//! availability -d 2026-03-16 -n 5 -b freebusy.json
//!
//! # Include weekends, machine-readable output
//! availability -n 7 --weekends --format json -b freebusy.json
//!
//! # Keep going when a calendar cannot be read (output is flagged INCOMPLETE)
//! availability -n 3 --allow-partial -b freebusy.json
//! ```

use anyhow::{Context, Result};
use availability_engine::render::{render_json, render_text};
use availability_engine::{
    compute_availability, AvailabilityRequest, Config, FailurePolicy, FreeBusyDocument,
    MAX_DAYS,
};
use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "availability",
    version,
    about = "Find free working-hour slots across several calendars"
)]
struct Cli {
    /// Number of days to scan (weekends are not counted unless --weekends)
    #[arg(
        short = 'n',
        long = "days",
        default_value_t = 1,
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_DAYS))
    )]
    days: u32,

    /// First day to scan, YYYY-MM-DD (defaults to today in the home timezone)
    #[arg(short = 'd', long = "date")]
    date: Option<NaiveDate>,

    /// Include Saturday and Sunday
    #[arg(long)]
    weekends: bool,

    /// Configuration file (defaults to <config dir>/availability/calendars.json)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Free/busy response document (reads from stdin if omitted)
    #[arg(short, long)]
    busy: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Hide free slots shorter than this many minutes
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    min_minutes: Option<i64>,

    /// Report without calendars that cannot be read instead of failing
    #[arg(long)]
    allow_partial: bool,

    /// Evaluate as if the current time were this RFC 3339 instant
    #[arg(long)]
    now: Option<DateTime<Utc>>,

    /// Log progress to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config_path = match cli.config {
        Some(path) => path,
        None => default_config_path()
            .context("Could not determine the configuration directory; pass --config")?,
    };
    let config = Config::load(&config_path).with_context(|| {
        format!(
            "Failed to load configuration from {}",
            config_path.display()
        )
    })?;

    let busy_json = read_input(cli.busy.as_deref())?;
    let document =
        FreeBusyDocument::from_json(&busy_json).context("Failed to parse free/busy data")?;

    let now = cli.now.unwrap_or_else(Utc::now);
    let start_date = cli
        .date
        .unwrap_or_else(|| now.with_timezone(&config.timezone).date_naive());

    let request = AvailabilityRequest {
        start_date,
        days: cli.days,
        include_weekends: cli.weekends || config.include_weekends,
        failure_policy: if cli.allow_partial {
            FailurePolicy::MarkIncomplete
        } else {
            FailurePolicy::FailFast
        },
        min_duration_minutes: cli.min_minutes,
    };
    tracing::debug!(
        start = %request.start_date,
        days = request.days,
        weekends = request.include_weekends,
        now = %now,
        "scanning"
    );

    let report = compute_availability(&config, &request, &document, now)
        .context("Failed to compute availability")?;

    match cli.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => {
            let json = render_json(&report).context("Failed to serialize report")?;
            println!("{}", json);
        }
    }

    Ok(())
}

/// Logs go to stderr so stdout stays clean for piping.
fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "availability_cli=debug,availability_engine=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(io::stderr)
        .init();
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("availability").join("calendars.json"))
}

fn read_input(path: Option<&Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}
