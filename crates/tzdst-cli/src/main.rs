//! `tzdst` CLI — current local time and DST start/end dates for time zones.
//!
//! ## Usage
//!
//! ```sh
//! # Current time, DST state and this year's DST window for one zone
//! tzdst zone Europe/Berlin
//!
//! # Windows IDs work too; pin the year and the instant
//! tzdst zone "W. Europe Standard Time" --year 2025 --at 2025-07-01T10:00:00Z
//!
//! # Several zones at once (fails if any zone is unknown)
//! tzdst zones Europe/Berlin America/New_York Australia/Sydney
//!
//! # Only the DST window of a year
//! tzdst window America/New_York --year 2025
//!
//! # The adjustment rules behind the answers
//! tzdst rules Europe/Berlin --from-year 1990 --to-year 2030
//!
//! # Use zone definitions from a JSON file instead of the IANA database
//! tzdst --zones-file zones.json zone Test/Zone
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG` (default `warn`).

use anyhow::{Context, Result};
use chrono::{DateTime, Datelike, Utc};
use clap::{Parser, Subcommand};
use dst_engine::{find_window, StaticProvider, TzdbProvider, ZoneProvider};
use serde::Serialize;

#[derive(Parser)]
#[command(
    name = "tzdst",
    version,
    about = "Current local time and DST start/end dates for time zones"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// First year adjustment rules are derived for from the IANA database
    #[arg(long, global = true, env = "TZDST_FROM_YEAR", default_value_t = 1970)]
    from_year: i32,

    /// Last year adjustment rules are derived for from the IANA database
    #[arg(long, global = true, env = "TZDST_TO_YEAR", default_value_t = 2037)]
    to_year: i32,

    /// JSON file of zone definitions to use instead of the IANA database
    #[arg(long, global = true, env = "TZDST_ZONES_FILE")]
    zones_file: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report current time, DST state and DST window for one zone
    Zone {
        /// IANA name or Windows ID
        zone: String,
        /// Year of the DST window (defaults to the current year in the zone)
        #[arg(long, env = "TZDST_YEAR")]
        year: Option<i32>,
        /// Instant to report on, RFC 3339 (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },
    /// Report on several zones; any unknown zone fails the whole command
    Zones {
        #[arg(required = true)]
        zones: Vec<String>,
        /// Year of the DST windows (defaults to the current UTC year)
        #[arg(long, env = "TZDST_YEAR")]
        year: Option<i32>,
        /// Instant to report on, RFC 3339 (defaults to now)
        #[arg(long, value_parser = parse_instant)]
        at: Option<DateTime<Utc>>,
    },
    /// Print the DST window of one year, or null when the zone has none
    Window {
        zone: String,
        #[arg(long, env = "TZDST_YEAR")]
        year: i32,
    },
    /// Print the adjustment rules the provider has for a zone
    Rules { zone: String },
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let provider = build_provider(&cli)?;

    match cli.command {
        Commands::Zone { zone, year, at } => {
            let now = at.unwrap_or_else(Utc::now);
            let year = match year {
                Some(year) => year,
                None => provider
                    .local_time(&zone, now)
                    .with_context(|| format!("Failed to look up time zone: {}", zone))?
                    .year(),
            };
            let report = dst_engine::zone_report(provider.as_ref(), &zone, now, year)
                .with_context(|| format!("Failed to build report for {}", zone))?;
            print_json(&report)?;
        }
        Commands::Zones { zones, year, at } => {
            let now = at.unwrap_or_else(Utc::now);
            let year = year.unwrap_or_else(|| now.year());
            let zone_refs: Vec<&str> = zones.iter().map(|s| s.as_str()).collect();
            let reports = dst_engine::zone_reports(provider.as_ref(), &zone_refs, now, year)
                .context("Could not find timezone")?;
            print_json(&reports)?;
        }
        Commands::Window { zone, year } => {
            let rules = provider
                .adjustment_rules(&zone)
                .with_context(|| format!("Failed to look up time zone: {}", zone))?;
            let window = find_window(year, &rules)
                .with_context(|| format!("Failed to resolve DST window for {} in {}", zone, year))?;
            print_json(&window)?;
        }
        Commands::Rules { zone } => {
            let rules = provider
                .adjustment_rules(&zone)
                .with_context(|| format!("Failed to look up time zone: {}", zone))?;
            print_json(&rules)?;
        }
    }

    Ok(())
}

fn build_provider(cli: &Cli) -> Result<Box<dyn ZoneProvider>> {
    match cli.zones_file.as_deref() {
        Some(path) => {
            log::debug!("using zone definitions from {}", path);
            let json = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read file: {}", path))?;
            let provider = StaticProvider::from_json(&json)
                .with_context(|| format!("Failed to parse zone definitions: {}", path))?;
            Ok(Box::new(provider))
        }
        None => {
            log::debug!("deriving IANA rules for {}..={}", cli.from_year, cli.to_year);
            let provider = TzdbProvider::with_years(cli.from_year, cli.to_year)
                .context("Invalid --from-year/--to-year")?;
            Ok(Box::new(provider))
        }
    }
}

fn parse_instant(raw: &str) -> std::result::Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp: {}", e))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", pretty);
    Ok(())
}
