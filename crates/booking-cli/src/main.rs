//! `booking` CLI — validate reservations, expand class schedules and list free
//! slots from JSON input.
//!
//! ## Usage
//!
//! ```sh
//! # Validate one reservation (stdin → stdout)
//! echo '{"date":"2024-03-21","start":"08:00","end":"09:00","occupied":[]}' | booking validate
//!
//! # Pin "now" for reproducible output
//! booking validate -i request.json --now 2024-03-20T03:00:00Z
//!
//! # Expand a weekly class schedule and validate every meeting
//! booking expand -i schedule.json --config config.json
//!
//! # List free slots within opening hours
//! booking free -i occupied.json --min-minutes 60
//! ```
//!
//! Verdicts are written to stdout as JSON. A rejected reservation still exits
//! with status 0; only unreadable input or configuration fails the command.
//! Set `RUST_LOG=debug` to see validation events on stderr.

use std::collections::BTreeMap;
use std::io::{self, Read};

use anyhow::{Context, Result};
use booking_engine::{
    expand_schedule, find_first_free_slot, find_free_slots, AcademicPeriod, CalendarDate,
    ClassSchedule, FixedClock, OccupiedInterval, ReservationRequest, Validator, ValidatorConfig,
};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "booking", version, about = "Room reservation validation CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file (timezone, opening hours, expansion cap)
    #[arg(long, global = true)]
    config: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate a reservation against the occupied intervals of its room and date
    Validate {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Reference instant as RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
    },
    /// Expand a weekly class schedule over a period and validate each meeting
    Expand {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Reference instant as RFC 3339 (defaults to the current time)
        #[arg(long)]
        now: Option<String>,
    },
    /// List free slots between occupied intervals within opening hours
    Free {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Only print the first slot at least this long
        #[arg(long)]
        min_minutes: Option<i64>,
    },
}

#[derive(Deserialize)]
struct ValidateInput {
    #[serde(flatten)]
    request: ReservationRequest,
    #[serde(default)]
    occupied: Vec<OccupiedInterval>,
}

#[derive(Deserialize)]
struct ExpandInput {
    schedule: ClassSchedule,
    period: AcademicPeriod,
    #[serde(default)]
    occupancy: BTreeMap<CalendarDate, Vec<OccupiedInterval>>,
}

#[derive(Deserialize)]
struct FreeInput {
    #[serde(default)]
    occupied: Vec<OccupiedInterval>,
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Validate { input, now } => {
            let validator = build_validator(&config, now.as_deref())?;
            let parsed: ValidateInput = parse_input(input.as_deref())?;
            let verdict = validator.validate(&parsed.request, &parsed.occupied);
            print_json(&verdict)?;
        }
        Commands::Expand { input, now } => {
            let validator = build_validator(&config, now.as_deref())?;
            let parsed: ExpandInput = parse_input(input.as_deref())?;
            let requests =
                expand_schedule(&parsed.schedule, &parsed.period, config.max_occurrences)
                    .context("Failed to expand class schedule")?;
            info!(count = requests.len(), "validating expanded series");
            let entries = validator.validate_series(&requests, &parsed.occupancy);
            print_json(&entries)?;
        }
        Commands::Free { input, min_minutes } => {
            let parsed: FreeInput = parse_input(input.as_deref())?;
            match min_minutes {
                Some(min) => {
                    let slot = find_first_free_slot(
                        &parsed.occupied,
                        config.opening,
                        config.closing,
                        min,
                    );
                    print_json(&slot)?;
                }
                None => {
                    let slots = find_free_slots(&parsed.occupied, config.opening, config.closing);
                    print_json(&slots)?;
                }
            }
        }
    }

    Ok(())
}

fn load_config(path: Option<&str>) -> Result<ValidatorConfig> {
    match path {
        Some(path) => {
            let raw = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file: {}", path))?;
            ValidatorConfig::from_json(&raw)
                .with_context(|| format!("Invalid config file: {}", path))
        }
        None => Ok(ValidatorConfig::default()),
    }
}

/// One reference instant per invocation, either pinned by `--now` or read
/// from the system clock.
fn build_validator(config: &ValidatorConfig, now: Option<&str>) -> Result<Validator<FixedClock>> {
    let instant = match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .with_context(|| format!("Invalid --now instant: {}", raw))?
            .with_timezone(&Utc),
        None => Utc::now(),
    };
    let timezone = config.timezone().context("Invalid timezone in config")?;
    Ok(Validator::with_clock(timezone, FixedClock(instant)))
}

fn parse_input<T: for<'de> Deserialize<'de>>(path: Option<&str>) -> Result<T> {
    let raw = read_input(path)?;
    serde_json::from_str(&raw).context("Failed to parse input JSON")
}

fn read_input(path: Option<&str>) -> Result<String> {
    match path {
        Some(path) => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read file: {}", path))
        }
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let pretty = serde_json::to_string_pretty(value)?;
    println!("{}", pretty);
    Ok(())
}
