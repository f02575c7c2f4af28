//! Ramadan schedule CLI
//!
//! Loads a schedule configuration, picks the first day of the window and
//! prints the schedule as JSON on stdout.
//!
//! # Usage
//!
//! ```bash
//! # Use ./ramadan.toml (or ramadan_core/ramadan.toml)
//! cargo run --bin ramadan-schedule
//!
//! # Explicit configuration file and year
//! RAMADAN_CONFIG=/etc/ramadan.toml RAMADAN_YEAR=2026 cargo run --bin ramadan-schedule
//! ```
//!
//! # Environment Variables
//!
//! - `RAMADAN_CONFIG`: Path to the TOML configuration file
//! - `RAMADAN_YEAR`: Gregorian year to build the schedule for (overrides `schedule.year`)
//! - `RUST_LOG`: Log level (default: info)

use std::env;

use anyhow::{Context, Result};
use chrono::{Datelike, Local};
use serde::Serialize;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use ramadan_core::config::ScheduleConfig;
use ramadan_core::core::GeoCoordinate;
use ramadan_core::services::{select_anchor, ScheduleAnchor, ScheduleEntry};

#[derive(Serialize)]
struct ScheduleReport<'a> {
    location: GeoCoordinate,
    convention: &'a str,
    calendar: &'a str,
    anchor: ScheduleAnchor,
    entries: Vec<ScheduleEntry>,
}

fn load_config() -> Result<ScheduleConfig> {
    match env::var("RAMADAN_CONFIG") {
        Ok(path) => ScheduleConfig::from_file(&path)
            .with_context(|| format!("loading configuration from {}", path)),
        Err(_) => ScheduleConfig::from_default_location().context("loading configuration"),
    }
}

fn main() -> Result<()> {
    FmtSubscriber::builder()
        .with_max_level(
            env::var("RUST_LOG")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(Level::INFO),
        )
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let config = load_config()?;
    let coord = config.coordinate().context("resolving location")?;
    let builder = config.schedule_builder().context("building calculation settings")?;

    let today = Local::now().date_naive();
    let year = match env::var("RAMADAN_YEAR") {
        Ok(value) => value
            .parse::<i32>()
            .with_context(|| format!("RAMADAN_YEAR must be a year, got '{}'", value))?,
        Err(_) => config.schedule.year.unwrap_or_else(|| today.year()),
    };

    let anchor = select_anchor(year, today, builder.mapper());
    info!(
        "Building {} days for {} from {} ({:?} mode)",
        config.schedule.window_days, coord, anchor.date, anchor.mode
    );

    let entries = builder
        .build(&coord, anchor.date, config.schedule.window_days, today)
        .context("computing schedule")?;

    let report = ScheduleReport {
        location: coord,
        convention: &builder.engine().convention().name,
        calendar: builder.mapper().calendar().name(),
        anchor,
        entries,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
