// dayhist/src/cli.rs
//! This file defines the command-line interface (CLI) for the dayhist application,
//! including all available commands and their arguments.

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use dayhist_core::HistoricRange;
use std::path::PathBuf;

/// Top-level CLI definition.
#[derive(Parser, Debug)]
#[command(
    name = "dayhist",
    author = "Relay",
    version = env!("CARGO_PKG_VERSION"),
    about = "Historic day-of-month sensors from long-term statistics",
    long_about = "dayhist derives a sensor value from an entity's long-term statistics recorded on the same calendar day in previous years (annual) or previous months (monthly), aggregated as maximum, minimum, median, mean or standard deviation.",
    arg_required_else_help = true,
)]
pub struct Cli {
    /// Disable informational messages
    #[arg(long, short = 'q', global = true, help = "Suppress all informational and debug messages.")]
    pub quiet: bool,

    /// Enable debug logging (overrides RUST_LOG)
    #[arg(long, short = 'd', global = true, help = "Enable debug logging.")]
    pub debug: bool,

    /// The subcommand to run
    #[command(subcommand)]
    pub command: Commands,
}

/// All available commands for the `dayhist` CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Prints the historic target dates for a reference day.
    #[command(about = "Prints the historic target dates for a reference day.")]
    Dates(DatesCommand),

    /// Computes every configured sensor once and prints the results.
    #[command(about = "Computes every configured sensor once and prints the results.")]
    Compute(ComputeCommand),

    /// Validates every configured source entity against the registry.
    #[command(about = "Validates every configured source entity against the registry.")]
    Validate(ValidateCommand),

    /// Runs the refresh schedulers until interrupted.
    #[command(about = "Runs the refresh schedulers until interrupted (Ctrl+C).")]
    Run(RunCommand),
}

/// Arguments for the `dates` command.
#[derive(Parser, Debug)]
pub struct DatesCommand {
    /// Historic range to generate.
    #[arg(long = "range", value_name = "RANGE", help = "Historic range: 'annual' or 'monthly'.")]
    pub range: RangeChoice,

    /// Reference date (defaults to today).
    #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Reference date; defaults to today.")]
    pub date: Option<NaiveDate>,

    /// Earliest date data could exist.
    #[arg(long = "since", value_name = "YYYY-MM-DD", help = "Earliest date data could exist; a fixed lookback is used when omitted.")]
    pub since: Option<NaiveDate>,
}

/// Arguments for the `compute` command.
#[derive(Parser, Debug)]
pub struct ComputeCommand {
    /// Path to the sensor configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "DAYHIST_CONFIG", help = "Path to the sensor configuration file (YAML).")]
    pub config: PathBuf,

    /// Path to the statistics store (JSON).
    #[arg(long = "store", short = 's', value_name = "FILE", env = "DAYHIST_STORE", help = "Path to the statistics store (JSON).")]
    pub store: PathBuf,

    /// Path to the entity registry (JSON).
    #[arg(long = "registry", short = 'r', value_name = "FILE", env = "DAYHIST_REGISTRY", help = "Path to the entity registry (JSON); enables validation, units and lower bounds.")]
    pub registry: Option<PathBuf>,

    /// Reference date (defaults to today).
    #[arg(long = "date", value_name = "YYYY-MM-DD", help = "Reference date; defaults to today.")]
    pub date: Option<NaiveDate>,

    /// Print results as JSON to stdout.
    #[arg(long = "json", help = "Print results as JSON instead of a table.")]
    pub json: bool,
}

/// Arguments for the `validate` command.
#[derive(Parser, Debug)]
pub struct ValidateCommand {
    /// Path to the sensor configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "DAYHIST_CONFIG", help = "Path to the sensor configuration file (YAML).")]
    pub config: PathBuf,

    /// Path to the entity registry (JSON).
    #[arg(long = "registry", short = 'r', value_name = "FILE", env = "DAYHIST_REGISTRY", help = "Path to the entity registry (JSON).")]
    pub registry: PathBuf,
}

/// Arguments for the `run` command.
#[derive(Parser, Debug)]
pub struct RunCommand {
    /// Path to the sensor configuration file (YAML).
    #[arg(long = "config", short = 'c', value_name = "FILE", env = "DAYHIST_CONFIG", help = "Path to the sensor configuration file (YAML).")]
    pub config: PathBuf,

    /// Path to the statistics store (JSON).
    #[arg(long = "store", short = 's', value_name = "FILE", env = "DAYHIST_STORE", help = "Path to the statistics store (JSON).")]
    pub store: PathBuf,

    /// Path to the entity registry (JSON).
    #[arg(long = "registry", short = 'r', value_name = "FILE", env = "DAYHIST_REGISTRY", help = "Path to the entity registry (JSON).")]
    pub registry: PathBuf,

    /// Where published values are persisted and restored from.
    #[arg(long = "state-file", value_name = "FILE", env = "DAYHIST_STATE_FILE", help = "File used to persist and restore published values.")]
    pub state_file: Option<PathBuf>,
}

/// Enum for selecting the historic range.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq)]
pub enum RangeChoice {
    /// Same month and day in previous years.
    Annual,
    /// Same day-of-month in previous months.
    Monthly,
}

impl From<RangeChoice> for HistoricRange {
    fn from(choice: RangeChoice) -> Self {
        match choice {
            RangeChoice::Annual => HistoricRange::Annual,
            RangeChoice::Monthly => HistoricRange::Monthly,
        }
    }
}
