// dayhist/src/commands/dates.rs
//! `dayhist dates`: prints the historic target dates for a reference day.

use anyhow::Result;
use chrono::{Local, NaiveDate};
use dayhist_core::{target_dates, HistoricRange};
use std::io::Write;

/// Writes one ISO date per line, most recent first.
pub fn run_dates<W: Write>(
    out: &mut W,
    range: HistoricRange,
    date: Option<NaiveDate>,
    since: Option<NaiveDate>,
) -> Result<()> {
    let reference = date.unwrap_or_else(|| Local::now().date_naive());
    for target in target_dates(reference, range, since) {
        writeln!(out, "{}", target.format("%Y-%m-%d"))?;
    }
    Ok(())
}
