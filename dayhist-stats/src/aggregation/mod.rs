// dayhist-stats/src/aggregation/mod.rs
//! Reduction of a present-sample sequence to a single value.
//!
//! `None` is the "unknown" result. It is returned for an empty sequence
//! under every aggregation, and for a single sample under
//! [`Aggregation::StdDev`]. Exactly two samples under `StdDev` yield `0.0`.

use core::fmt;
use core::str::FromStr;

use crate::selection::{max, median, min};
use crate::statistics::{compute_stats, mean};
use crate::Sample;

/// The reduction function applied to the filtered samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Aggregation {
    #[cfg_attr(feature = "serde", serde(rename = "maximum", alias = "max"))]
    Max,
    #[cfg_attr(feature = "serde", serde(rename = "minimum", alias = "min"))]
    Min,
    #[cfg_attr(feature = "serde", serde(rename = "median"))]
    Median,
    #[cfg_attr(feature = "serde", serde(rename = "mean"))]
    Mean,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "standard deviation", alias = "stddev", alias = "std_dev")
    )]
    StdDev,
}

impl Aggregation {
    pub const ALL: [Aggregation; 5] = [
        Aggregation::Max,
        Aggregation::Min,
        Aggregation::Median,
        Aggregation::Mean,
        Aggregation::StdDev,
    ];

    /// Long, human-facing label (e.g. `"standard deviation"`).
    pub fn label(&self) -> &'static str {
        match self {
            Aggregation::Max => "maximum",
            Aggregation::Min => "minimum",
            Aggregation::Median => "median",
            Aggregation::Mean => "mean",
            Aggregation::StdDev => "standard deviation",
        }
    }

    /// Short option name (e.g. `"stddev"`).
    pub fn short_name(&self) -> &'static str {
        match self {
            Aggregation::Max => "max",
            Aggregation::Min => "min",
            Aggregation::Median => "median",
            Aggregation::Mean => "mean",
            Aggregation::StdDev => "stddev",
        }
    }

    /// Applies this aggregation to `values`. See [`aggregate`].
    pub fn apply(&self, values: &[Sample]) -> Option<f64> {
        aggregate(*self, values)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a string names no known aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseAggregationError;

impl fmt::Display for ParseAggregationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected one of: max, min, median, mean, stddev")
    }
}

impl FromStr for Aggregation {
    type Err = ParseAggregationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Aggregation::ALL
            .into_iter()
            .find(|a| a.short_name().eq_ignore_ascii_case(s) || a.label().eq_ignore_ascii_case(s))
            .ok_or(ParseAggregationError)
    }
}

/// Reduces `values` with the given aggregation.
///
/// The result does not depend on the order of `values`.
pub fn aggregate(kind: Aggregation, values: &[Sample]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }

    match kind {
        Aggregation::Max => max(values),
        Aggregation::Min => min(values),
        Aggregation::Median => median(values),
        Aggregation::Mean => mean(values),
        Aggregation::StdDev => match values.len() {
            1 => None,
            // Two samples are pinned to zero rather than their true spread.
            2 => Some(0.0),
            _ => compute_stats(values).map(|stats| stats.std_dev),
        },
    }
}
