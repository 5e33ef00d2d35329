// dayhist-core/src/record.rs
//! Data structures flowing through the aggregation pipeline: the per-date
//! statistics record read from the store and the computed sensor value.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Long-term statistics for one source on one calendar date.
///
/// Any field may be absent when the store never recorded it for that date.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct StatisticRecord {
    pub date: NaiveDate,
    #[serde(default)]
    pub mean: Option<f64>,
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub state: Option<f64>,
}

/// The value half of a [`ComputedValue`]: a number, or the distinguished
/// "unknown" state (which is not zero).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Reading {
    Value(f64),
    Unknown,
}

impl Reading {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Reading::Value(v) => Some(*v),
            Reading::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Reading::Unknown)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Reading::Unknown, Reading::Value)
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Reading::Value(v) => write!(f, "{}", v),
            Reading::Unknown => f.write_str("unknown"),
        }
    }
}

/// Result of one aggregation pass.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ComputedValue {
    pub value: Reading,
    /// Unit of measurement copied verbatim from the source entity.
    pub unit: Option<String>,
    /// Number of records whose tracked field was present.
    pub sample_count: usize,
}

impl fmt::Display for ComputedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.value, &self.unit) {
            (Reading::Value(v), Some(unit)) => write!(f, "{} {}", v, unit),
            (reading, _) => write!(f, "{}", reading),
        }
    }
}

/// What a sensor currently exposes to readers.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase", tag = "status")]
pub enum SensorState {
    /// Nothing has been published yet.
    Pending,
    Available(ComputedValue),
    /// The source disappeared; refreshing has stopped.
    Unavailable,
}

impl fmt::Display for SensorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SensorState::Pending => f.write_str("pending"),
            SensorState::Available(value) => write!(f, "{}", value),
            SensorState::Unavailable => f.write_str("unavailable"),
        }
    }
}
