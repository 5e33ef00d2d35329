//! Configuration management for `dayhist-core`.
//!
//! This module defines the per-sensor configuration (`SensorConfig`) and the
//! file-level container (`SensorsConfig`). It handles deserialization of YAML
//! configurations and validates them before any sensor is set up.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use crate::errors::DayhistError;

pub use dayhist_stats::Aggregation;

/// Which field of a statistics record feeds the aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrackValue {
    Mean,
    Min,
    Max,
    State,
}

/// The calendar-matching filter applied to history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoricRange {
    /// Same month and day across previous years.
    Annual,
    /// Same day-of-month across previous months.
    Monthly,
}

/// How often the pipeline re-runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequency {
    Hourly,
    Daily,
}

impl TrackValue {
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackValue::Mean => "mean",
            TrackValue::Min => "min",
            TrackValue::Max => "max",
            TrackValue::State => "state",
        }
    }
}

impl HistoricRange {
    pub fn as_str(&self) -> &'static str {
        match self {
            HistoricRange::Annual => "annual",
            HistoricRange::Monthly => "monthly",
        }
    }
}

impl UpdateFrequency {
    pub fn as_str(&self) -> &'static str {
        match self {
            UpdateFrequency::Hourly => "hourly",
            UpdateFrequency::Daily => "daily",
        }
    }
}

impl fmt::Display for TrackValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HistoricRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for UpdateFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Configuration of a single historic sensor. Every field is required.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorConfig {
    /// Entity whose long-term statistics are aggregated (e.g. "sensor.outdoor_temp").
    pub source_entity_id: String,
    pub track_value: TrackValue,
    pub aggregation: Aggregation,
    pub historic_range: HistoricRange,
    pub update_frequency: UpdateFrequency,
}

/// A configured sensor together with its instance identifier.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorEntry {
    /// Instance id; the entry's position in the file is used when omitted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub config: SensorConfig,
}

/// Represents the top-level configuration file.
#[derive(Debug, Default, Clone, PartialEq, Deserialize, Serialize)]
pub struct SensorsConfig {
    pub sensors: Vec<SensorEntry>,
}

impl SensorConfig {
    /// Checks the constraints serde cannot express.
    pub fn validate(&self) -> Result<(), DayhistError> {
        if self.source_entity_id.trim().is_empty() {
            return Err(DayhistError::InvalidConfig(
                "source_entity_id must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl SensorsConfig {
    /// Loads sensor configuration from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading sensor configuration from: {}", path.display());
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml(&text)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;

        info!("Loaded {} sensors from file {}.", config.sensors.len(), path.display());
        Ok(config)
    }

    /// Parses and validates a YAML document.
    pub fn from_yaml(text: &str) -> Result<Self> {
        let config: SensorsConfig = serde_yml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates every entry and rejects a source configured twice.
    pub fn validate(&self) -> Result<(), DayhistError> {
        let mut seen: HashSet<&str> = HashSet::new();
        for entry in &self.sensors {
            entry.config.validate()?;
            if !seen.insert(entry.config.source_entity_id.as_str()) {
                return Err(DayhistError::DuplicateSource(
                    entry.config.source_entity_id.clone(),
                ));
            }
        }
        debug!("Validated {} sensor entries.", self.sensors.len());
        Ok(())
    }

    /// Iterates `(instance_id, config)` pairs, filling in positional ids.
    pub fn instances(&self) -> impl Iterator<Item = (String, &SensorConfig)> + '_ {
        self.sensors.iter().enumerate().map(|(index, entry)| {
            let id = entry.id.clone().unwrap_or_else(|| index.to_string());
            (id, &entry.config)
        })
    }
}
