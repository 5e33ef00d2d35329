// dayhist-core/src/engine.rs
//! The historic aggregation pipeline.
//!
//! A [`HistoryEngine`] owns one sensor's configuration and runs
//! date generation, statistics fetch, field extraction and aggregation as a
//! single pass producing a [`ComputedValue`].
//!
//! License: MIT OR APACHE 2.0

use chrono::NaiveDate;
use log::{debug, warn};
use std::sync::Arc;

use crate::config::SensorConfig;
use crate::dates::target_dates;
use crate::errors::DayhistError;
use crate::extractor::extract_samples;
use crate::reader::StatisticsReader;
use crate::record::{ComputedValue, Reading};
use crate::validators::{validate_source, EntityRegistry};

pub struct HistoryEngine {
    config: SensorConfig,
    reader: Arc<dyn StatisticsReader>,
    unit: Option<String>,
    lower_bound: Option<NaiveDate>,
}

impl HistoryEngine {
    /// Creates an engine with no unit and no known lower bound.
    pub fn new(config: SensorConfig, reader: Arc<dyn StatisticsReader>) -> Self {
        Self {
            config,
            reader,
            unit: None,
            lower_bound: None,
        }
    }

    /// Validates the source against `registry` and takes its unit and
    /// first-recorded date from there.
    pub fn from_registry(
        config: SensorConfig,
        reader: Arc<dyn StatisticsReader>,
        registry: &dyn EntityRegistry,
    ) -> Result<Self, DayhistError> {
        config.validate()?;
        let info = validate_source(registry, &config.source_entity_id)?;
        Ok(Self::new(config, reader)
            .with_unit(info.unit_of_measurement)
            .with_lower_bound(info.first_recorded))
    }

    pub fn with_unit(mut self, unit: Option<String>) -> Self {
        self.unit = unit;
        self
    }

    pub fn with_lower_bound(mut self, lower_bound: Option<NaiveDate>) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    pub fn config(&self) -> &SensorConfig {
        &self.config
    }

    pub fn unit(&self) -> Option<&str> {
        self.unit.as_deref()
    }

    /// Runs one full pass for the reference date `today`.
    ///
    /// An empty result is not an error: it yields [`Reading::Unknown`] with a
    /// sample count of zero.
    pub async fn compute(&self, today: NaiveDate) -> Result<ComputedValue, DayhistError> {
        let source = &self.config.source_entity_id;
        let dates = target_dates(today, self.config.historic_range, self.lower_bound);

        let records = self.reader.fetch(source, &dates).await?;
        debug!(
            "Fetched {} of {} requested dates for {}",
            records.len(),
            dates.len(),
            source
        );

        let samples = extract_samples(records.values(), self.config.track_value);
        if samples.is_empty() {
            warn!("No historical data found for {}", source);
        }

        let value = Reading::from(self.config.aggregation.apply(&samples));
        debug!(
            "{} of {} {} samples for {}: {}",
            self.config.aggregation,
            samples.len(),
            self.config.track_value,
            source,
            value
        );

        Ok(ComputedValue {
            value,
            unit: self.unit.clone(),
            sample_count: samples.len(),
        })
    }
}
