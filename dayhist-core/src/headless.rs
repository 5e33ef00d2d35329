// File: dayhist-core/src/headless.rs

//! `headless.rs`
//! Convenience wrappers for using the pipeline without a scheduler.
//! Provides one-shot computation for a whole configuration file.

use chrono::NaiveDate;
use log::info;
use std::sync::Arc;

use crate::config::{SensorConfig, SensorsConfig};
use crate::engine::HistoryEngine;
use crate::errors::DayhistError;
use crate::reader::StatisticsReader;
use crate::record::ComputedValue;
use crate::sensor::SensorDescriptor;
use crate::validators::EntityRegistry;

/// Outcome of a one-shot computation for a single configured sensor.
#[derive(Debug)]
pub struct HeadlessResult {
    pub descriptor: SensorDescriptor,
    pub result: Result<ComputedValue, DayhistError>,
}

/// Computes one sensor's value for `today`.
///
/// With a registry the source is validated first and its unit and
/// first-recorded date are used; without one the fallback lookback applies.
pub async fn headless_compute(
    config: SensorConfig,
    reader: Arc<dyn StatisticsReader>,
    registry: Option<&dyn EntityRegistry>,
    today: NaiveDate,
) -> Result<ComputedValue, DayhistError> {
    let engine = match registry {
        Some(registry) => HistoryEngine::from_registry(config, reader, registry)?,
        None => {
            config.validate()?;
            HistoryEngine::new(config, reader)
        }
    };
    engine.compute(today).await
}

/// Computes every sensor in `sensors` for `today`, in file order.
///
/// A failing sensor does not stop the others; its error is reported in
/// its own [`HeadlessResult`].
pub async fn headless_compute_all(
    sensors: &SensorsConfig,
    reader: Arc<dyn StatisticsReader>,
    registry: Option<&dyn EntityRegistry>,
    today: NaiveDate,
) -> Vec<HeadlessResult> {
    let mut results = Vec::with_capacity(sensors.sensors.len());
    for (instance_id, config) in sensors.instances() {
        let unit = registry
            .and_then(|r| r.entity(&config.source_entity_id))
            .and_then(|info| info.unit_of_measurement);
        let descriptor = SensorDescriptor::new(&instance_id, config, unit);
        let result = headless_compute(config.clone(), Arc::clone(&reader), registry, today).await;
        results.push(HeadlessResult { descriptor, result });
    }
    info!("Computed {} sensors for {}", results.len(), today);
    results
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Aggregation, HistoricRange, TrackValue, UpdateFrequency};
    use crate::reader::MemoryStore;
    use crate::record::{Reading, StatisticRecord};
    use anyhow::Result;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_headless_compute_without_registry() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                "sensor.rain",
                (1..=4).map(|month| StatisticRecord {
                    date: ymd(2025, month, 10),
                    max: Some(month as f64),
                    ..Default::default()
                }),
            )
            .await;

        let config = SensorConfig {
            source_entity_id: "sensor.rain".to_string(),
            track_value: TrackValue::Max,
            aggregation: Aggregation::Median,
            historic_range: HistoricRange::Monthly,
            update_frequency: UpdateFrequency::Hourly,
        };

        let value = headless_compute(config, store, None, ymd(2025, 5, 10)).await?;
        assert_eq!(value.sample_count, 4);
        assert_eq!(value.value, Reading::Value(2.5));
        assert_eq!(value.unit, None);
        Ok(())
    }

    #[tokio::test]
    async fn test_headless_compute_all_reports_each_sensor() -> Result<()> {
        let store = Arc::new(MemoryStore::new());
        store
            .insert(
                "sensor.a",
                vec![StatisticRecord { date: ymd(2024, 6, 1), state: Some(3.0), ..Default::default() }],
            )
            .await;

        let sensors = SensorsConfig::from_yaml(
            r#"
sensors:
  - source_entity_id: sensor.a
    track_value: state
    aggregation: mean
    historic_range: annual
    update_frequency: daily
  - source_entity_id: sensor.gone
    track_value: state
    aggregation: mean
    historic_range: annual
    update_frequency: daily
"#,
        )?;

        let results = headless_compute_all(&sensors, store, None, ymd(2025, 6, 1)).await;
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].result.as_ref().unwrap().value, Reading::Value(3.0));
        assert!(matches!(results[1].result, Err(DayhistError::SourceNotFound(_))));
        assert_eq!(results[1].descriptor.unique_id, "1_sensor.gone");
        Ok(())
    }
}
