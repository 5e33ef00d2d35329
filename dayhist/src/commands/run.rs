// dayhist/src/commands/run.rs
//! `dayhist run`: one refresh scheduler per configured sensor, until Ctrl+C.

use anyhow::{Context, Result};
use dayhist_core::{
    load_registry_file, Clock, EntityRegistry, HistoryEngine, JsonFileStore, RefreshScheduler, SensorDescriptor,
    SensorsConfig, StatisticsReader, SystemClock,
};
use log::{debug, info, warn};
use std::path::PathBuf;
use std::sync::Arc;

use crate::utils::app_state::{state_file_path, AppState};
use crate::utils::publisher::StatePublisher;

/// Options for [`run_schedulers`].
pub struct RunOptions {
    pub config: PathBuf,
    pub store: PathBuf,
    pub registry: PathBuf,
    pub state_file: Option<PathBuf>,
}

/// Builds every scheduler. Any invalid source aborts setup before a single
/// timer starts.
pub fn build_schedulers(
    sensors: &SensorsConfig,
    reader: Arc<dyn StatisticsReader>,
    registry: &dyn EntityRegistry,
    restored: &AppState,
    publisher: Arc<StatePublisher>,
) -> Result<Vec<Arc<RefreshScheduler>>> {
    let mut schedulers = Vec::with_capacity(sensors.sensors.len());
    for (instance_id, config) in sensors.instances() {
        let engine = HistoryEngine::from_registry(config.clone(), Arc::clone(&reader), registry)
            .with_context(|| format!("Failed to set up sensor '{}'", instance_id))?;
        let descriptor = SensorDescriptor::new(&instance_id, config, engine.unit().map(str::to_string));
        let mut scheduler = RefreshScheduler::new(descriptor, engine, publisher.clone());
        let previous = restored.restorable(&scheduler.descriptor().unique_id);
        if let Some(value) = previous {
            debug!("Restored {} = {}", scheduler.descriptor().name, value);
            scheduler = scheduler.with_restored(value);
        }
        schedulers.push(Arc::new(scheduler));
    }
    Ok(schedulers)
}

/// Runs all schedulers until Ctrl+C, then tears them down.
pub async fn run_schedulers(opts: RunOptions) -> Result<()> {
    let sensors = SensorsConfig::load_from_file(&opts.config)?;
    let registry = load_registry_file(&opts.registry)?;
    let state_path = state_file_path(opts.state_file.as_deref())?;
    let restored = AppState::load(&state_path)?;
    let publisher = Arc::new(StatePublisher::new(restored.clone(), state_path.clone()));
    let reader: Arc<dyn StatisticsReader> = Arc::new(JsonFileStore::new(&opts.store));

    let schedulers = build_schedulers(&sensors, reader, &registry, &restored, publisher)?;
    info!(
        "Starting {} sensors; state file: {}",
        schedulers.len(),
        state_path.display()
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let handles: Vec<_> = schedulers
        .iter()
        .map(|s| Arc::clone(s).spawn(Arc::clone(&clock)))
        .collect();

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for Ctrl+C")?;
    info!("Shutting down");

    for scheduler in &schedulers {
        scheduler.teardown().await;
    }
    for handle in handles {
        if let Err(e) = handle.await {
            warn!("Scheduler task ended abnormally: {}", e);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dayhist_core::{
        Aggregation, ComputedValue, EntityInfo, HistoricRange, MemoryStore, Reading, SensorConfig,
        SensorEntry, SensorState, TrackValue, UpdateFrequency,
    };
    use std::collections::BTreeMap;

    fn sensors(source: &str) -> SensorsConfig {
        SensorsConfig {
            sensors: vec![SensorEntry {
                id: Some("outdoor".to_string()),
                config: SensorConfig {
                    source_entity_id: source.to_string(),
                    track_value: TrackValue::Mean,
                    aggregation: Aggregation::Mean,
                    historic_range: HistoricRange::Annual,
                    update_frequency: UpdateFrequency::Daily,
                },
            }],
        }
    }

    fn registry() -> BTreeMap<String, EntityInfo> {
        let mut map = BTreeMap::new();
        map.insert(
            "sensor.outdoor".to_string(),
            EntityInfo {
                domain: "sensor".to_string(),
                state: Some("12.5".to_string()),
                state_class: Some("measurement".to_string()),
                unit_of_measurement: Some("°C".to_string()),
                first_recorded: NaiveDate::from_ymd_opt(2020, 1, 1),
            },
        );
        map
    }

    #[test_log::test(tokio::test)]
    async fn build_restores_previous_value() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Arc::new(StatePublisher::new(AppState::new(), dir.path().join("s.json")));
        let reader: Arc<dyn StatisticsReader> = Arc::new(MemoryStore::new());
        let sensors = sensors("sensor.outdoor");

        let value = ComputedValue { value: Reading::Value(9.0), unit: Some("°C".into()), sample_count: 2 };
        let probe = build_schedulers(&sensors, Arc::clone(&reader), &registry(), &AppState::new(), publisher.clone())
            .unwrap();
        let mut restored = AppState::new();
        restored.record(probe[0].descriptor(), &SensorState::Available(value.clone()));

        let schedulers = build_schedulers(&sensors, reader, &registry(), &restored, publisher).unwrap();
        assert_eq!(schedulers.len(), 1);
        assert_eq!(schedulers[0].current().await, SensorState::Available(value));
        assert_eq!(schedulers[0].descriptor().unit_of_measurement.as_deref(), Some("°C"));
    }

    #[test]
    fn build_fails_for_unknown_source() {
        let dir = tempfile::tempdir().unwrap();
        let publisher = Arc::new(StatePublisher::new(AppState::new(), dir.path().join("s.json")));
        let reader: Arc<dyn StatisticsReader> = Arc::new(MemoryStore::new());
        let Err(err) = build_schedulers(&sensors("sensor.missing"), reader, &registry(), &AppState::new(), publisher)
        else {
            panic!("setup should fail for an unknown source");
        };
        assert!(format!("{:#}", err).contains("Entity not found"));
    }
}
