// dayhist-core/tests/pipeline_tests.rs
use anyhow::Result;
use chrono::{FixedOffset, NaiveDate};
use std::io::Write;
use std::sync::Arc;
use tempfile::NamedTempFile;

use dayhist_core::{
    headless_compute, load_registry_file, Aggregation, DayhistError, HistoricRange, JsonFileStore,
    Reading, SensorConfig, SensorsConfig, TrackValue, UpdateFrequency,
};

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Buckets below are written in UTC; group them by UTC days.
fn utc_store(path: &std::path::Path) -> JsonFileStore {
    JsonFileStore::new(path).with_offset(FixedOffset::east_opt(0).unwrap())
}

fn write_temp(content: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(content.as_bytes())?;
    Ok(file)
}

const STATISTICS: &str = r#"{
    "sensor.energy": [
        { "start": "2024-03-17T22:00:00Z", "mean": 1.0, "state": 100.0 },
        { "start": "2024-03-17T23:00:00Z", "mean": 2.0, "state": 110.0 },
        { "start": "2023-03-17T23:00:00Z", "mean": 4.0, "state": 90.0 },
        { "start": "2022-03-17T23:00:00Z", "mean": 6.0 },
        { "start": "2021-03-16T23:00:00Z", "mean": 8.0, "state": 70.0 }
    ]
}"#;

const REGISTRY: &str = r#"{
    "sensor.energy": {
        "domain": "sensor",
        "state": "123.4",
        "state_class": "total_increasing",
        "unit_of_measurement": "kWh",
        "first_recorded": "2020-01-01"
    },
    "sensor.label": {
        "domain": "sensor",
        "state": "n/a",
        "state_class": "measurement"
    }
}"#;

fn energy(track_value: TrackValue, aggregation: Aggregation) -> SensorConfig {
    SensorConfig {
        source_entity_id: "sensor.energy".to_string(),
        track_value,
        aggregation,
        historic_range: HistoricRange::Annual,
        update_frequency: UpdateFrequency::Daily,
    }
}

#[test_log::test(tokio::test)]
async fn test_three_of_five_dates_with_mean_present() -> Result<()> {
    let stats = write_temp(STATISTICS)?;
    let registry = load_registry_file(write_temp(REGISTRY)?.path())?;
    let store = Arc::new(utc_store(stats.path()));

    // 2025-03-17 annual from 2020: five target dates, data on three of them.
    let value = headless_compute(
        energy(TrackValue::Mean, Aggregation::Mean),
        store,
        Some(&registry),
        ymd(2025, 3, 17),
    )
    .await?;

    assert_eq!(value.sample_count, 3);
    assert_eq!(value.value, Reading::Value(4.0));
    assert_eq!(value.unit.as_deref(), Some("kWh"));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_absent_field_reduces_sample_count() -> Result<()> {
    let stats = write_temp(STATISTICS)?;
    let registry = load_registry_file(write_temp(REGISTRY)?.path())?;
    let store = Arc::new(utc_store(stats.path()));

    let value = headless_compute(
        energy(TrackValue::State, Aggregation::StdDev),
        store,
        Some(&registry),
        ymd(2025, 3, 17),
    )
    .await?;

    // 2022 has no state: two samples, pinned to zero.
    assert_eq!(value.sample_count, 2);
    assert_eq!(value.value, Reading::Value(0.0));
    Ok(())
}

#[test_log::test(tokio::test)]
async fn test_invalid_source_is_reported_at_setup() -> Result<()> {
    let stats = write_temp(STATISTICS)?;
    let registry = load_registry_file(write_temp(REGISTRY)?.path())?;
    let store = Arc::new(utc_store(stats.path()));

    let mut config = energy(TrackValue::Mean, Aggregation::Mean);
    config.source_entity_id = "sensor.label".to_string();

    let err = headless_compute(config, store, Some(&registry), ymd(2025, 3, 17))
        .await
        .unwrap_err();
    match err {
        DayhistError::InvalidSource { reason, .. } => {
            assert_eq!(reason, "Entity must have a numeric state")
        }
        other => panic!("unexpected error: {other}"),
    }
    Ok(())
}

#[test]
fn test_load_sensors_from_file() -> Result<()> {
    let file = write_temp(
        r#"
sensors:
  - id: energy
    source_entity_id: sensor.energy
    track_value: state
    aggregation: minimum
    historic_range: monthly
    update_frequency: hourly
"#,
    )?;
    let config = SensorsConfig::load_from_file(file.path())?;
    assert_eq!(config.sensors.len(), 1);
    assert_eq!(config.sensors[0].config.aggregation, Aggregation::Min);
    Ok(())
}

#[test]
fn test_load_sensors_from_missing_file_has_context() {
    let err = SensorsConfig::load_from_file("/nonexistent/dayhist.yaml").unwrap_err();
    assert!(err.to_string().contains("Failed to read config file"));
}
