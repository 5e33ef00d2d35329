// dayhist/tests/cli_integration_tests.rs
//! Command-line tests for the `dayhist` binary.
//!
//! Each test runs the real executable through `assert_cmd` against fixture
//! files written to a temporary directory.

use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const STATISTICS: &str = r#"{
    "sensor.outdoor": [
        { "start": "2024-03-17T12:00:00Z", "mean": 10.0, "min": 4.0, "max": 15.0 },
        { "start": "2023-03-17T12:00:00Z", "mean": 20.0, "min": 8.0, "max": 25.0 },
        { "start": "2021-03-17T12:00:00Z", "mean": 30.0 }
    ]
}"#;

const REGISTRY: &str = r#"{
    "sensor.outdoor": {
        "domain": "sensor",
        "state": "12.5",
        "state_class": "measurement",
        "unit_of_measurement": "°C",
        "first_recorded": "2021-01-01"
    },
    "switch.pump": {
        "domain": "switch",
        "state": "on"
    }
}"#;

const CONFIG: &str = r#"
sensors:
  - id: outdoor
    source_entity_id: sensor.outdoor
    track_value: mean
    aggregation: mean
    historic_range: annual
    update_frequency: daily
"#;

fn write(dir: &Path, name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(name);
    fs::write(&path, content)?;
    Ok(path)
}

fn dayhist() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo_bin!("dayhist"));
    cmd.env("RUST_LOG", "debug");
    cmd.env_remove("DAYHIST_STATE_FILE");
    cmd
}

struct Fixture {
    _dir: TempDir,
    config: PathBuf,
    store: PathBuf,
    registry: PathBuf,
}

fn fixture(config: &str) -> Result<Fixture> {
    let dir = tempfile::tempdir()?;
    Ok(Fixture {
        config: write(dir.path(), "sensors.yaml", config)?,
        store: write(dir.path(), "statistics.json", STATISTICS)?,
        registry: write(dir.path(), "registry.json", REGISTRY)?,
        _dir: dir,
    })
}

#[test]
fn test_dates_annual_with_lower_bound() {
    dayhist()
        .args(["dates", "--range", "annual", "--date", "2025-03-17", "--since", "2020-01-01"])
        .assert()
        .success()
        .stdout(predicate::str::diff(
            "2024-03-17\n2023-03-17\n2022-03-17\n2021-03-17\n2020-03-17\n",
        ));
}

#[test]
fn test_dates_monthly_skips_short_months() {
    dayhist()
        .args(["dates", "--range", "monthly", "--date", "2025-03-31", "--since", "2024-10-01"])
        .assert()
        .success()
        .stdout(predicate::str::diff("2025-01-31\n2024-12-31\n2024-10-31\n"));
}

#[test]
fn test_compute_json_reports_mean() -> Result<()> {
    let fx = fixture(CONFIG)?;
    let output = dayhist()
        .args(["--quiet", "compute", "--json", "--date", "2025-03-17"])
        .arg("--config")
        .arg(&fx.config)
        .arg("--store")
        .arg(&fx.store)
        .arg("--registry")
        .arg(&fx.registry)
        .output()?;
    assert!(output.status.success());

    let rows: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let row = &rows[0];
    assert_eq!(row["name"], "Day of Month Mean of outdoor");
    assert_eq!(row["unique_id"], "outdoor_sensor.outdoor");
    assert_eq!(row["value"], 20.0);
    assert_eq!(row["unit"], "°C");
    assert_eq!(row["sample_count"], 3);
    assert!(row["error"].is_null());
    Ok(())
}

#[test]
fn test_compute_table_output() -> Result<()> {
    let fx = fixture(CONFIG)?;
    dayhist()
        .args(["compute", "--date", "2025-03-17"])
        .arg("--config")
        .arg(&fx.config)
        .arg("--store")
        .arg(&fx.store)
        .arg("--registry")
        .arg(&fx.registry)
        .assert()
        .success()
        .stdout(predicate::str::contains("Day of Month Mean of outdoor").and(predicate::str::contains("20 °C")))
        .stderr(predicate::str::contains("dayhist started"));
    Ok(())
}

#[test]
fn test_compute_reports_failing_sensor() -> Result<()> {
    let fx = fixture(
        r#"
sensors:
  - source_entity_id: switch.pump
    track_value: state
    aggregation: max
    historic_range: monthly
    update_frequency: hourly
"#,
    )?;
    dayhist()
        .args(["--quiet", "compute", "--json"])
        .arg("--config")
        .arg(&fx.config)
        .arg("--store")
        .arg(&fx.store)
        .arg("--registry")
        .arg(&fx.registry)
        .assert()
        .failure()
        .stdout(predicate::str::contains("Entity is not a sensor"))
        .stderr(predicate::str::contains("1 of 1 sensors failed"));
    Ok(())
}

#[test]
fn test_validate_succeeds_for_valid_sources() -> Result<()> {
    let fx = fixture(CONFIG)?;
    dayhist()
        .arg("validate")
        .arg("--config")
        .arg(&fx.config)
        .arg("--registry")
        .arg(&fx.registry)
        .assert()
        .success()
        .stderr(predicate::str::contains("sensor.outdoor (outdoor): ok"));
    Ok(())
}

#[test]
fn test_validate_fails_for_unknown_source() -> Result<()> {
    let fx = fixture(
        r#"
sensors:
  - source_entity_id: sensor.gone
    track_value: mean
    aggregation: min
    historic_range: annual
    update_frequency: daily
"#,
    )?;
    dayhist()
        .arg("validate")
        .arg("--config")
        .arg(&fx.config)
        .arg("--registry")
        .arg(&fx.registry)
        .assert()
        .failure()
        .stderr(
            predicate::str::contains("Source entity 'sensor.gone' failed validation: Entity not found")
                .and(predicate::str::contains("1 of 1 sources failed validation")),
        );
    Ok(())
}

#[test]
fn test_invalid_config_is_reported() -> Result<()> {
    let fx = fixture("sensors:\n  - source_entity_id: sensor.outdoor\n    aggregation: loudest\n")?;
    dayhist()
        .arg("validate")
        .arg("--config")
        .arg(&fx.config)
        .arg("--registry")
        .arg(&fx.registry)
        .assert()
        .failure()
        .stderr(predicate::str::contains("ERROR:"));
    Ok(())
}

#[test]
fn test_missing_subcommand_prints_help() {
    dayhist().assert().failure().stderr(predicate::str::contains("Usage"));
}
