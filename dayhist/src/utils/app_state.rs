// dayhist/src/utils/app_state.rs
//! Persisted sensor state for the `dayhist` CLI.
//!
//! The last published state of each sensor is kept in a JSON file keyed by
//! the sensor's unique id, so a restarted `run` serves it immediately. Reads
//! take a shared lock, writes go through a uniquely named, locked temp file
//! in the same directory followed by a rename. The file is only a restore
//! cache: an unreadable document loads as an empty state.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::warn;
use dayhist_core::{ComputedValue, SensorDescriptor, SensorState};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const STATE_FILE_ENV: &str = "DAYHIST_STATE_FILE";
const STATE_DIR_NAME: &str = "dayhist";
const STATE_FILE_NAME: &str = "state.json";

/// The stored record for one sensor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredSensor {
    pub name: String,
    pub source_entity_id: String,
    pub state: SensorState,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppState {
    #[serde(default)]
    pub sensors: BTreeMap<String, StoredSensor>,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the state file. A missing, empty or corrupt file yields an
    /// empty state.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(AppState::new());
        }

        let mut f = OpenOptions::new()
            .read(true)
            .open(path)
            .with_context(|| format!("Failed to open state file {}", path.display()))?;
        fs2::FileExt::lock_shared(&f)?;
        let mut raw = Vec::new();
        f.read_to_end(&mut raw)?;
        fs2::FileExt::unlock(&f)?;

        if raw.is_empty() {
            return Ok(AppState::new());
        }

        match serde_json::from_slice::<AppState>(&raw) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!("Ignoring unreadable state file {}: {}", path.display(), e);
                Ok(AppState::new())
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)?;

        let json = serde_json::to_vec_pretty(&self)?;
        let mut tmp = NamedTempFile::new_in(dir)
            .with_context(|| format!("Failed to create temp file in {}", dir.display()))?;
        fs2::FileExt::lock_exclusive(tmp.as_file())?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        fs2::FileExt::unlock(tmp.as_file())?;

        tmp.persist(path)
            .with_context(|| format!("Failed to write state file {}", path.display()))?;
        Ok(())
    }

    /// Records `state` as the latest state of the sensor described by `descriptor`.
    pub fn record(&mut self, descriptor: &SensorDescriptor, state: &SensorState) {
        self.sensors.insert(
            descriptor.unique_id.clone(),
            StoredSensor {
                name: descriptor.name.clone(),
                source_entity_id: descriptor.source_entity_id.clone(),
                state: state.clone(),
                updated_at: Utc::now(),
            },
        );
    }

    /// The last available value stored for `unique_id`, if any.
    ///
    /// Entries stored as pending or unavailable are not restored.
    pub fn restorable(&self, unique_id: &str) -> Option<ComputedValue> {
        match self.sensors.get(unique_id).map(|s| &s.state) {
            Some(SensorState::Available(value)) => Some(value.clone()),
            _ => None,
        }
    }
}

/// Resolves the state file location: explicit override, then the
/// `DAYHIST_STATE_FILE` environment variable, then the user config dir.
pub fn state_file_path(override_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = override_path {
        return Ok(path.to_path_buf());
    }
    if let Ok(path) = std::env::var(STATE_FILE_ENV) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    let base = dirs::config_dir().context("Could not determine the user config directory")?;
    Ok(base.join(STATE_DIR_NAME).join(STATE_FILE_NAME))
}
