// File: dayhist-core/src/validators.rs
//! Programmatic validation of source entities.
//!
//! Before a sensor is set up, its source must exist in the host's entity
//! registry, be a numeric sensor and carry a state class for which long-term
//! statistics are recorded. Failures surface once at setup instead of being
//! tolerated by every refresh cycle.
//!
//! License: MIT OR APACHE 2.0

use anyhow::{Context, Result};
use chrono::NaiveDate;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::errors::DayhistError;

/// Only entities from this domain can be sources.
pub const SENSOR_DOMAIN: &str = "sensor";

/// State classes for which the host records long-term statistics.
pub const VALID_STATE_CLASSES: [&str; 4] = ["measurement", "total", "total_increasing", "calculation"];

/// What the host knows about an entity.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EntityInfo {
    pub domain: String,
    /// Current raw state; `None` when the host has no state for it.
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub state_class: Option<String>,
    #[serde(default)]
    pub unit_of_measurement: Option<String>,
    /// Earliest date statistics were recorded for this entity.
    #[serde(default)]
    pub first_recorded: Option<NaiveDate>,
}

/// Lookup of entities by id.
pub trait EntityRegistry: Send + Sync {
    fn entity(&self, entity_id: &str) -> Option<EntityInfo>;
}

impl EntityRegistry for BTreeMap<String, EntityInfo> {
    fn entity(&self, entity_id: &str) -> Option<EntityInfo> {
        self.get(entity_id).cloned()
    }
}

/// Loads a JSON registry of the form `{ "<entity_id>": { "domain": ... } }`.
pub fn load_registry_file<P: AsRef<Path>>(path: P) -> Result<BTreeMap<String, EntityInfo>> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read entity registry {}", path.display()))?;
    let registry: BTreeMap<String, EntityInfo> = serde_json::from_str(&text)
        .with_context(|| format!("Failed to parse entity registry {}", path.display()))?;
    debug!("Loaded {} entities from {}", registry.len(), path.display());
    Ok(registry)
}

/// Checks that `entity_id` is usable as a source and returns its registry entry.
pub fn validate_source(
    registry: &dyn EntityRegistry,
    entity_id: &str,
) -> Result<EntityInfo, DayhistError> {
    let invalid = |reason: String| {
        warn!("Entity validation failed for {}: {}", entity_id, reason);
        DayhistError::InvalidSource {
            entity_id: entity_id.to_string(),
            reason,
        }
    };

    let Some(info) = registry.entity(entity_id) else {
        return Err(invalid("Entity not found".to_string()));
    };

    if info.domain != SENSOR_DOMAIN {
        return Err(invalid("Entity is not a sensor".to_string()));
    }

    let Some(state) = info.state.as_deref() else {
        return Err(invalid("Entity state not available".to_string()));
    };

    let state_class_ok = info
        .state_class
        .as_deref()
        .is_some_and(|class| VALID_STATE_CLASSES.contains(&class));
    if !state_class_ok {
        return Err(invalid(format!(
            "Entity must have one of these state classes: {}",
            VALID_STATE_CLASSES.join(", ")
        )));
    }

    if state.trim().parse::<f64>().is_err() {
        return Err(invalid("Entity must have a numeric state".to_string()));
    }

    Ok(info)
}
