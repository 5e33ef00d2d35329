// dayhist/src/commands/validate.rs
//! `dayhist validate`: checks every configured source against the registry.

use anyhow::{bail, Result};
use dayhist_core::{load_registry_file, validate_source, SensorsConfig};
use log::{debug, info};
use std::path::Path;

use crate::ui::output_format::{error_msg, info_msg};
use crate::ui::theme::ThemeMap;

/// Validates the configuration file and every source entity it names.
///
/// All sources are checked before failing so every problem is reported.
pub fn run_validate(config_path: &Path, registry_path: &Path, theme: &ThemeMap) -> Result<()> {
    let config = SensorsConfig::load_from_file(config_path)?;
    let registry = load_registry_file(registry_path)?;
    debug!("Loaded {} registry entries", registry.len());

    let mut failures = 0usize;
    for (instance_id, sensor) in config.instances() {
        match validate_source(&registry, &sensor.source_entity_id) {
            Ok(_) => info_msg(format!("{} ({}): ok", sensor.source_entity_id, instance_id), theme),
            Err(e) => {
                failures += 1;
                error_msg(e.to_string(), theme);
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} sources failed validation", failures, config.sensors.len());
    }
    info!("All {} sources are valid", config.sensors.len());
    Ok(())
}
