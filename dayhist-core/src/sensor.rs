// dayhist-core/src/sensor.rs
//! Identity and presentation of a configured historic sensor.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::config::SensorConfig;

/// State class reported for every historic sensor.
pub const STATE_CLASS_MEASUREMENT: &str = "measurement";

pub const ATTR_TRACK_VALUE: &str = "track_value";
pub const ATTR_AGGREGATION: &str = "aggregation";
pub const ATTR_HISTORIC_RANGE: &str = "historic_range";

/// Describes a sensor to the host: its name, stable id and attributes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SensorDescriptor {
    pub name: String,
    pub unique_id: String,
    pub source_entity_id: String,
    pub unit_of_measurement: Option<String>,
    pub state_class: &'static str,
    pub attributes: BTreeMap<&'static str, String>,
}

impl SensorDescriptor {
    pub fn new(instance_id: &str, config: &SensorConfig, unit_of_measurement: Option<String>) -> Self {
        let object_id = config
            .source_entity_id
            .rsplit('.')
            .next()
            .unwrap_or(&config.source_entity_id);

        let mut attributes = BTreeMap::new();
        attributes.insert(ATTR_TRACK_VALUE, config.track_value.to_string());
        attributes.insert(ATTR_AGGREGATION, config.aggregation.label().to_string());
        attributes.insert(ATTR_HISTORIC_RANGE, config.historic_range.to_string());

        Self {
            name: format!(
                "Day of Month {} of {}",
                capitalize(config.aggregation.label()),
                object_id
            ),
            unique_id: format!("{}_{}", instance_id, config.source_entity_id),
            source_entity_id: config.source_entity_id.clone(),
            unit_of_measurement,
            state_class: STATE_CLASS_MEASUREMENT,
            attributes,
        }
    }
}

/// Upper-cases the first character and lower-cases the rest.
fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
