// dayhist-core/src/lib.rs
//! # dayhist Core Library
//!
//! `dayhist-core` provides the platform-independent logic behind a historic
//! "day of month" sensor: a value derived from an entity's long-term
//! statistics on the same calendar day in previous years (annual) or
//! previous months (monthly).
//!
//! ## Modules
//!
//! * `config`: Defines `SensorConfig` and the YAML-backed `SensorsConfig`.
//! * `dates`: Generates the historic target dates for a reference day.
//! * `record`: Statistics records, computed values and exposed sensor states.
//! * `extractor`: Selects the tracked field from each record.
//! * `reader`: The `StatisticsReader` boundary plus in-memory and JSON-file stores.
//! * `validators`: Validates source entities against an `EntityRegistry`.
//! * `sensor`: Names and attributes of a configured sensor.
//! * `engine`: The `HistoryEngine` pipeline.
//! * `scheduler`: The per-sensor `RefreshScheduler` with hourly/daily timers.
//! * `headless`: One-shot computation without a scheduler.
//!
//! Aggregation math lives in the `no_std` crate `dayhist-stats` and is
//! re-exported here as [`Aggregation`].
//!
//! ## Usage Example
//!
//! ```rust
//! use std::sync::Arc;
//! use chrono::NaiveDate;
//! use dayhist_core::{
//!     Aggregation, HistoricRange, HistoryEngine, MemoryStore, Reading, SensorConfig,
//!     StatisticRecord, TrackValue, UpdateFrequency,
//! };
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> anyhow::Result<()> {
//! let store = Arc::new(MemoryStore::new());
//! let date = NaiveDate::from_ymd_opt(2024, 3, 17).unwrap();
//! store
//!     .insert("sensor.temp", vec![StatisticRecord { date, mean: Some(12.0), ..Default::default() }])
//!     .await;
//!
//! let config = SensorConfig {
//!     source_entity_id: "sensor.temp".to_string(),
//!     track_value: TrackValue::Mean,
//!     aggregation: Aggregation::Max,
//!     historic_range: HistoricRange::Annual,
//!     update_frequency: UpdateFrequency::Daily,
//! };
//!
//! let engine = HistoryEngine::new(config, store);
//! let today = NaiveDate::from_ymd_opt(2025, 3, 17).unwrap();
//! let value = engine.compute(today).await?;
//! assert_eq!(value.value, Reading::Value(12.0));
//! # Ok(())
//! # }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`DayhistError`]. File loading helpers return
//! `anyhow::Result` with context attached.
//!
//! ---
//! License: MIT OR Apache-2.0

pub mod config;
pub mod dates;
pub mod engine;
pub mod errors;
pub mod extractor;
pub mod headless;
pub mod reader;
pub mod record;
pub mod scheduler;
pub mod sensor;
pub mod validators;

/// Re-exports the configuration types.
pub use config::{
    Aggregation, HistoricRange, SensorConfig, SensorEntry, SensorsConfig, TrackValue,
    UpdateFrequency,
};

/// Re-exports the custom error type for clear error reporting.
pub use errors::DayhistError;

pub use dates::{fallback_lower_bound, target_dates};
pub use engine::HistoryEngine;
pub use extractor::extract_samples;
pub use headless::{headless_compute, headless_compute_all, HeadlessResult};
pub use reader::{JsonFileStore, MemoryStore, StatisticBucket, StatisticsByDate, StatisticsReader};
pub use record::{ComputedValue, Reading, SensorState, StatisticRecord};
pub use scheduler::{
    next_trigger_after, Clock, Phase, Publisher, RefreshScheduler, SystemClock, TriggerOutcome,
};
pub use sensor::SensorDescriptor;
pub use validators::{load_registry_file, validate_source, EntityInfo, EntityRegistry};
