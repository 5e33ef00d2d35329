// dayhist/src/utils/publisher.rs
//! The publisher used by `dayhist run`: prints every state change and keeps
//! the state file current.

use async_trait::async_trait;
use dayhist_core::{Publisher, SensorDescriptor, SensorState};
use log::{debug, warn};
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::app_state::AppState;

pub struct StatePublisher {
    state: Arc<Mutex<AppState>>,
    path: PathBuf,
}

impl StatePublisher {
    pub fn new(state: AppState, path: PathBuf) -> Self {
        Self { state: Arc::new(Mutex::new(state)), path }
    }

    /// A snapshot of the in-memory state.
    pub async fn snapshot(&self) -> AppState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Publisher for StatePublisher {
    async fn publish(&self, descriptor: &SensorDescriptor, state: &SensorState) {
        // Held until the file is written, so saves land in publish order.
        let mut guard = self.state.lock().await;
        guard.record(descriptor, state);
        let snapshot = guard.clone();

        {
            let mut stdout = io::stdout().lock();
            let _ = writeln!(stdout, "{}: {}", descriptor.name, state);
        }

        debug!("Persisting {} to {}", descriptor.unique_id, self.path.display());
        let path = self.path.clone();
        let saved = tokio::task::spawn_blocking(move || snapshot.save(&path)).await;
        drop(guard);

        match saved {
            Ok(Ok(())) => {}
            Ok(Err(e)) => warn!("Failed to persist state for {}: {:#}", descriptor.name, e),
            Err(e) => warn!("State writer task failed: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayhist_core::{
        Aggregation, ComputedValue, HistoricRange, Reading, SensorConfig, TrackValue, UpdateFrequency,
    };

    #[test_log::test(tokio::test)]
    async fn publish_records_and_persists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state.json");
        let publisher = StatePublisher::new(AppState::new(), path.clone());

        let config = SensorConfig {
            source_entity_id: "sensor.temp".to_string(),
            track_value: TrackValue::Max,
            aggregation: Aggregation::Max,
            historic_range: HistoricRange::Annual,
            update_frequency: UpdateFrequency::Daily,
        };
        let descriptor = SensorDescriptor::new("temp", &config, None);
        let value = ComputedValue { value: Reading::Value(3.0), unit: None, sample_count: 1 };
        publisher.publish(&descriptor, &SensorState::Available(value.clone())).await;

        assert_eq!(publisher.snapshot().await.restorable(&descriptor.unique_id), Some(value.clone()));
        let on_disk = AppState::load(&path).unwrap();
        assert_eq!(on_disk.restorable(&descriptor.unique_id), Some(value));
    }

    #[test_log::test(tokio::test(flavor = "multi_thread", worker_threads = 8))]
    async fn concurrent_publishes_all_reach_the_file() {
        for round in 0..5 {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            let publisher = Arc::new(StatePublisher::new(AppState::new(), path.clone()));

            let tasks: Vec<_> = (0..16)
                .map(|i| {
                    let publisher = Arc::clone(&publisher);
                    tokio::spawn(async move {
                        let config = SensorConfig {
                            source_entity_id: format!("sensor.s{}", i),
                            track_value: TrackValue::Mean,
                            aggregation: Aggregation::Mean,
                            historic_range: HistoricRange::Annual,
                            update_frequency: UpdateFrequency::Daily,
                        };
                        let descriptor = SensorDescriptor::new(&i.to_string(), &config, None);
                        let value = ComputedValue { value: Reading::Value(i as f64), unit: None, sample_count: 1 };
                        publisher.publish(&descriptor, &SensorState::Available(value)).await;
                    })
                })
                .collect();
            for task in tasks {
                task.await.unwrap();
            }

            let on_disk = AppState::load(&path).unwrap();
            assert_eq!(on_disk.sensors.len(), 16, "round {}", round);
            assert_eq!(on_disk, publisher.snapshot().await);
            // No temp files are left behind.
            assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
        }
    }
}
