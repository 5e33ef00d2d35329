// dayhist-core/src/scheduler.rs
//! Per-sensor refresh scheduling.
//!
//! Each [`RefreshScheduler`] owns one sensor's published value and runs its
//! [`HistoryEngine`] whenever a trigger arrives, either from the built-in
//! hourly/daily timer ([`RefreshScheduler::spawn`]) or injected directly via
//! [`RefreshScheduler::trigger`].
//!
//! At most one pipeline run is in flight per scheduler. A trigger arriving
//! during a run is dropped. After [`RefreshScheduler::teardown`] returns,
//! nothing more is published: an in-flight run is allowed to finish but its
//! result is discarded.

use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Local, NaiveDateTime, NaiveTime, Timelike};
use log::{debug, error, info};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::{watch, Mutex, RwLock};
use tokio::task::JoinHandle;
use tokio::time::Duration;

use crate::config::UpdateFrequency;
use crate::engine::HistoryEngine;
use crate::record::{ComputedValue, SensorState};
use crate::sensor::SensorDescriptor;

/// Lifecycle of a scheduler's value slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No run in flight and nothing published yet.
    Idle,
    Computing,
    /// A value is published and no run is in flight.
    Published,
    /// The source disappeared; no further runs will start.
    Unavailable,
}

/// What a single trigger did.
#[derive(Debug, Clone, PartialEq)]
pub enum TriggerOutcome {
    Published(ComputedValue),
    /// Another run was in flight; this trigger was dropped.
    Coalesced,
    /// The run failed transiently; the previous value stays published.
    Retained,
    /// The source vanished; the sensor is now unavailable.
    Unavailable,
    /// The scheduler was torn down while the run was in flight.
    Discarded,
    /// The scheduler no longer accepts triggers.
    Stopped,
}

/// Outward interface towards the host: receives every state change.
#[async_trait]
pub trait Publisher: Send + Sync {
    async fn publish(&self, descriptor: &SensorDescriptor, state: &SensorState);
}

/// Source of local wall-clock time.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// The system's local time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}

/// The next trigger instant strictly after `now`: the next top of the hour,
/// or the next midnight.
pub fn next_trigger_after(now: NaiveDateTime, frequency: UpdateFrequency) -> NaiveDateTime {
    match frequency {
        UpdateFrequency::Hourly => {
            let hour_start = now
                .date()
                .and_time(NaiveTime::MIN)
                + ChronoDuration::hours(i64::from(now.hour()));
            hour_start + ChronoDuration::hours(1)
        }
        UpdateFrequency::Daily => {
            (now.date() + ChronoDuration::days(1)).and_time(NaiveTime::MIN)
        }
    }
}

/// Time to wait from `now` until `due`; zero when `due` has passed.
pub fn time_until(now: NaiveDateTime, due: NaiveDateTime) -> Duration {
    (due - now).to_std().unwrap_or(Duration::ZERO)
}

#[derive(Debug)]
struct Slot {
    phase: Phase,
    state: SensorState,
}

pub struct RefreshScheduler {
    descriptor: SensorDescriptor,
    frequency: UpdateFrequency,
    engine: HistoryEngine,
    publisher: Arc<dyn Publisher>,
    slot: RwLock<Slot>,
    run_lock: Mutex<()>,
    /// Held by the publish step and by teardown.
    publish_gate: Mutex<()>,
    torn_down: AtomicBool,
    shutdown: watch::Sender<bool>,
}

impl RefreshScheduler {
    pub fn new(
        descriptor: SensorDescriptor,
        engine: HistoryEngine,
        publisher: Arc<dyn Publisher>,
    ) -> Self {
        let (shutdown, _) = watch::channel(false);
        Self {
            descriptor,
            frequency: engine.config().update_frequency,
            engine,
            publisher,
            slot: RwLock::new(Slot {
                phase: Phase::Idle,
                state: SensorState::Pending,
            }),
            run_lock: Mutex::new(()),
            publish_gate: Mutex::new(()),
            torn_down: AtomicBool::new(false),
            shutdown,
        }
    }

    /// Seeds the slot with a value restored from a previous run. It is
    /// served until the first successful refresh replaces it.
    pub fn with_restored(mut self, value: ComputedValue) -> Self {
        let slot = self.slot.get_mut();
        slot.phase = Phase::Published;
        slot.state = SensorState::Available(value);
        self
    }

    pub fn descriptor(&self) -> &SensorDescriptor {
        &self.descriptor
    }

    /// The currently published state. Unchanged between triggers.
    pub async fn current(&self) -> SensorState {
        self.slot.read().await.state.clone()
    }

    pub async fn phase(&self) -> Phase {
        self.slot.read().await.phase
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down.load(Ordering::SeqCst)
    }

    /// Stops accepting triggers and ends the timer loop. A run in flight
    /// completes but publishes nothing; a publication already under way is
    /// awaited before this returns.
    pub async fn teardown(&self) {
        let _gate = self.publish_gate.lock().await;
        if !self.torn_down.swap(true, Ordering::SeqCst) {
            info!("Tearing down {}", self.descriptor.name);
            self.shutdown.send_replace(true);
        }
    }

    /// Runs the pipeline once for reference date `today`.
    pub async fn trigger(&self, today: chrono::NaiveDate) -> TriggerOutcome {
        if self.is_torn_down() || self.phase().await == Phase::Unavailable {
            return TriggerOutcome::Stopped;
        }

        let Ok(_running) = self.run_lock.try_lock() else {
            debug!("Refresh of {} already in progress; dropping trigger", self.descriptor.name);
            return TriggerOutcome::Coalesced;
        };

        let previous_phase = {
            let mut slot = self.slot.write().await;
            // A run that finished just before the lock was taken may have
            // ended the scheduler.
            if self.is_torn_down() || slot.phase == Phase::Unavailable {
                return TriggerOutcome::Stopped;
            }
            let previous = slot.phase;
            slot.phase = Phase::Computing;
            previous
        };

        let result = self.engine.compute(today).await;

        let _gate = self.publish_gate.lock().await;
        if self.is_torn_down() {
            debug!("Discarding result for {} after teardown", self.descriptor.name);
            self.slot.write().await.phase = previous_phase;
            return TriggerOutcome::Discarded;
        }

        match result {
            Ok(value) => {
                let state = SensorState::Available(value.clone());
                self.replace(Phase::Published, state.clone()).await;
                info!("{} updated to {}", self.descriptor.name, value);
                self.publisher.publish(&self.descriptor, &state).await;
                TriggerOutcome::Published(value)
            }
            Err(e) if e.is_permanent() => {
                error!("{}: {}; marking unavailable", self.descriptor.name, e);
                self.replace(Phase::Unavailable, SensorState::Unavailable).await;
                self.publisher
                    .publish(&self.descriptor, &SensorState::Unavailable)
                    .await;
                self.shutdown.send_replace(true);
                TriggerOutcome::Unavailable
            }
            Err(e) => {
                error!("Error getting statistics for {}: {}", self.descriptor.source_entity_id, e);
                self.slot.write().await.phase = previous_phase;
                TriggerOutcome::Retained
            }
        }
    }

    async fn replace(&self, phase: Phase, state: SensorState) {
        let mut slot = self.slot.write().await;
        slot.phase = phase;
        slot.state = state;
    }

    /// Starts the timer loop: one refresh immediately, then one at every
    /// hour or midnight boundary until teardown or unavailability.
    ///
    /// A boundary refresh uses the boundary's own date, whatever the wall
    /// clock reads on wake-up. Each trigger runs in its own task so a slow
    /// run never delays the timer; overlapping triggers are dropped by
    /// [`Self::trigger`].
    pub fn spawn(self: Arc<Self>, clock: Arc<dyn Clock>) -> JoinHandle<()> {
        let mut shutdown = self.shutdown.subscribe();

        tokio::spawn(async move {
            let today = clock.now().date();
            Self::fire(&self, today);
            let mut last_due: Option<NaiveDateTime> = None;

            loop {
                if *shutdown.borrow() {
                    break;
                }

                let now = clock.now();
                // A wall clock lagging behind the timer must not schedule
                // the boundary just served a second time.
                let base = match last_due {
                    Some(due) if due > now => due,
                    _ => now,
                };
                let due = next_trigger_after(base, self.frequency);
                let wait = time_until(now, due);
                debug!("Next refresh of {} at {} (in {:?})", self.descriptor.name, due, wait);

                tokio::select! {
                    _ = tokio::time::sleep(wait) => {
                        last_due = Some(due);
                        Self::fire(&self, due.date());
                    }
                    changed = shutdown.changed() => {
                        if changed.is_err() || *shutdown.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!("Timer loop for {} stopped", self.descriptor.name);
        })
    }

    fn fire(scheduler: &Arc<Self>, today: chrono::NaiveDate) {
        let scheduler = Arc::clone(scheduler);
        tokio::spawn(async move {
            scheduler.trigger(today).await;
        });
    }
}
