//! Sync scheduler - periodic and on-demand sync triggers
//!
//! The [`SyncScheduler`] owns one background loop per managed collection,
//! firing a sync pass at a fixed interval (15 minutes by default). It also
//! supports user-initiated immediate passes that bypass the timer.
//!
//! ## Flow
//!
//! ```text
//! timer tick ──→ connectivity/power guards ──→ per-collection lock ──→ cycle
//!                                                                      │
//!                                              retry w/ backoff ◄──────┘
//! ```
//!
//! A cycle retries retryable outcomes with exponential backoff up to a
//! bounded attempt count; when attempts are exhausted the cycle gives up,
//! but the next periodic trigger always runs regardless — one failed cycle
//! never disables future ones. Overlapping passes for the same collection
//! are impossible: the periodic loop and `sync_now` acquire the same
//! per-collection lock. Distinct collections proceed independently.

use std::sync::Arc;
use std::time::Duration;

use dashmap::DashMap;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use campushub_core::config::SyncConfig;
use campushub_core::domain::newtypes::Collection;
use campushub_core::ports::connectivity::{IConnectivityProbe, IPowerProbe};
use campushub_core::ports::telemetry::{ITelemetrySink, SyncEvent};

use crate::engine::{PassReport, SyncEngine};

// ============================================================================
// SyncScheduler
// ============================================================================

/// Schedules periodic sync passes per collection
pub struct SyncScheduler {
    engine: Arc<SyncEngine>,
    connectivity: Arc<dyn IConnectivityProbe>,
    power: Option<Arc<dyn IPowerProbe>>,
    telemetry: Option<Arc<dyn ITelemetrySink>>,
    interval: Duration,
    max_attempts: u32,
    base_delay: Duration,
    jobs: DashMap<String, JoinHandle<()>>,
    pass_locks: Arc<DashMap<String, Arc<tokio::sync::Mutex<()>>>>,
    cancel: CancellationToken,
}

impl SyncScheduler {
    /// Creates a scheduler with explicit timing parameters
    ///
    /// # Arguments
    /// * `engine` - The sync engine driven by this scheduler
    /// * `connectivity` - Checked before every periodic cycle
    /// * `interval` - Time between periodic passes per collection
    /// * `max_attempts` - Attempts per cycle for retryable failures
    /// * `base_delay` - Base delay for exponential backoff between attempts
    pub fn new(
        engine: Arc<SyncEngine>,
        connectivity: Arc<dyn IConnectivityProbe>,
        interval: Duration,
        max_attempts: u32,
        base_delay: Duration,
    ) -> Self {
        info!(
            interval_secs = interval.as_secs(),
            max_attempts, "Creating sync scheduler"
        );
        Self {
            engine,
            connectivity,
            power: None,
            telemetry: None,
            interval,
            max_attempts: max_attempts.max(1),
            base_delay,
            jobs: DashMap::new(),
            pass_locks: Arc::new(DashMap::new()),
            cancel: CancellationToken::new(),
        }
    }

    /// Creates a scheduler from the sync configuration section
    pub fn from_config(
        engine: Arc<SyncEngine>,
        connectivity: Arc<dyn IConnectivityProbe>,
        config: &SyncConfig,
    ) -> Self {
        Self::new(
            engine,
            connectivity,
            Duration::from_secs(config.interval_minutes * 60),
            config.max_attempts,
            Duration::from_secs(config.backoff_base_secs),
        )
    }

    /// Attaches a power probe; periodic passes are deferred while the
    /// device reports a critical low-power condition
    pub fn with_power_probe(mut self, power: Arc<dyn IPowerProbe>) -> Self {
        self.power = Some(power);
        self
    }

    /// Attaches a telemetry sink for retry events
    pub fn with_telemetry(mut self, sink: Arc<dyn ITelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    fn pass_lock(&self, collection: &Collection) -> Arc<tokio::sync::Mutex<()>> {
        self.pass_locks
            .entry(collection.as_str().to_string())
            .or_insert_with(|| Arc::new(tokio::sync::Mutex::new(())))
            .clone()
    }

    // ========================================================================
    // schedule()
    // ========================================================================

    /// Starts the periodic loop for a collection
    ///
    /// Only-keep-existing policy: if a job for this collection is already
    /// scheduled, the request is a no-op. The first pass runs immediately,
    /// then every `interval`.
    pub fn schedule(&self, collection: Collection) {
        if self.cancel.is_cancelled() {
            warn!(collection = %collection, "Scheduler cancelled, refusing new job");
            return;
        }
        if self.jobs.contains_key(collection.as_str()) {
            debug!(collection = %collection, "Job already scheduled, keeping existing");
            return;
        }

        info!(collection = %collection, "Scheduling periodic sync");

        let job = CollectionJob {
            collection: collection.clone(),
            engine: self.engine.clone(),
            connectivity: self.connectivity.clone(),
            power: self.power.clone(),
            telemetry: self.telemetry.clone(),
            interval: self.interval,
            max_attempts: self.max_attempts,
            base_delay: self.base_delay,
            lock: self.pass_lock(&collection),
            cancel: self.cancel.clone(),
        };

        let handle = tokio::spawn(job.run());
        self.jobs.insert(collection.as_str().to_string(), handle);
    }

    /// Returns true if a periodic job exists for the collection
    pub fn is_scheduled(&self, collection: &Collection) -> bool {
        self.jobs.contains_key(collection.as_str())
    }

    /// Returns the number of scheduled collections
    pub fn scheduled_count(&self) -> usize {
        self.jobs.len()
    }

    // ========================================================================
    // sync_now()
    // ========================================================================

    /// Runs an immediate pass, bypassing the periodic timer
    ///
    /// Waits for any in-flight pass on the same collection to finish
    /// first. Returns the report so a user-initiated sync can surface a
    /// retry-capable error signal; periodic failures stay background-silent.
    pub async fn sync_now(&self, collection: &Collection) -> PassReport {
        info!(collection = %collection, "User-initiated sync requested");
        let lock = self.pass_lock(collection);
        let _guard = lock.lock().await;
        self.engine.run_pass(collection).await
    }

    // ========================================================================
    // cancel_all()
    // ========================================================================

    /// Stops all future periodic triggers
    ///
    /// Does not interrupt a pass already in flight: loops observe the
    /// cancellation between cycles and exit after the current one
    /// completes.
    pub fn cancel_all(&self) {
        info!(jobs = self.jobs.len(), "Cancelling all periodic sync jobs");
        self.cancel.cancel();
        // Dropping the handles detaches the tasks; they exit at the next
        // select point.
        self.jobs.clear();
    }
}

// ============================================================================
// Per-collection loop
// ============================================================================

struct CollectionJob {
    collection: Collection,
    engine: Arc<SyncEngine>,
    connectivity: Arc<dyn IConnectivityProbe>,
    power: Option<Arc<dyn IPowerProbe>>,
    telemetry: Option<Arc<dyn ITelemetrySink>>,
    interval: Duration,
    max_attempts: u32,
    base_delay: Duration,
    lock: Arc<tokio::sync::Mutex<()>>,
    cancel: CancellationToken,
}

impl CollectionJob {
    async fn run(self) {
        let mut timer = tokio::time::interval(self.interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    info!(collection = %self.collection, "Periodic sync loop stopped");
                    break;
                }
                _ = timer.tick() => {
                    if !self.connectivity.is_available() {
                        debug!(collection = %self.collection, "Offline, skipping cycle");
                        continue;
                    }
                    if let Some(power) = &self.power {
                        if power.is_critically_low() {
                            info!(collection = %self.collection, "Critical low power, deferring cycle");
                            continue;
                        }
                    }

                    let _guard = self.lock.lock().await;
                    self.run_cycle().await;
                }
            }
        }
    }

    /// One cycle: a pass plus bounded backoff retries for retryable
    /// outcomes
    async fn run_cycle(&self) {
        let mut attempt: u32 = 0;

        loop {
            let report = self.engine.run_pass(&self.collection).await;

            if report.status.is_success() {
                return;
            }

            attempt += 1;
            if report.status.is_retryable() && attempt < self.max_attempts {
                let delay = self.base_delay * 2u32.pow(attempt - 1);
                warn!(
                    collection = %self.collection,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    code = report.status.code(),
                    "Retryable sync failure, backing off"
                );
                if let Some(sink) = &self.telemetry {
                    sink.record(&SyncEvent::SyncRetried {
                        collection: self.collection.to_string(),
                        attempt,
                        delay_secs: delay.as_secs(),
                    });
                }
                tokio::time::sleep(delay).await;
                continue;
            }

            // Terminal for this cycle only: the next periodic trigger runs
            // regardless.
            warn!(
                collection = %self.collection,
                code = report.status.code(),
                attempts = attempt,
                "Sync cycle gave up until next periodic trigger"
            );
            return;
        }
    }
}

// ============================================================================
// Unit tests
// ============================================================================
