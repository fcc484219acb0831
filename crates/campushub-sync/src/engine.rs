//! Synchronization engine
//!
//! The [`SyncEngine`] drives one reconciliation pass for an entity
//! collection between the local cache and the remote document store.
//!
//! ## Pass Flow
//!
//! 1. **Precondition**: connectivity must be available, else the pass
//!    aborts as retryable with no remote call attempted
//! 2. **Pull**: fetch the authoritative remote set
//! 3. **Push**: write each locally dirty record (tombstones become remote
//!    deletes); per-record failures are isolated
//! 4. **Reconcile**: batch-merge post-push local state with the pulled
//!    remote set under the collection's strategy
//! 5. **Persist**: one atomic upsert per merged record
//!
//! Records acknowledged during the push (writes and deletes) are excluded
//! from the pulled remote set before reconciliation: the pull predates the
//! push, so their remote view is stale by construction.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, error, info, warn};

use campushub_conflict::{merge, ManualConflict, PolicyEngine};
use campushub_core::config::Config;
use campushub_core::domain::newtypes::{Collection, RecordId};
use campushub_core::domain::record::RemoteRecord;
use campushub_core::ports::cache_store::{ICacheStore, RecordFilter};
use campushub_core::ports::connectivity::IConnectivityProbe;
use campushub_core::ports::identity::IIdentitySource;
use campushub_core::ports::remote_source::{IRemoteSource, RemoteError};
use campushub_core::ports::telemetry::{ITelemetrySink, SyncEvent};

use crate::SyncError;

// ============================================================================
// PassStatus
// ============================================================================

/// Outcome of one synchronization pass
///
/// The scheduler keys its retry decision on
/// [`is_retryable`](PassStatus::is_retryable); everything else is
/// reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassStatus {
    /// The pass completed; all remote calls that were attempted succeeded
    Success,
    /// Aborted or degraded by a connectivity-level failure
    RetryableNetwork,
    /// Aborted or degraded by a server-side failure (5xx, throttling)
    RetryableServer,
    /// The remote rejected our credentials; retrying cannot help
    FatalAuth,
    /// The payload does not match the remote schema; retrying cannot help
    FatalSchema,
    /// The local cache failed; fatal for this pass
    FatalStore,
}

impl PassStatus {
    /// Returns the wire-level outcome code
    pub fn code(&self) -> &'static str {
        match self {
            PassStatus::Success => "SUCCESS",
            PassStatus::RetryableNetwork => "RETRYABLE_NETWORK",
            PassStatus::RetryableServer => "RETRYABLE_SERVER",
            PassStatus::FatalAuth => "FATAL_AUTH",
            PassStatus::FatalSchema => "FATAL_SCHEMA",
            PassStatus::FatalStore => "FATAL_STORE",
        }
    }

    /// Returns true if the pass completed successfully
    pub fn is_success(&self) -> bool {
        matches!(self, PassStatus::Success)
    }

    /// Returns true if retrying the pass soon can succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, PassStatus::RetryableNetwork | PassStatus::RetryableServer)
    }
}

impl std::fmt::Display for PassStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Maps a remote error onto the pass outcome it causes
fn classify_remote_error(err: &RemoteError) -> PassStatus {
    match err {
        RemoteError::Network(_) => PassStatus::RetryableNetwork,
        RemoteError::Server { .. } => PassStatus::RetryableServer,
        RemoteError::Auth(_) => PassStatus::FatalAuth,
        RemoteError::Schema(_) => PassStatus::FatalSchema,
    }
}

/// Keeps the worse of two outcomes: fatal beats retryable beats success
fn worst(current: PassStatus, new: PassStatus) -> PassStatus {
    let rank = |status: PassStatus| match status {
        PassStatus::Success => 0,
        PassStatus::RetryableNetwork | PassStatus::RetryableServer => 1,
        PassStatus::FatalAuth | PassStatus::FatalSchema | PassStatus::FatalStore => 2,
    };
    if rank(new) > rank(current) {
        new
    } else {
        current
    }
}

// ============================================================================
// PassReport
// ============================================================================

/// Summary of a completed synchronization pass
#[derive(Debug, Clone)]
pub struct PassReport {
    /// Final outcome of the pass
    pub status: PassStatus,
    /// Records fetched from the remote during the pull phase
    pub records_pulled: u32,
    /// Dirty records successfully written to the remote
    pub records_pushed: u32,
    /// Tombstones successfully propagated as remote deletes
    pub records_deleted: u32,
    /// Pairs that require caller-driven resolution (strategy `manual`)
    pub conflicts: Vec<ManualConflict>,
    /// Errors encountered during the pass (non-fatal ones included)
    pub errors: Vec<String>,
    /// Wall-clock duration of the pass in milliseconds
    pub duration_ms: u64,
}

impl PassReport {
    fn new() -> Self {
        Self {
            status: PassStatus::Success,
            records_pulled: 0,
            records_pushed: 0,
            records_deleted: 0,
            conflicts: Vec::new(),
            errors: Vec::new(),
            duration_ms: 0,
        }
    }
}

// ============================================================================
// SyncEngine
// ============================================================================

/// Drives one synchronization pass per call
///
/// ## Dependencies
///
/// - `remote`: the remote document store (pull, push, delete)
/// - `cache`: durable local cache with sync metadata
/// - `connectivity`: reachability precondition for every pass
/// - `identity`: attribution for pushed writes; a signed-out user skips
///   the push phase without error
/// - `policy`: per-collection merge strategy selection
///
/// The engine holds no per-pass state, so independent collections can run
/// passes concurrently on the same instance. Same-collection mutual
/// exclusion is the scheduler's job.
pub struct SyncEngine {
    remote: Arc<dyn IRemoteSource>,
    cache: Arc<dyn ICacheStore>,
    connectivity: Arc<dyn IConnectivityProbe>,
    identity: Arc<dyn IIdentitySource>,
    policy: PolicyEngine,
    telemetry: Option<Arc<dyn ITelemetrySink>>,
}

impl SyncEngine {
    /// Creates a new `SyncEngine` with the given dependencies
    pub fn new(
        remote: Arc<dyn IRemoteSource>,
        cache: Arc<dyn ICacheStore>,
        connectivity: Arc<dyn IConnectivityProbe>,
        identity: Arc<dyn IIdentitySource>,
        config: &Config,
    ) -> Self {
        Self {
            remote,
            cache,
            connectivity,
            identity,
            policy: PolicyEngine::new(
                &config.conflicts.default_strategy,
                &config.conflicts.rules,
            ),
            telemetry: None,
        }
    }

    /// Attaches a telemetry sink for sync lifecycle events
    pub fn with_telemetry(mut self, sink: Arc<dyn ITelemetrySink>) -> Self {
        self.telemetry = Some(sink);
        self
    }

    fn emit(&self, event: SyncEvent) {
        if let Some(sink) = &self.telemetry {
            sink.record(&event);
        }
    }

    // ========================================================================
    // run_pass()
    // ========================================================================

    /// Performs one synchronization pass for a collection
    ///
    /// Never returns `Err`: every failure mode is folded into the report's
    /// [`PassStatus`] so the caller always gets counters and collected
    /// errors alongside the outcome.
    #[tracing::instrument(skip(self), fields(collection = %collection))]
    pub async fn run_pass(&self, collection: &Collection) -> PassReport {
        let start = std::time::Instant::now();
        let mut report = PassReport::new();

        self.emit(SyncEvent::SyncStarted {
            collection: collection.to_string(),
        });
        info!("Starting sync pass");

        // Step 1: connectivity precondition. No remote call is attempted
        // while offline.
        if !self.connectivity.is_available() {
            debug!("Network unavailable, aborting pass before any remote call");
            report.errors.push(SyncError::NetworkUnavailable.to_string());
            return self.finish(report, PassStatus::RetryableNetwork, collection, start);
        }

        // Step 2: pull the authoritative remote set. A pull failure aborts
        // the pass before anything touches the cache.
        let remote_set = match self.remote.fetch_all(collection).await {
            Ok(set) => set,
            Err(err) => {
                let status = classify_remote_error(&err);
                error!(error = %err, "Remote pull failed");
                report.errors.push(SyncError::RemotePullFailed(err).to_string());
                return self.finish(report, status, collection, start);
            }
        };
        report.records_pulled = remote_set.len() as u32;
        debug!(records = remote_set.len(), "Pulled remote set");

        // Step 3: identify the local dirty subset.
        let dirty = match self.cache.dirty_records(collection).await {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "Failed to read dirty records");
                report.errors.push(SyncError::LocalStore(err.to_string()).to_string());
                return self.finish(report, PassStatus::FatalStore, collection, start);
            }
        };
        debug!(dirty = dirty.len(), "Local dirty subset identified");

        // Step 4: push. Acknowledged ids are excluded from reconciliation
        // below because the pulled remote view of them is stale.
        let mut acked: HashSet<RecordId> = HashSet::new();
        let mut status = PassStatus::Success;

        match self.identity.current_user_id() {
            None => {
                // Signed-out is a normal condition; dirty records simply
                // wait for the next authenticated pass.
                debug!(dirty = dirty.len(), "No authenticated user, skipping push phase");
            }
            Some(user) => {
                for record in &dirty {
                    let result = if record.is_tombstone() {
                        match self.remote.delete(collection, record.id()).await {
                            Ok(()) => {
                                if let Err(err) = self.cache.remove(collection, record.id()).await
                                {
                                    error!(error = %err, "Failed to purge acknowledged tombstone");
                                    report
                                        .errors
                                        .push(SyncError::LocalStore(err.to_string()).to_string());
                                    return self.finish(
                                        report,
                                        PassStatus::FatalStore,
                                        collection,
                                        start,
                                    );
                                }
                                acked.insert(record.id().clone());
                                report.records_deleted += 1;
                                Ok(())
                            }
                            Err(err) => Err(err),
                        }
                    } else {
                        match self
                            .remote
                            .write(collection, &record.to_remote(), &user)
                            .await
                        {
                            Ok(ack) => {
                                let mut updated = record.clone();
                                updated.set_version(ack.version);
                                updated.mark_synced_at(Utc::now());
                                if let Err(err) = self.cache.upsert(collection, &updated).await {
                                    error!(error = %err, "Failed to persist pushed record");
                                    report
                                        .errors
                                        .push(SyncError::LocalStore(err.to_string()).to_string());
                                    return self.finish(
                                        report,
                                        PassStatus::FatalStore,
                                        collection,
                                        start,
                                    );
                                }
                                acked.insert(record.id().clone());
                                report.records_pushed += 1;
                                Ok(())
                            }
                            Err(err) => Err(err),
                        }
                    };

                    // Per-record failures are isolated: the record stays
                    // dirty for the next pass and the rest of the
                    // collection proceeds. A fatal failure stops further
                    // push attempts, which would fail identically.
                    if let Err(err) = result {
                        let record_status = classify_remote_error(&err);
                        warn!(
                            id = %record.id(),
                            error = %err,
                            "Push failed, record stays dirty"
                        );
                        report.errors.push(
                            SyncError::RemoteWriteFailed {
                                id: record.id().to_string(),
                                source: err,
                            }
                            .to_string(),
                        );
                        status = worst(status, record_status);
                        if !record_status.is_retryable() {
                            break;
                        }
                    }
                }
            }
        }

        // Step 5: reconcile post-push local state with the pulled set.
        let locals = match self
            .cache
            .list(collection, &RecordFilter::new().with_tombstones())
            .await
        {
            Ok(records) => records,
            Err(err) => {
                error!(error = %err, "Failed to read local state for reconciliation");
                report.errors.push(SyncError::LocalStore(err.to_string()).to_string());
                return self.finish(report, PassStatus::FatalStore, collection, start);
            }
        };

        let fresh_remotes: Vec<RemoteRecord> = remote_set
            .into_iter()
            .filter(|remote| !acked.contains(&remote.id))
            .collect();

        let strategy = self.policy.evaluate(collection.as_str());
        let outcome = merge(&locals, &fresh_remotes, strategy, Utc::now());

        if !outcome.conflicts.is_empty() {
            info!(
                conflicts = outcome.conflicts.len(),
                "Manual conflicts surfaced for caller-driven resolution"
            );
        }

        // Step 6: persist the merged result, one atomic upsert per record.
        for record in &outcome.records {
            if let Err(err) = self.cache.upsert(collection, record).await {
                error!(id = %record.id(), error = %err, "Failed to persist merged record");
                report.errors.push(SyncError::LocalStore(err.to_string()).to_string());
                return self.finish(report, PassStatus::FatalStore, collection, start);
            }
        }
        report.conflicts = outcome.conflicts;

        // Step 7: report.
        self.finish(report, status, collection, start)
    }

    fn finish(
        &self,
        mut report: PassReport,
        status: PassStatus,
        collection: &Collection,
        start: std::time::Instant,
    ) -> PassReport {
        report.status = status;
        report.duration_ms = start.elapsed().as_millis() as u64;

        if status.is_success() {
            self.emit(SyncEvent::SyncSucceeded {
                collection: collection.to_string(),
                pulled: report.records_pulled,
                pushed: report.records_pushed,
                duration_ms: report.duration_ms,
            });
            info!(
                pulled = report.records_pulled,
                pushed = report.records_pushed,
                deleted = report.records_deleted,
                conflicts = report.conflicts.len(),
                duration_ms = report.duration_ms,
                "Sync pass completed"
            );
        } else {
            self.emit(SyncEvent::SyncFailed {
                collection: collection.to_string(),
                code: status.code().to_string(),
            });
            warn!(
                code = status.code(),
                errors = report.errors.len(),
                duration_ms = report.duration_ms,
                "Sync pass did not complete cleanly"
            );
        }

        report
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use campushub_cache::{DatabasePool, SqliteCacheStore};
    use campushub_core::config::ConfigBuilder;
    use campushub_core::domain::record::SyncRecord;
    use campushub_core::domain::newtypes::UserId;

    use crate::probes::{SharedConnectivity, StaticIdentity};
    use crate::testutil::{notes, remote_record, ts, MockRemote};

    struct Harness {
        engine: SyncEngine,
        remote: Arc<MockRemote>,
        cache: Arc<SqliteCacheStore>,
        connectivity: Arc<SharedConnectivity>,
    }

    async fn harness_with(config: Config, signed_in: bool) -> Harness {
        let pool = DatabasePool::in_memory().await.unwrap();
        let cache = Arc::new(SqliteCacheStore::new(pool.pool().clone()));
        let remote = Arc::new(MockRemote::new());
        let connectivity = Arc::new(SharedConnectivity::new(true));
        let identity: Arc<dyn IIdentitySource> = if signed_in {
            Arc::new(StaticIdentity::signed_in(
                UserId::new("user-1".to_string()).unwrap(),
            ))
        } else {
            Arc::new(StaticIdentity::signed_out())
        };

        let engine = SyncEngine::new(
            remote.clone(),
            cache.clone(),
            connectivity.clone(),
            identity,
            &config,
        );

        Harness {
            engine,
            remote,
            cache,
            connectivity,
        }
    }

    async fn harness() -> Harness {
        harness_with(ConfigBuilder::new().build(), true).await
    }

    fn dirty_local(id: &str, title: &str, modified_secs: i64) -> SyncRecord {
        let mut record = SyncRecord::new(
            RecordId::new(id.to_string()).unwrap(),
            title,
            "local body",
        )
        .unwrap();
        record.mark_modified_at(ts(modified_secs));
        record
    }

    #[tokio::test]
    async fn test_offline_pass_aborts_without_remote_calls() {
        let h = harness().await;
        h.connectivity.set_available(false);

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::RetryableNetwork);
        assert_eq!(h.remote.fetch_calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.remote.write_calls.load(Ordering::SeqCst), 0);
        assert_eq!(report.errors.len(), 1);
    }

    #[tokio::test]
    async fn test_pull_populates_empty_cache() {
        let h = harness().await;
        h.remote.seed(vec![
            remote_record("n1", "remote n1", 1000),
            remote_record("n2", "remote n2", 2000),
        ]);

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.records_pulled, 2);

        let cached = h.cache.list(&notes(), &RecordFilter::new()).await.unwrap();
        assert_eq!(cached.len(), 2);
        for record in &cached {
            assert!(!record.is_dirty());
            assert!(record.last_synced().is_some());
        }
    }

    #[tokio::test]
    async fn test_push_clears_dirty_and_stamps_synced() {
        let h = harness().await;
        let local = dirty_local("n1", "my note", 1000);
        h.cache.upsert(&notes(), &local).await.unwrap();

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.records_pushed, 1);
        assert_eq!(h.remote.write_calls.load(Ordering::SeqCst), 1);

        let synced = h.cache.get(&notes(), local.id()).await.unwrap().unwrap();
        assert!(!synced.is_dirty());
        assert!(synced.last_synced().is_some());
        assert_eq!(synced.title(), "my note");
    }

    #[tokio::test]
    async fn test_push_skipped_without_identity() {
        let h = harness_with(ConfigBuilder::new().build(), false).await;
        let local = dirty_local("n1", "my note", 1000);
        h.cache.upsert(&notes(), &local).await.unwrap();
        h.remote.seed(vec![remote_record("n2", "remote n2", 2000)]);

        let report = h.engine.run_pass(&notes()).await;

        // Signed-out is not an error: the pull still happens and the dirty
        // record waits for the next authenticated pass.
        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.records_pushed, 0);
        assert_eq!(h.remote.write_calls.load(Ordering::SeqCst), 0);

        let still_dirty = h.cache.get(&notes(), local.id()).await.unwrap().unwrap();
        assert!(still_dirty.is_dirty());
        assert!(h.cache.get(&notes(), &RecordId::new("n2".into()).unwrap()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_per_record_push_failure_is_isolated() {
        // Push of n4 fails, pull succeeds, everything else reconciles
        // normally; n4 stays dirty.
        let h = harness().await;
        h.cache.upsert(&notes(), &dirty_local("n4", "failing", 1000)).await.unwrap();
        h.cache.upsert(&notes(), &dirty_local("n5", "passing", 1000)).await.unwrap();
        h.remote.seed(vec![remote_record("n2", "remote n2", 2000)]);
        h.remote.fail_writes_for("n4");

        let report = h.engine.run_pass(&notes()).await;

        // Transient per-record failure degrades the pass to retryable so
        // the scheduler re-pushes promptly.
        assert_eq!(report.status, PassStatus::RetryableServer);
        assert_eq!(report.records_pushed, 1);
        assert_eq!(report.errors.len(), 1);

        let n4 = h.cache.get(&notes(), &RecordId::new("n4".into()).unwrap()).await.unwrap().unwrap();
        assert!(n4.is_dirty());

        let n5 = h.cache.get(&notes(), &RecordId::new("n5".into()).unwrap()).await.unwrap().unwrap();
        assert!(!n5.is_dirty());

        let n2 = h.cache.get(&notes(), &RecordId::new("n2".into()).unwrap()).await.unwrap().unwrap();
        assert!(!n2.is_dirty());
    }

    #[tokio::test]
    async fn test_pull_failure_aborts_without_touching_cache() {
        let h = harness().await;
        let existing = SyncRecord::from_remote(&remote_record("n1", "cached", 1000), ts(1500));
        h.cache.upsert(&notes(), &existing).await.unwrap();
        h.remote.fail_fetch_with(RemoteError::Network("connection reset".to_string()));

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::RetryableNetwork);
        assert_eq!(h.remote.write_calls.load(Ordering::SeqCst), 0);

        // Cached state untouched.
        let cached = h.cache.get(&notes(), existing.id()).await.unwrap().unwrap();
        assert_eq!(cached, existing);
    }

    #[tokio::test]
    async fn test_fatal_auth_on_push_still_reconciles_pull() {
        let h = harness().await;
        h.cache.upsert(&notes(), &dirty_local("n1", "mine", 1000)).await.unwrap();
        h.remote.seed(vec![remote_record("n2", "remote n2", 2000)]);
        h.remote.fail_writes_for("n1");
        h.remote
            .set_write_error(RemoteError::Auth("token revoked".to_string()));

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::FatalAuth);
        // The pulled record still landed in the cache.
        assert!(h.cache.get(&notes(), &RecordId::new("n2".into()).unwrap()).await.unwrap().is_some());
        // The dirty record is untouched.
        let n1 = h.cache.get(&notes(), &RecordId::new("n1".into()).unwrap()).await.unwrap().unwrap();
        assert!(n1.is_dirty());
    }

    #[tokio::test]
    async fn test_acked_push_not_rolled_back_by_stale_pull() {
        // The pull happens before the push, so the pulled view of a record
        // we just pushed is stale and must not win reconciliation.
        let h = harness().await;
        h.remote.seed(vec![remote_record("n1", "stale remote", 1000)]);
        h.cache.upsert(&notes(), &dirty_local("n1", "freshly edited", 2000)).await.unwrap();

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.records_pushed, 1);

        let n1 = h.cache.get(&notes(), &RecordId::new("n1".into()).unwrap()).await.unwrap().unwrap();
        assert_eq!(n1.title(), "freshly edited");
        assert!(!n1.is_dirty());
    }

    #[tokio::test]
    async fn test_tombstone_propagated_and_purged() {
        let h = harness().await;
        h.remote.seed(vec![remote_record("n1", "to delete", 1000)]);

        let mut tombstone = SyncRecord::from_remote(&remote_record("n1", "to delete", 1000), ts(1500));
        tombstone.mark_deleted_at(ts(2000));
        h.cache.upsert(&notes(), &tombstone).await.unwrap();

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.records_deleted, 1);
        assert_eq!(*h.remote.deleted_ids.lock().unwrap(), vec!["n1".to_string()]);

        // Purged locally and not resurrected by the stale pull.
        assert!(h.cache.get(&notes(), tombstone.id()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pull_absence_never_deletes_locally() {
        let h = harness().await;
        let cached = SyncRecord::from_remote(&remote_record("n1", "kept", 1000), ts(1500));
        h.cache.upsert(&notes(), &cached).await.unwrap();
        // Remote set is empty: n1 is absent from the pull.

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert!(h.cache.get(&notes(), cached.id()).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_manual_strategy_surfaces_conflicts() {
        let config = ConfigBuilder::new()
            .conflicts_default_strategy("manual")
            .build();
        let h = harness_with(config, false).await;

        let mut local = SyncRecord::from_remote(&remote_record("n1", "original", 1000), ts(1200));
        local.set_title("locally edited").unwrap();
        local.mark_modified_at(ts(2000));
        h.cache.upsert(&notes(), &local).await.unwrap();
        h.remote.seed(vec![remote_record("n1", "remotely edited", 3000)]);

        let report = h.engine.run_pass(&notes()).await;

        assert_eq!(report.status, PassStatus::Success);
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].local.title(), "locally edited");
        assert_eq!(report.conflicts[0].remote.title, "remotely edited");

        // The local version is retained, still dirty, until resolved.
        let retained = h.cache.get(&notes(), local.id()).await.unwrap().unwrap();
        assert_eq!(retained.title(), "locally edited");
        assert!(retained.is_dirty());
    }

    #[tokio::test]
    async fn test_status_codes() {
        assert_eq!(PassStatus::Success.code(), "SUCCESS");
        assert_eq!(PassStatus::RetryableNetwork.code(), "RETRYABLE_NETWORK");
        assert_eq!(PassStatus::RetryableServer.code(), "RETRYABLE_SERVER");
        assert_eq!(PassStatus::FatalAuth.code(), "FATAL_AUTH");
        assert_eq!(PassStatus::FatalSchema.code(), "FATAL_SCHEMA");
        assert_eq!(PassStatus::FatalStore.code(), "FATAL_STORE");

        assert!(PassStatus::RetryableNetwork.is_retryable());
        assert!(PassStatus::RetryableServer.is_retryable());
        assert!(!PassStatus::FatalAuth.is_retryable());
        assert!(!PassStatus::Success.is_retryable());
    }

    #[test]
    fn test_classify_remote_error() {
        assert_eq!(
            classify_remote_error(&RemoteError::Network("x".into())),
            PassStatus::RetryableNetwork
        );
        assert_eq!(
            classify_remote_error(&RemoteError::Server {
                status: 503,
                message: "x".into()
            }),
            PassStatus::RetryableServer
        );
        assert_eq!(
            classify_remote_error(&RemoteError::Auth("x".into())),
            PassStatus::FatalAuth
        );
        assert_eq!(
            classify_remote_error(&RemoteError::Schema("x".into())),
            PassStatus::FatalSchema
        );
    }

    #[test]
    fn test_worst_prefers_fatal() {
        assert_eq!(
            worst(PassStatus::Success, PassStatus::RetryableServer),
            PassStatus::RetryableServer
        );
        assert_eq!(
            worst(PassStatus::RetryableServer, PassStatus::FatalAuth),
            PassStatus::FatalAuth
        );
        assert_eq!(
            worst(PassStatus::FatalAuth, PassStatus::RetryableNetwork),
            PassStatus::FatalAuth
        );
    }
}
