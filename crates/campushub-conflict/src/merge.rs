//! Batch merge of a local and a remote record set
//!
//! One call reconciles a whole collection: every remote record lands in the
//! result (resolved against its local counterpart when one exists), and
//! every local-only record is retained unchanged — it is either not yet
//! pushed or tombstoned, and pull-absence alone never deletes. The result
//! carries exactly one record per distinct id.

use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Utc};
use tracing::warn;

use campushub_core::domain::newtypes::RecordId;
use campushub_core::domain::record::{RemoteRecord, SyncRecord};

use crate::resolver::{resolve, ManualConflict, MergeStrategy, Resolved};

/// Result of a batch merge
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    /// The reconciled set, one record per distinct id
    pub records: Vec<SyncRecord>,
    /// Pairs that refused automatic resolution (strategy `Manual`); the
    /// local version is retained in `records`, still dirty, until the
    /// caller resolves
    pub conflicts: Vec<ManualConflict>,
}

/// Merges two record sets into one reconciled set
///
/// - remote record with a local counterpart: dirty local → single-pair
///   resolution; clean local → remote as-is (synced)
/// - remote record absent locally: included as-is (synced)
/// - local record absent remotely: retained unchanged
///
/// Duplicate ids within `remotes` keep the first occurrence; later ones
/// are dropped with a warning. Ordering of the result is not part of the
/// contract. Deterministic given a fixed `now`.
pub fn merge(
    locals: &[SyncRecord],
    remotes: &[RemoteRecord],
    strategy: MergeStrategy,
    now: DateTime<Utc>,
) -> MergeOutcome {
    let local_by_id: HashMap<&RecordId, &SyncRecord> =
        locals.iter().map(|record| (record.id(), record)).collect();

    let mut outcome = MergeOutcome::default();
    let mut merged_ids: HashSet<RecordId> = HashSet::with_capacity(remotes.len());

    for remote in remotes {
        if !merged_ids.insert(remote.id.clone()) {
            warn!(id = %remote.id, "Duplicate id in remote set, keeping first occurrence");
            continue;
        }

        match local_by_id.get(&remote.id) {
            Some(local) => match resolve(local, remote, strategy, now) {
                Resolved::Merged(record) => outcome.records.push(record),
                Resolved::Conflict(conflict) => {
                    outcome.records.push((*local).clone());
                    outcome.conflicts.push(*conflict);
                }
            },
            None => outcome.records.push(SyncRecord::from_remote(remote, now)),
        }
    }

    for local in locals {
        if !merged_ids.contains(local.id()) {
            outcome.records.push(local.clone());
        }
    }

    outcome
}
