//! Single-pair conflict resolution
//!
//! Given one local and one remote view of the same logical entity (matched
//! by id), [`resolve`] produces a single reconciled record under a
//! caller-selected [`MergeStrategy`]. Pure function, no I/O.
//!
//! A local record with no pending mutations never conflicts: the remote is
//! authoritative and wins under every strategy. Only a dirty local record
//! triggers strategy evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use campushub_core::domain::record::{RemoteRecord, SyncRecord};

use crate::ConflictError;

// ============================================================================
// MergeStrategy
// ============================================================================

/// How a dirty local record is reconciled against a changed remote
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeStrategy {
    /// The remote always wins; local mutations are discarded
    ServerWins,
    /// The local record always wins and stays dirty (still needs a push)
    ClientWins,
    /// The later modification timestamp wins; ties go to the remote so the
    /// fleet converges toward the source of truth
    #[default]
    LastWriteWins,
    /// Resolution is refused; both versions are surfaced to the caller
    Manual,
}

impl MergeStrategy {
    /// Parses a strategy from its configuration string
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "server_wins" => Some(MergeStrategy::ServerWins),
            "client_wins" => Some(MergeStrategy::ClientWins),
            "last_write_wins" => Some(MergeStrategy::LastWriteWins),
            "manual" => Some(MergeStrategy::Manual),
            _ => None,
        }
    }
}

impl std::fmt::Display for MergeStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            MergeStrategy::ServerWins => "server_wins",
            MergeStrategy::ClientWins => "client_wins",
            MergeStrategy::LastWriteWins => "last_write_wins",
            MergeStrategy::Manual => "manual",
        };
        write!(f, "{}", s)
    }
}

// ============================================================================
// Resolution result
// ============================================================================

/// Both versions of a record that requires caller-driven resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManualConflict {
    /// The dirty local version
    pub local: SyncRecord,
    /// The remote version it collided with
    pub remote: RemoteRecord,
}

/// Outcome of a single-pair resolution
///
/// A dedicated enum rather than an error so callers cannot accidentally
/// ignore the conflict case: matching on the result forces a decision.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolved {
    /// One reconciled record
    Merged(SyncRecord),
    /// Strategy was [`MergeStrategy::Manual`] and both sides changed
    Conflict(Box<ManualConflict>),
}

impl Resolved {
    /// Returns true if this is a conflict
    pub fn is_conflict(&self) -> bool {
        matches!(self, Resolved::Conflict(_))
    }

    /// Converts to a `Result`, turning the conflict case into a
    /// [`ConflictError`] carrying both versions
    pub fn into_result(self) -> Result<SyncRecord, ConflictError> {
        match self {
            Resolved::Merged(record) => Ok(record),
            Resolved::Conflict(conflict) => Err(ConflictError::ManualResolutionRequired {
                id: conflict.local.id().to_string(),
                conflict,
            }),
        }
    }
}

// ============================================================================
// resolve()
// ============================================================================

/// Reconciles one local/remote pair under the given strategy
///
/// `now` stamps `last_synced` on remote-winning results; passing it in
/// keeps the function pure and the merge deterministic under test.
///
/// Rules:
/// - clean local → remote wins under every strategy
/// - `ServerWins` → remote, synced
/// - `ClientWins` → local, still dirty
/// - `LastWriteWins` → strictly newer `local.last_modified` keeps the
///   local (dirty); otherwise the remote wins, ties included
/// - `Manual` → [`Resolved::Conflict`] with both versions
pub fn resolve(
    local: &SyncRecord,
    remote: &RemoteRecord,
    strategy: MergeStrategy,
    now: DateTime<Utc>,
) -> Resolved {
    if !local.is_dirty() {
        return Resolved::Merged(SyncRecord::from_remote(remote, now));
    }

    match strategy {
        MergeStrategy::ServerWins => Resolved::Merged(SyncRecord::from_remote(remote, now)),
        MergeStrategy::ClientWins => Resolved::Merged(local.clone()),
        MergeStrategy::LastWriteWins => {
            if local.last_modified() > remote.modified_at {
                Resolved::Merged(local.clone())
            } else {
                Resolved::Merged(SyncRecord::from_remote(remote, now))
            }
        }
        MergeStrategy::Manual => Resolved::Conflict(Box::new(ManualConflict {
            local: local.clone(),
            remote: remote.clone(),
        })),
    }
}
