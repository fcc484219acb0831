//! Local cache store port (driven/secondary port)
//!
//! Interface for persisting cached entities with their sync metadata.
//!
//! ## Design Notes
//!
//! - Uses `anyhow::Result` because storage errors are adapter-specific
//!   (SQLite, in-memory, etc.) and a cache failure is treated uniformly as
//!   fatal for the running pass, with no finer classification needed.
//! - The [`RecordFilter`] struct provides a composable query mechanism
//!   without exposing storage implementation details.
//! - Each write is atomic per record. The sync pass relies on that:
//!   partial progress after a crash is valid state, not corruption.

use chrono::{DateTime, Utc};

use crate::domain::newtypes::{Collection, RecordId, UserId};
use crate::domain::record::SyncRecord;

// ============================================================================
// RecordFilter
// ============================================================================

/// Filter criteria for querying cached records
///
/// All fields are optional; when unset, no filtering is applied for that
/// field. Multiple filters combine with AND logic. Tombstones are excluded
/// unless explicitly requested — list views never want them, only the
/// orchestrator does.
#[derive(Debug, Clone, Default)]
pub struct RecordFilter {
    /// Filter by owning user
    pub owner_id: Option<UserId>,
    /// Filter by dirty flag
    pub dirty: Option<bool>,
    /// Include tombstoned records (default false)
    pub include_tombstones: bool,
    /// Only records modified after this timestamp
    pub modified_since: Option<DateTime<Utc>>,
}

impl RecordFilter {
    /// Creates a new empty filter (matches all live records)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the owner filter
    pub fn with_owner(mut self, owner_id: UserId) -> Self {
        self.owner_id = Some(owner_id);
        self
    }

    /// Sets the dirty-flag filter
    pub fn with_dirty(mut self, dirty: bool) -> Self {
        self.dirty = Some(dirty);
        self
    }

    /// Includes tombstoned records in the result
    pub fn with_tombstones(mut self) -> Self {
        self.include_tombstones = true;
        self
    }

    /// Sets the modified-since filter
    pub fn with_modified_since(mut self, since: DateTime<Utc>) -> Self {
        self.modified_since = Some(since);
        self
    }
}

/// Per-collection record counts, for status displays and diagnostics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheCounts {
    /// All rows, tombstones included
    pub total: u64,
    /// Rows with pending local mutations
    pub dirty: u64,
    /// Pending local deletes
    pub tombstones: u64,
}

// ============================================================================
// ICacheStore trait
// ============================================================================

/// Port trait for the durable local cache
///
/// One logical table per entity collection, primary key `id`, with the
/// sync-metadata columns present on every row.
#[async_trait::async_trait]
pub trait ICacheStore: Send + Sync {
    /// Inserts or replaces one record (atomic per record)
    async fn upsert(&self, collection: &Collection, record: &SyncRecord) -> anyhow::Result<()>;

    /// Retrieves one record by id
    async fn get(
        &self,
        collection: &Collection,
        id: &RecordId,
    ) -> anyhow::Result<Option<SyncRecord>>;

    /// Queries records matching the given filter criteria
    async fn list(
        &self,
        collection: &Collection,
        filter: &RecordFilter,
    ) -> anyhow::Result<Vec<SyncRecord>>;

    /// Retrieves the dirty subset (tombstones included)
    async fn dirty_records(&self, collection: &Collection) -> anyhow::Result<Vec<SyncRecord>>;

    /// Removes one record row entirely
    ///
    /// Used after a tombstone's delete has been acknowledged remotely;
    /// local soft-deletes go through [`SyncRecord::mark_deleted_at`] and
    /// `upsert`.
    async fn remove(&self, collection: &Collection, id: &RecordId) -> anyhow::Result<()>;

    /// Counts rows by sync state
    async fn counts(&self, collection: &Collection) -> anyhow::Result<CacheCounts>;
}
