//! SyncRecord domain entity
//!
//! A [`SyncRecord`] is the locally cached representation of one logical
//! entity (a note, an event, a mentorship offer, a placement posting) plus
//! the metadata the sync subsystem needs to reconcile it with the remote
//! document store:
//!
//! - `last_modified` — stamped by the writer on every local mutation
//! - `last_synced` — stamped only after a confirmed remote write or pull
//! - `is_dirty` — local mutations not yet acknowledged by the remote
//! - `tombstone` — a local delete that still has to be propagated
//!
//! [`RemoteRecord`] is the remote view of the same logical entity. The two
//! types share domain fields but only the local one carries sync metadata;
//! the conflict resolver reconciles a pair into a single `SyncRecord`.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::errors::DomainError;
use super::newtypes::{RecordId, UserId};

// ============================================================================
// RemoteRecord
// ============================================================================

/// The remote document store's view of one entity
///
/// Plain data as returned by remote fetches and queries. `modified_at` is
/// the remote modification timestamp used by last-write-wins reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteRecord {
    /// Identifier, stable across local and remote representations
    pub id: RecordId,
    /// Record title
    pub title: String,
    /// Free-text description / body
    pub description: String,
    /// Owning user, if the record is attributed
    pub owner_id: Option<UserId>,
    /// Display name of the owner at write time
    pub owner_name: Option<String>,
    /// URL of an attached blob (upload mechanics are out of scope)
    pub attachment_url: Option<String>,
    /// Named counters (downloads, attendees, applicants, ...)
    pub counters: BTreeMap<String, i64>,
    /// When the record was created, if the remote reports it
    pub created_at: Option<DateTime<Utc>>,
    /// When the record was last modified on the remote
    pub modified_at: DateTime<Utc>,
    /// Monotonic version for collections that require strict ordering
    pub version: Option<i64>,
}

// ============================================================================
// SyncRecord
// ============================================================================

/// A locally cached entity with sync metadata
///
/// Field ownership is split three ways:
/// - UI/business code mutates domain fields and calls
///   [`mark_modified_at`](SyncRecord::mark_modified_at)
/// - the sync orchestrator is the only writer of `is_dirty` / `last_synced`
///   (via [`mark_synced_at`](SyncRecord::mark_synced_at) and
///   [`apply_remote`](SyncRecord::apply_remote))
/// - nothing else touches the metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncRecord {
    /// Globally unique identifier
    id: RecordId,
    /// Record title
    title: String,
    /// Free-text description / body
    description: String,
    /// Owning user
    owner_id: Option<UserId>,
    /// Display name of the owner
    owner_name: Option<String>,
    /// URL of an attached blob
    attachment_url: Option<String>,
    /// Named counters
    counters: BTreeMap<String, i64>,
    /// Creation time
    created_at: DateTime<Utc>,
    /// Last local mutation time
    last_modified: DateTime<Utc>,
    /// Last confirmed remote write or pull (None until first sync)
    last_synced: Option<DateTime<Utc>>,
    /// True iff local mutations have not been acknowledged remotely
    is_dirty: bool,
    /// True iff the record was deleted locally and the delete is pending
    tombstone: bool,
    /// Monotonic version for collections that require strict ordering
    version: Option<i64>,
}

impl SyncRecord {
    /// Creates a record for a first local write
    ///
    /// The record starts dirty with `last_synced = None`: it exists locally
    /// and has never been confirmed by the remote.
    ///
    /// # Errors
    /// Returns `DomainError::ValidationFailed` if the title is empty.
    pub fn new(
        id: RecordId,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "title cannot be empty".to_string(),
            ));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            title,
            description: description.into(),
            owner_id: None,
            owner_name: None,
            attachment_url: None,
            counters: BTreeMap::new(),
            created_at: now,
            last_modified: now,
            last_synced: None,
            is_dirty: true,
            tombstone: false,
            version: None,
        })
    }

    /// Creates a record from its remote representation (first remote pull)
    ///
    /// The result is clean: `last_synced = now`, `is_dirty = false`.
    #[must_use]
    pub fn from_remote(remote: &RemoteRecord, now: DateTime<Utc>) -> Self {
        Self {
            id: remote.id.clone(),
            title: remote.title.clone(),
            description: remote.description.clone(),
            owner_id: remote.owner_id.clone(),
            owner_name: remote.owner_name.clone(),
            attachment_url: remote.attachment_url.clone(),
            counters: remote.counters.clone(),
            created_at: remote.created_at.unwrap_or(remote.modified_at),
            last_modified: remote.modified_at,
            last_synced: Some(now),
            is_dirty: false,
            tombstone: false,
            version: remote.version,
        }
    }

    // --- Getters ---

    /// Returns the record identifier
    pub fn id(&self) -> &RecordId {
        &self.id
    }

    /// Returns the title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the owning user id, if attributed
    pub fn owner_id(&self) -> Option<&UserId> {
        self.owner_id.as_ref()
    }

    /// Returns the owner display name
    pub fn owner_name(&self) -> Option<&str> {
        self.owner_name.as_deref()
    }

    /// Returns the attachment URL
    pub fn attachment_url(&self) -> Option<&str> {
        self.attachment_url.as_deref()
    }

    /// Returns all counters
    pub fn counters(&self) -> &BTreeMap<String, i64> {
        &self.counters
    }

    /// Returns a named counter, 0 if absent
    pub fn counter(&self, name: &str) -> i64 {
        self.counters.get(name).copied().unwrap_or(0)
    }

    /// Returns the creation time
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the last local mutation time
    pub fn last_modified(&self) -> DateTime<Utc> {
        self.last_modified
    }

    /// Returns the last confirmed sync time
    pub fn last_synced(&self) -> Option<DateTime<Utc>> {
        self.last_synced
    }

    /// Returns true if local mutations are pending remote acknowledgment
    pub fn is_dirty(&self) -> bool {
        self.is_dirty
    }

    /// Returns true if a local delete is pending propagation
    pub fn is_tombstone(&self) -> bool {
        self.tombstone
    }

    /// Returns the record version, if the collection tracks one
    pub fn version(&self) -> Option<i64> {
        self.version
    }

    // --- UI-side mutators (domain fields) ---

    /// Sets the title
    ///
    /// # Errors
    /// Returns `DomainError::ValidationFailed` if the title is empty.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), DomainError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::ValidationFailed(
                "title cannot be empty".to_string(),
            ));
        }
        self.title = title;
        Ok(())
    }

    /// Sets the description
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Sets the owner attribution
    pub fn set_owner(&mut self, owner_id: UserId, owner_name: impl Into<String>) {
        self.owner_id = Some(owner_id);
        self.owner_name = Some(owner_name.into());
    }

    /// Sets the attachment URL
    pub fn set_attachment_url(&mut self, url: Option<String>) {
        self.attachment_url = url;
    }

    /// Sets a named counter
    pub fn set_counter(&mut self, name: impl Into<String>, value: i64) {
        self.counters.insert(name.into(), value);
    }

    /// Adds to a named counter (creating it at 0 if absent)
    pub fn increment_counter(&mut self, name: impl Into<String>, delta: i64) {
        *self.counters.entry(name.into()).or_insert(0) += delta;
    }

    /// Records a local mutation at the given time: marks the record dirty
    /// and bumps `last_modified`
    pub fn mark_modified_at(&mut self, at: DateTime<Utc>) {
        self.last_modified = at;
        self.is_dirty = true;
    }

    /// Records a local mutation at the current time
    pub fn mark_modified(&mut self) {
        self.mark_modified_at(Utc::now());
    }

    /// Records a local delete at the given time
    ///
    /// The record becomes a dirty tombstone; the orchestrator propagates
    /// the delete to the remote on its next pass and purges the row once
    /// acknowledged.
    pub fn mark_deleted_at(&mut self, at: DateTime<Utc>) {
        self.tombstone = true;
        self.mark_modified_at(at);
    }

    // --- Orchestrator-side mutators (sync metadata) ---

    /// Records a confirmed remote acknowledgment: clears the dirty flag and
    /// stamps `last_synced`
    ///
    /// Must only be called after a successful remote write or pull.
    pub fn mark_synced_at(&mut self, at: DateTime<Utc>) {
        self.is_dirty = false;
        self.last_synced = Some(at);
    }

    /// Adopts the remote-assigned version after a confirmed write
    pub fn set_version(&mut self, version: Option<i64>) {
        self.version = version;
    }

    /// Overwrites this record with the remote view and marks it synced
    pub fn apply_remote(&mut self, remote: &RemoteRecord, now: DateTime<Utc>) {
        *self = Self::from_remote(remote, now);
    }

    // --- Conversions and invariants ---

    /// Builds the remote representation used for a push
    ///
    /// `modified_at` carries the local mutation time so the remote (and any
    /// other client's last-write-wins resolution) sees when the edit was
    /// actually made.
    #[must_use]
    pub fn to_remote(&self) -> RemoteRecord {
        RemoteRecord {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            owner_id: self.owner_id.clone(),
            owner_name: self.owner_name.clone(),
            attachment_url: self.attachment_url.clone(),
            counters: self.counters.clone(),
            created_at: Some(self.created_at),
            modified_at: self.last_modified,
            version: self.version,
        }
    }

    /// Checks the dirty-implies-unsynced-mutation invariant
    ///
    /// `is_dirty == true` requires `last_modified` to be newer than
    /// `last_synced` (or `last_synced` to be unset).
    pub fn is_consistent(&self) -> bool {
        if !self.is_dirty {
            return true;
        }
        match self.last_synced {
            None => true,
            Some(synced) => self.last_modified > synced,
        }
    }
}
