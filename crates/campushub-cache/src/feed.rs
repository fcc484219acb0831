//! Per-collection change notifications for UI consumers
//!
//! List views render from the local cache, not from the network. When the
//! sync orchestrator (or a local edit) writes to the cache, the feed bumps
//! a per-collection revision counter over a `tokio::sync::watch` channel:
//! subscribers get the latest revision replayed immediately on subscribe,
//! and every subscriber sees every subsequent bump (fan-out). Consumers
//! re-query the store when the revision changes.

use dashmap::DashMap;
use tokio::sync::watch;
use tracing::trace;

use campushub_core::domain::newtypes::Collection;

/// Revision-counter change feed, one channel per collection
#[derive(Debug, Default)]
pub struct ChangeFeed {
    channels: DashMap<String, watch::Sender<u64>>,
}

impl ChangeFeed {
    /// Creates an empty feed
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a collection's revision counter
    ///
    /// The receiver immediately holds the latest revision (0 if the
    /// collection has never changed).
    pub fn subscribe(&self, collection: &Collection) -> watch::Receiver<u64> {
        self.channels
            .entry(collection.as_str().to_string())
            .or_insert_with(|| watch::channel(0).0)
            .subscribe()
    }

    /// Returns the current revision of a collection
    pub fn revision(&self, collection: &Collection) -> u64 {
        self.channels
            .get(collection.as_str())
            .map(|sender| *sender.borrow())
            .unwrap_or(0)
    }

    /// Bumps a collection's revision, waking all subscribers
    pub fn notify(&self, collection: &Collection) {
        let sender = self
            .channels
            .entry(collection.as_str().to_string())
            .or_insert_with(|| watch::channel(0).0);
        sender.send_modify(|revision| *revision += 1);
        trace!(collection = %collection, revision = *sender.borrow(), "Cache changed");
    }
}
