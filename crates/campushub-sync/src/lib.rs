//! CampusHub Sync - Orchestration runtime
//!
//! Drives reconciliation between the local cache and the remote document
//! store:
//!
//! - [`engine`] - One synchronization pass per collection: pull, push of
//!   dirty records, batch reconciliation, per-record persistence
//! - [`scheduler`] - Periodic and on-demand triggers with bounded
//!   retry/backoff, honoring connectivity and power constraints
//! - [`paging`] - Stateless forward cursor pagination for list views
//! - [`probes`] - Watch-backed connectivity probe and fixed identity source
//! - [`logging`] - tracing-subscriber initialization from configuration

pub mod engine;
pub mod logging;
pub mod paging;
pub mod probes;
pub mod scheduler;

#[cfg(test)]
pub(crate) mod testutil;

use thiserror::Error;

use campushub_core::ports::remote_source::RemoteError;

/// Errors that can occur during a synchronization pass
///
/// Per-record push failures are isolated (the pass continues); pull and
/// local-store failures abort the pass. The pass outcome reported to the
/// scheduler is a [`engine::PassStatus`] derived from these.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The connectivity probe reported no network; no remote call was made
    #[error("network unavailable")]
    NetworkUnavailable,

    /// The whole-pass remote pull failed
    #[error("remote pull failed: {0}")]
    RemotePullFailed(#[source] RemoteError),

    /// A single record's remote write failed; the record stays dirty
    #[error("remote write failed for {id}: {source}")]
    RemoteWriteFailed {
        /// Id of the record that failed to push
        id: String,
        /// The underlying remote error
        #[source]
        source: RemoteError,
    },

    /// The local cache failed; fatal for this pass
    #[error("local store error: {0}")]
    LocalStore(String),
}
