//! Remote data source port (driven/secondary port)
//!
//! Interface to the remote document database backing the app. The primary
//! implementation targets a hosted document store behind a REST/gRPC SDK,
//! but the trait is provider-agnostic: the sync core only needs ordered
//! paginated queries, full-collection fetches, point writes, and deletes.
//!
//! ## Design Notes
//!
//! - Errors are a typed [`RemoteError`] rather than `anyhow` because the
//!   orchestrator must classify failures (retryable network/server vs.
//!   fatal auth/schema) to drive the scheduler's backoff policy.
//! - [`RemoteRecord`] is shared with the domain so the pure conflict
//!   resolver can reconcile local/remote pairs without an extra mapping
//!   layer.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::domain::newtypes::{Collection, PageCursor, RecordId, UserId};
use crate::domain::record::RemoteRecord;

// ============================================================================
// RemoteError
// ============================================================================

/// Errors surfaced by remote data source implementations
///
/// The split matters: `is_transient` decides whether a failed pass is
/// retried with backoff or reported as terminal for the cycle.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RemoteError {
    /// Connection-level failure (DNS, refused, reset, timeout)
    #[error("network error: {0}")]
    Network(String),

    /// The remote answered with a server-side failure status
    #[error("server error (status {status}): {message}")]
    Server {
        /// HTTP-equivalent status code
        status: u16,
        /// Provider error message
        message: String,
    },

    /// Authentication or authorization was rejected
    #[error("authentication rejected: {0}")]
    Auth(String),

    /// The payload does not match the remote schema
    #[error("schema mismatch: {0}")]
    Schema(String),
}

impl RemoteError {
    /// Returns true if retrying the same operation later can succeed
    ///
    /// Network failures, 5xx responses, and throttling (429) are transient;
    /// auth and schema failures are not.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteError::Network(_) => true,
            RemoteError::Server { status, .. } => *status >= 500 || *status == 429,
            RemoteError::Auth(_) | RemoteError::Schema(_) => false,
        }
    }
}

// ============================================================================
// Port DTOs
// ============================================================================

/// Acknowledgment of a successful remote write
#[derive(Debug, Clone)]
pub struct WriteAck {
    /// Identifier of the written record
    pub id: RecordId,
    /// Modification timestamp assigned by the remote
    pub modified_at: DateTime<Utc>,
    /// Version assigned by the remote, if the collection tracks one
    pub version: Option<i64>,
}

/// One page of an ordered remote query
#[derive(Debug, Clone)]
pub struct QueryPage {
    /// Records in this page, in query order
    pub items: Vec<RemoteRecord>,
    /// Continuation cursor; `None` when the collection is exhausted
    pub next_cursor: Option<PageCursor>,
}

/// Fixed orderings supported by remote queries
///
/// Each list view pins one ordering (notes by upload time descending,
/// events by start time ascending, ...); cursors are only meaningful
/// within a single ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteOrder {
    /// Newest first by creation time
    CreatedDesc,
    /// Most recently modified first
    ModifiedDesc,
    /// Alphabetical by title
    TitleAsc,
}

// ============================================================================
// IRemoteSource trait
// ============================================================================

/// Port trait for the remote document database
///
/// Implementations handle provider-specific transport, serialization, and
/// auth-token plumbing, and map provider failures onto [`RemoteError`].
#[async_trait::async_trait]
pub trait IRemoteSource: Send + Sync {
    /// Fetches the authoritative full contents of a collection
    ///
    /// Used by the sync pass pull phase. Collections in this app are small
    /// enough that a full fetch per pass is acceptable.
    async fn fetch_all(&self, collection: &Collection) -> Result<Vec<RemoteRecord>, RemoteError>;

    /// Creates or updates one record
    ///
    /// `author` attributes the write to the authenticated user.
    async fn write(
        &self,
        collection: &Collection,
        record: &RemoteRecord,
        author: &UserId,
    ) -> Result<WriteAck, RemoteError>;

    /// Deletes one record
    ///
    /// Deleting an already-absent record is a success, so tombstone
    /// propagation is idempotent across retried passes.
    async fn delete(&self, collection: &Collection, id: &RecordId) -> Result<(), RemoteError>;

    /// Queries one page of a collection under a fixed ordering
    ///
    /// `after` must be a cursor previously returned by the same ordering,
    /// passed back unmodified. `None` starts from the beginning.
    async fn query(
        &self,
        collection: &Collection,
        order: RemoteOrder,
        limit: u32,
        after: Option<&PageCursor>,
    ) -> Result<QueryPage, RemoteError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_network_errors_are_transient() {
        assert!(RemoteError::Network("connection reset".to_string()).is_transient());
    }

    #[test]
    fn test_server_errors_transient_by_status() {
        let err = |status| RemoteError::Server {
            status,
            message: "boom".to_string(),
        };
        assert!(err(500).is_transient());
        assert!(err(503).is_transient());
        assert!(err(429).is_transient());
        assert!(!err(404).is_transient());
        assert!(!err(400).is_transient());
    }

    #[test]
    fn test_auth_and_schema_are_fatal() {
        assert!(!RemoteError::Auth("token revoked".to_string()).is_transient());
        assert!(!RemoteError::Schema("unknown field".to_string()).is_transient());
    }

    #[test]
    fn test_error_display() {
        let err = RemoteError::Server {
            status: 503,
            message: "unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "server error (status 503): unavailable");
    }
}
