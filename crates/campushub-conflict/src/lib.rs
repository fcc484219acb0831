//! CampusHub Conflict - Pure reconciliation logic
//!
//! Reconciles one local and one remote view of the same logical entity, and
//! batch-merges whole collections. No I/O: everything here is a pure
//! function over domain values, which is what makes the merge properties
//! (cardinality, idempotence, determinism) testable in isolation.
//!
//! ## Modules
//!
//! - [`resolver`] - Single-pair resolution under a selectable strategy
//! - [`merge`] - Batch merge of a local and a remote record set
//! - [`policy`] - Per-collection strategy rules from configuration

pub mod merge;
pub mod policy;
pub mod resolver;

pub use merge::{merge, MergeOutcome};
pub use policy::PolicyEngine;
pub use resolver::{resolve, ManualConflict, MergeStrategy, Resolved};

use thiserror::Error;

/// Errors that can occur during conflict handling
#[derive(Debug, Error, Clone)]
pub enum ConflictError {
    /// The strategy was `Manual` and both sides changed; resolution is
    /// refused and both versions are carried for caller-driven handling
    #[error("manual resolution required for record {id}")]
    ManualResolutionRequired {
        /// Id of the conflicted record
        id: String,
        /// Both versions, for UI-level resolution
        conflict: Box<ManualConflict>,
    },

    /// A strategy rule from configuration could not be compiled
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The offending glob pattern
        pattern: String,
        /// Why it was rejected
        reason: String,
    },
}
