//! Domain model for the CampusHub sync subsystem
//!
//! Pure types with no I/O: validated identifiers, the cached entity with
//! its sync metadata, and the remote view it is reconciled against.

pub mod errors;
pub mod newtypes;
pub mod record;

pub use errors::DomainError;
pub use newtypes::{Collection, PageCursor, RecordId, UserId};
pub use record::{RemoteRecord, SyncRecord};
