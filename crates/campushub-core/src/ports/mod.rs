//! Port definitions (trait interfaces for adapters)
//!
//! Driven ports implemented by adapter crates or platform glue:
//! - [`IRemoteSource`] — the remote document database
//! - [`ICacheStore`] — durable local cache
//! - [`IConnectivityProbe`] / [`IPowerProbe`] — device state
//! - [`IIdentitySource`] — opaque auth provider
//! - [`ITelemetrySink`] — fire-and-forget event sink

pub mod cache_store;
pub mod connectivity;
pub mod identity;
pub mod remote_source;
pub mod telemetry;

pub use cache_store::{CacheCounts, ICacheStore, RecordFilter};
pub use connectivity::{IConnectivityProbe, IPowerProbe};
pub use identity::IIdentitySource;
pub use remote_source::{IRemoteSource, QueryPage, RemoteError, RemoteOrder, WriteAck};
pub use telemetry::{ITelemetrySink, SyncEvent};
