//! Connectivity and power probes (driven/secondary ports)
//!
//! The sync orchestrator never attempts remote calls while offline, and
//! the scheduler can additionally hold back periodic passes when the device
//! reports a critically low battery.

use tokio::sync::watch;

/// Port trait for network reachability
pub trait IConnectivityProbe: Send + Sync {
    /// Returns the current reachability state
    fn is_available(&self) -> bool;

    /// Subscribes to reachability changes
    ///
    /// The returned receiver replays the latest value immediately, so a
    /// subscriber never starts with stale assumptions about the link.
    fn watch(&self) -> watch::Receiver<bool>;
}

/// Port trait for device power state
///
/// Optional: the scheduler only consults it when one is wired in.
pub trait IPowerProbe: Send + Sync {
    /// Returns true while the device is under a critical low-power
    /// condition and background sync should be deferred
    fn is_critically_low(&self) -> bool;
}
