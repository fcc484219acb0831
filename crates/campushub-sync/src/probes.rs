//! Probe implementations for wiring and tests
//!
//! Platform glue normally implements `IConnectivityProbe` on top of the
//! OS network monitor. [`SharedConnectivity`] is the watch-backed
//! building block that glue feeds; it also serves tests directly.

use tokio::sync::watch;

use campushub_core::domain::newtypes::UserId;
use campushub_core::ports::connectivity::IConnectivityProbe;
use campushub_core::ports::identity::IIdentitySource;

/// Watch-backed connectivity state
///
/// Whoever owns the platform network callbacks calls
/// [`set_available`](SharedConnectivity::set_available); the scheduler and
/// engine observe through the `IConnectivityProbe` port.
pub struct SharedConnectivity {
    tx: watch::Sender<bool>,
}

impl SharedConnectivity {
    /// Creates the state with an initial reachability value
    pub fn new(initially_available: bool) -> Self {
        let (tx, _rx) = watch::channel(initially_available);
        Self { tx }
    }

    /// Updates the reachability state, waking watchers on change
    pub fn set_available(&self, available: bool) {
        self.tx.send_replace(available);
    }
}

impl IConnectivityProbe for SharedConnectivity {
    fn is_available(&self) -> bool {
        *self.tx.borrow()
    }

    fn watch(&self) -> watch::Receiver<bool> {
        self.tx.subscribe()
    }
}

/// Identity source with a fixed answer
///
/// Real deployments adapt the auth provider; this covers wiring before
/// sign-in and tests.
pub struct StaticIdentity {
    user_id: Option<UserId>,
}

impl StaticIdentity {
    /// A permanently signed-in identity
    pub fn signed_in(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
        }
    }

    /// A permanently signed-out identity
    pub fn signed_out() -> Self {
        Self { user_id: None }
    }
}

impl IIdentitySource for StaticIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        self.user_id.clone()
    }
}
