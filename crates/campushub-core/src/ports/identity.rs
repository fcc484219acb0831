//! Identity source port (driven/secondary port)
//!
//! The auth provider itself is out of scope; the sync core only needs a
//! stable user id to attribute pushed writes. A signed-out user is a
//! normal condition — the push phase is skipped, never an error.

use crate::domain::newtypes::UserId;

/// Port trait for the opaque identity source
pub trait IIdentitySource: Send + Sync {
    /// Returns the currently authenticated user, if any
    fn current_user_id(&self) -> Option<UserId>;
}
