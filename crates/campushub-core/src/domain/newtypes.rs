//! Domain newtypes with validation
//!
//! Strongly-typed wrappers for identifiers shared between the local cache
//! and the remote document store. Each newtype validates at construction
//! time, so a value that exists is a value that is well-formed.

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::errors::DomainError;

// ============================================================================
// Record identifier
// ============================================================================

/// Identifier of a synchronized record, stable across local and remote
/// representations.
///
/// Remote document stores assign opaque string ids; locally created records
/// get a UUID from [`RecordId::generate`]. Both forms round-trip unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecordId(String);

impl RecordId {
    /// Create a RecordId from an existing identifier string
    ///
    /// # Errors
    /// Returns an error if the id is empty or contains characters outside
    /// alphanumerics, `-` and `_`.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidRecordId(
                "Record id cannot be empty".to_string(),
            ));
        }

        if !id
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(DomainError::InvalidRecordId(format!(
                "Record id contains invalid characters: {id}"
            )));
        }

        Ok(Self(id))
    }

    /// Generate a fresh id for a locally created record
    #[must_use]
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for RecordId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

// ============================================================================
// User identifier
// ============================================================================

/// Identifier of an authenticated user, as issued by the identity source.
///
/// Opaque to the sync core; only non-emptiness is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserId(String);

impl UserId {
    /// Create a new UserId
    ///
    /// # Errors
    /// Returns an error if the id is empty.
    pub fn new(id: String) -> Result<Self, DomainError> {
        if id.is_empty() {
            return Err(DomainError::InvalidUserId(
                "User id cannot be empty".to_string(),
            ));
        }

        Ok(Self(id))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for UserId {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<UserId> for String {
    fn from(id: UserId) -> Self {
        id.0
    }
}

// ============================================================================
// Collection name
// ============================================================================

/// Name of a synchronized entity collection (e.g. `notes`, `events`,
/// `mentorship`, `placements`).
///
/// Collection names double as table namespaces in the local cache and
/// document-collection names on the remote, so the accepted alphabet is
/// deliberately narrow: lowercase alphanumerics and underscores.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Collection(String);

impl Collection {
    /// Create a new Collection name
    ///
    /// # Errors
    /// Returns an error if the name is empty or contains characters outside
    /// `[a-z0-9_]`.
    pub fn new(name: String) -> Result<Self, DomainError> {
        if name.is_empty() {
            return Err(DomainError::InvalidCollection(
                "Collection name cannot be empty".to_string(),
            ));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(DomainError::InvalidCollection(format!(
                "Collection name must be lowercase alphanumeric/underscore: {name}"
            )));
        }

        Ok(Self(name))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Collection {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Collection {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for Collection {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<Collection> for String {
    fn from(collection: Collection) -> Self {
        collection.0
    }
}

// ============================================================================
// Page cursor
// ============================================================================

/// Opaque pointer to a position within an ordered remote collection.
///
/// Issued by the remote source at the end of a page and passed back
/// unmodified on the next query. The contents are not interpreted; only
/// non-emptiness is validated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PageCursor(String);

impl PageCursor {
    /// Create a new PageCursor
    ///
    /// # Errors
    /// Returns an error if the cursor is empty.
    pub fn new(cursor: String) -> Result<Self, DomainError> {
        if cursor.is_empty() {
            return Err(DomainError::InvalidCursor(
                "Page cursor cannot be empty".to_string(),
            ));
        }

        Ok(Self(cursor))
    }

    /// Get the inner string reference
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PageCursor {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PageCursor {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.to_string())
    }
}

impl TryFrom<String> for PageCursor {
    type Error = DomainError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::new(s)
    }
}

impl From<PageCursor> for String {
    fn from(cursor: PageCursor) -> Self {
        cursor.0
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    mod record_id_tests {
        use super::*;

        #[test]
        fn test_valid_id() {
            let id = RecordId::new("note_42-abc".to_string()).unwrap();
            assert_eq!(id.as_str(), "note_42-abc");
        }

        #[test]
        fn test_generate_creates_unique_ids() {
            let id1 = RecordId::generate();
            let id2 = RecordId::generate();
            assert_ne!(id1, id2);
        }

        #[test]
        fn test_generated_id_is_valid() {
            let id = RecordId::generate();
            assert!(RecordId::new(id.as_str().to_string()).is_ok());
        }

        #[test]
        fn test_empty_fails() {
            assert!(RecordId::new(String::new()).is_err());
        }

        #[test]
        fn test_invalid_chars_fail() {
            assert!(RecordId::new("has space".to_string()).is_err());
            assert!(RecordId::new("slash/id".to_string()).is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let id = RecordId::new("abc123".to_string()).unwrap();
            let json = serde_json::to_string(&id).unwrap();
            let parsed: RecordId = serde_json::from_str(&json).unwrap();
            assert_eq!(id, parsed);
        }

        #[test]
        fn test_serde_rejects_invalid() {
            let result: Result<RecordId, _> = serde_json::from_str("\"bad id\"");
            assert!(result.is_err());
        }
    }

    mod user_id_tests {
        use super::*;

        #[test]
        fn test_valid_id() {
            let id = UserId::new("auth0|user-123".to_string()).unwrap();
            assert_eq!(id.as_str(), "auth0|user-123");
        }

        #[test]
        fn test_empty_fails() {
            assert!(UserId::new(String::new()).is_err());
        }

        #[test]
        fn test_from_str() {
            let id: UserId = "firebase-uid-9".parse().unwrap();
            assert_eq!(id.to_string(), "firebase-uid-9");
        }
    }

    mod collection_tests {
        use super::*;

        #[test]
        fn test_valid_names() {
            for name in ["notes", "events", "mentorship", "placements", "notes_v2"] {
                assert!(Collection::new(name.to_string()).is_ok(), "{name}");
            }
        }

        #[test]
        fn test_empty_fails() {
            assert!(Collection::new(String::new()).is_err());
        }

        #[test]
        fn test_uppercase_fails() {
            assert!(Collection::new("Notes".to_string()).is_err());
        }

        #[test]
        fn test_special_chars_fail() {
            assert!(Collection::new("notes/shared".to_string()).is_err());
            assert!(Collection::new("notes-v2".to_string()).is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let collection = Collection::new("events".to_string()).unwrap();
            let json = serde_json::to_string(&collection).unwrap();
            let parsed: Collection = serde_json::from_str(&json).unwrap();
            assert_eq!(collection, parsed);
        }
    }

    mod page_cursor_tests {
        use super::*;

        #[test]
        fn test_valid_cursor() {
            let cursor = PageCursor::new("eyJsYXN0IjoibjQyIn0=".to_string()).unwrap();
            assert_eq!(cursor.as_str(), "eyJsYXN0IjoibjQyIn0=");
        }

        #[test]
        fn test_empty_fails() {
            assert!(PageCursor::new(String::new()).is_err());
        }

        #[test]
        fn test_serde_roundtrip() {
            let cursor = PageCursor::new("cursor-7".to_string()).unwrap();
            let json = serde_json::to_string(&cursor).unwrap();
            let parsed: PageCursor = serde_json::from_str(&json).unwrap();
            assert_eq!(cursor, parsed);
        }
    }
}
