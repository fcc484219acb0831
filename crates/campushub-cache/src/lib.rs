//! CampusHub Cache - Local state persistence
//!
//! SQLite-based cache for synchronized records: one logical table per
//! entity collection, with the sync-metadata columns (`last_modified`,
//! `last_synced`, `is_dirty`, `tombstone`, `version`) on every row.
//!
//! ## Architecture
//!
//! This crate implements the `ICacheStore` port from `campushub-core`
//! using SQLite as the storage backend. It is a driven (secondary) adapter
//! in the hexagonal architecture.
//!
//! ## Key Components
//!
//! - [`DatabasePool`] - Connection pool with migration support
//! - [`SqliteCacheStore`] - Full `ICacheStore` implementation
//! - [`ChangeFeed`] - Per-collection reactive update notifications
//! - [`CacheError`] - Error types for cache operations
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//! use campushub_cache::{DatabasePool, SqliteCacheStore};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let pool = DatabasePool::new(Path::new("/home/user/.local/share/campushub/cache.db")).await?;
//! let store = SqliteCacheStore::new(pool.pool().clone());
//! // Use store as ICacheStore; subscribe to store.feed() for UI updates...
//! # Ok(())
//! # }
//! ```

pub mod feed;
pub mod pool;
pub mod store;

pub use feed::ChangeFeed;
pub use pool::DatabasePool;
pub use store::SqliteCacheStore;

/// Errors that can occur during cache operations
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    /// Failed to establish a database connection
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// A database query failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Schema migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Serialization or deserialization of domain types failed
    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<sqlx::Error> for CacheError {
    fn from(e: sqlx::Error) -> Self {
        CacheError::QueryFailed(e.to_string())
    }
}
