//! SQLite implementation of ICacheStore
//!
//! Concrete SQLite-based implementation of the cache store port defined in
//! campushub-core. Handles domain type serialization/deserialization and
//! SQL query construction, and bumps the [`ChangeFeed`] on every write so
//! UI subscribers re-render from fresh local state.
//!
//! ## Type Mapping
//!
//! | Domain Type        | SQL Type | Strategy                                  |
//! |--------------------|----------|-------------------------------------------|
//! | RecordId, UserId   | TEXT     | string via `.as_str()` / validated parse  |
//! | Collection         | TEXT     | string via `.as_str()`                    |
//! | DateTime<Utc>      | TEXT     | RFC 3339 via `to_rfc3339()`               |
//! | counters map       | TEXT     | serde_json object                         |
//! | is_dirty/tombstone | INTEGER  | 0/1                                       |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use campushub_core::domain::newtypes::{Collection, RecordId};
use campushub_core::domain::record::SyncRecord;
use campushub_core::ports::cache_store::{CacheCounts, ICacheStore, RecordFilter};

use crate::{CacheError, ChangeFeed};

/// SQLite-based implementation of the cache store port
///
/// All operations go through a connection pool; writes are atomic per
/// record (`INSERT OR REPLACE`), which is the granularity the sync pass
/// relies on for crash safety.
pub struct SqliteCacheStore {
    pool: SqlitePool,
    feed: Arc<ChangeFeed>,
}

impl SqliteCacheStore {
    /// Creates a new store instance with the given connection pool
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            feed: Arc::new(ChangeFeed::new()),
        }
    }

    /// Creates a store sharing an externally owned change feed
    pub fn with_feed(pool: SqlitePool, feed: Arc<ChangeFeed>) -> Self {
        Self { pool, feed }
    }

    /// Returns the change feed UI consumers subscribe to
    pub fn feed(&self) -> Arc<ChangeFeed> {
        self.feed.clone()
    }
}

// ============================================================================
// Helper functions for type conversion
// ============================================================================

/// Parse a DateTime<Utc> from an RFC 3339 string
fn parse_datetime(s: &str) -> Result<DateTime<Utc>, CacheError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            CacheError::SerializationError(format!("Failed to parse datetime '{}': {}", s, e))
        })
}

/// Parse an optional DateTime<Utc> from an optional string
fn parse_optional_datetime(s: Option<String>) -> Result<Option<DateTime<Utc>>, CacheError> {
    match s {
        Some(ref val) if !val.is_empty() => parse_datetime(val).map(Some),
        _ => Ok(None),
    }
}

// ============================================================================
// Row mapping
// ============================================================================

/// Reconstruct a SyncRecord from a database row
///
/// Uses serde JSON deserialization to reconstruct the record since the
/// struct has private fields that can only be set through constructors or
/// deserialization.
fn record_from_row(row: &SqliteRow) -> Result<SyncRecord, CacheError> {
    let id: String = row.get("id");
    let title: String = row.get("title");
    let description: String = row.get("description");
    let owner_id: Option<String> = row.get("owner_id");
    let owner_name: Option<String> = row.get("owner_name");
    let attachment_url: Option<String> = row.get("attachment_url");
    let counters_str: String = row.get("counters");
    let created_at_str: String = row.get("created_at");
    let last_modified_str: String = row.get("last_modified");
    let last_synced_str: Option<String> = row.get("last_synced");
    let is_dirty: i64 = row.get("is_dirty");
    let tombstone: i64 = row.get("tombstone");
    let version: Option<i64> = row.get("version");

    let counters: serde_json::Value = serde_json::from_str(&counters_str)
        .map_err(|e| CacheError::SerializationError(format!("Invalid counters JSON: {}", e)))?;

    let created_at = parse_datetime(&created_at_str)?;
    let last_modified = parse_datetime(&last_modified_str)?;
    let last_synced = parse_optional_datetime(last_synced_str)?;

    let record_json = serde_json::json!({
        "id": id,
        "title": title,
        "description": description,
        "owner_id": owner_id,
        "owner_name": owner_name,
        "attachment_url": attachment_url,
        "counters": counters,
        "created_at": created_at.to_rfc3339(),
        "last_modified": last_modified.to_rfc3339(),
        "last_synced": last_synced.map(|dt| dt.to_rfc3339()),
        "is_dirty": is_dirty != 0,
        "tombstone": tombstone != 0,
        "version": version,
    });

    let record: SyncRecord = serde_json::from_value(record_json).map_err(|e| {
        CacheError::SerializationError(format!("Failed to reconstruct SyncRecord from row: {}", e))
    })?;

    Ok(record)
}

// ============================================================================
// ICacheStore implementation
// ============================================================================

#[async_trait::async_trait]
impl ICacheStore for SqliteCacheStore {
    async fn upsert(&self, collection: &Collection, record: &SyncRecord) -> anyhow::Result<()> {
        let counters = serde_json::to_string(record.counters())
            .map_err(|e| anyhow::anyhow!("Failed to serialize counters: {}", e))?;

        sqlx::query(
            "INSERT OR REPLACE INTO records \
             (collection, id, title, description, owner_id, owner_name, \
              attachment_url, counters, created_at, last_modified, last_synced, \
              is_dirty, tombstone, version) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(collection.as_str())
        .bind(record.id().as_str())
        .bind(record.title())
        .bind(record.description())
        .bind(record.owner_id().map(|u| u.as_str().to_string()))
        .bind(record.owner_name())
        .bind(record.attachment_url())
        .bind(&counters)
        .bind(record.created_at().to_rfc3339())
        .bind(record.last_modified().to_rfc3339())
        .bind(record.last_synced().map(|dt| dt.to_rfc3339()))
        .bind(record.is_dirty() as i64)
        .bind(record.is_tombstone() as i64)
        .bind(record.version())
        .execute(&self.pool)
        .await?;

        self.feed.notify(collection);

        tracing::trace!(collection = %collection, id = %record.id(), "Saved record");
        Ok(())
    }

    async fn get(
        &self,
        collection: &Collection,
        id: &RecordId,
    ) -> anyhow::Result<Option<SyncRecord>> {
        let row = sqlx::query("SELECT * FROM records WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(ref r) => Ok(Some(record_from_row(r)?)),
            None => Ok(None),
        }
    }

    async fn list(
        &self,
        collection: &Collection,
        filter: &RecordFilter,
    ) -> anyhow::Result<Vec<SyncRecord>> {
        let mut sql = String::from("SELECT * FROM records WHERE collection = ?");
        let mut binds: Vec<String> = vec![collection.as_str().to_string()];

        if let Some(ref owner_id) = filter.owner_id {
            sql.push_str(" AND owner_id = ?");
            binds.push(owner_id.as_str().to_string());
        }

        if let Some(dirty) = filter.dirty {
            sql.push_str(if dirty { " AND is_dirty = 1" } else { " AND is_dirty = 0" });
        }

        if !filter.include_tombstones {
            sql.push_str(" AND tombstone = 0");
        }

        if let Some(ref modified_since) = filter.modified_since {
            sql.push_str(" AND last_modified > ?");
            binds.push(modified_since.to_rfc3339());
        }

        sql.push_str(" ORDER BY last_modified DESC");

        let mut query = sqlx::query(&sql);
        for bind in &binds {
            query = query.bind(bind);
        }

        let rows = query.fetch_all(&self.pool).await?;

        let mut records = Vec::with_capacity(rows.len());
        for row in &rows {
            records.push(record_from_row(row)?);
        }

        Ok(records)
    }

    async fn dirty_records(&self, collection: &Collection) -> anyhow::Result<Vec<SyncRecord>> {
        let filter = RecordFilter::new().with_dirty(true).with_tombstones();
        self.list(collection, &filter).await
    }

    async fn remove(&self, collection: &Collection, id: &RecordId) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM records WHERE collection = ? AND id = ?")
            .bind(collection.as_str())
            .bind(id.as_str())
            .execute(&self.pool)
            .await?;

        self.feed.notify(collection);

        tracing::trace!(collection = %collection, id = %id, "Removed record");
        Ok(())
    }

    async fn counts(&self, collection: &Collection) -> anyhow::Result<CacheCounts> {
        let row = sqlx::query(
            "SELECT COUNT(*) AS total, \
                    COALESCE(SUM(is_dirty), 0) AS dirty, \
                    COALESCE(SUM(tombstone), 0) AS tombstones \
             FROM records WHERE collection = ?",
        )
        .bind(collection.as_str())
        .fetch_one(&self.pool)
        .await?;

        let total: i64 = row.get("total");
        let dirty: i64 = row.get("dirty");
        let tombstones: i64 = row.get("tombstones");

        Ok(CacheCounts {
            total: total as u64,
            dirty: dirty as u64,
            tombstones: tombstones as u64,
        })
    }
}
