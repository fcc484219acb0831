//! Shared test doubles for engine, scheduler, and paging tests

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use chrono::{DateTime, TimeZone, Utc};

use campushub_core::domain::newtypes::{Collection, PageCursor, RecordId, UserId};
use campushub_core::domain::record::RemoteRecord;
use campushub_core::ports::remote_source::{
    IRemoteSource, QueryPage, RemoteError, RemoteOrder, WriteAck,
};

pub(crate) fn ts(secs: i64) -> DateTime<Utc> {
    Utc.timestamp_opt(secs, 0).unwrap()
}

pub(crate) fn notes() -> Collection {
    Collection::new("notes".to_string()).unwrap()
}

pub(crate) fn remote_record(id: &str, title: &str, modified_secs: i64) -> RemoteRecord {
    RemoteRecord {
        id: RecordId::new(id.to_string()).unwrap(),
        title: title.to_string(),
        description: "remote body".to_string(),
        owner_id: None,
        owner_name: None,
        attachment_url: None,
        counters: BTreeMap::new(),
        created_at: Some(ts(modified_secs - 100)),
        modified_at: ts(modified_secs),
        version: Some(1),
    }
}

/// In-memory remote source with injectable failures and call counters
pub(crate) struct MockRemote {
    pub records: Mutex<Vec<RemoteRecord>>,
    pub fail_fetch: Mutex<Option<RemoteError>>,
    pub fail_query: Mutex<Option<RemoteError>>,
    pub fail_write_ids: Mutex<HashSet<String>>,
    pub write_error: Mutex<RemoteError>,
    pub fetch_calls: AtomicU32,
    pub write_calls: AtomicU32,
    pub query_calls: AtomicU32,
    pub query_limits: Mutex<Vec<u32>>,
    pub deleted_ids: Mutex<Vec<String>>,
}

impl MockRemote {
    pub fn new() -> Self {
        Self {
            records: Mutex::new(Vec::new()),
            fail_fetch: Mutex::new(None),
            fail_query: Mutex::new(None),
            fail_write_ids: Mutex::new(HashSet::new()),
            write_error: Mutex::new(RemoteError::Server {
                status: 503,
                message: "write rejected".to_string(),
            }),
            fetch_calls: AtomicU32::new(0),
            write_calls: AtomicU32::new(0),
            query_calls: AtomicU32::new(0),
            query_limits: Mutex::new(Vec::new()),
            deleted_ids: Mutex::new(Vec::new()),
        }
    }

    pub fn seed(&self, records: Vec<RemoteRecord>) {
        *self.records.lock().unwrap() = records;
    }

    pub fn fail_fetch_with(&self, error: RemoteError) {
        *self.fail_fetch.lock().unwrap() = Some(error);
    }

    pub fn fail_query_with(&self, error: RemoteError) {
        *self.fail_query.lock().unwrap() = Some(error);
    }

    pub fn fail_writes_for(&self, id: &str) {
        self.fail_write_ids.lock().unwrap().insert(id.to_string());
    }

    pub fn set_write_error(&self, error: RemoteError) {
        *self.write_error.lock().unwrap() = error;
    }
}

#[async_trait::async_trait]
impl IRemoteSource for MockRemote {
    async fn fetch_all(&self, _collection: &Collection) -> Result<Vec<RemoteRecord>, RemoteError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(err) = self.fail_fetch.lock().unwrap().clone() {
            return Err(err);
        }
        Ok(self.records.lock().unwrap().clone())
    }

    async fn write(
        &self,
        _collection: &Collection,
        record: &RemoteRecord,
        _author: &UserId,
    ) -> Result<WriteAck, RemoteError> {
        self.write_calls.fetch_add(1, Ordering::SeqCst);
        if self
            .fail_write_ids
            .lock()
            .unwrap()
            .contains(record.id.as_str())
        {
            return Err(self.write_error.lock().unwrap().clone());
        }

        let mut records = self.records.lock().unwrap();
        let version = record.version.map(|v| v + 1).or(Some(1));
        let mut stored = record.clone();
        stored.version = version;
        if let Some(existing) = records.iter_mut().find(|r| r.id == record.id) {
            *existing = stored;
        } else {
            records.push(stored);
        }

        Ok(WriteAck {
            id: record.id.clone(),
            modified_at: record.modified_at,
            version,
        })
    }

    async fn delete(&self, _collection: &Collection, id: &RecordId) -> Result<(), RemoteError> {
        self.deleted_ids.lock().unwrap().push(id.to_string());
        self.records.lock().unwrap().retain(|r| r.id != *id);
        Ok(())
    }

    async fn query(
        &self,
        _collection: &Collection,
        order: RemoteOrder,
        limit: u32,
        after: Option<&PageCursor>,
    ) -> Result<QueryPage, RemoteError> {
        self.query_calls.fetch_add(1, Ordering::SeqCst);
        self.query_limits.lock().unwrap().push(limit);
        if let Some(err) = self.fail_query.lock().unwrap().clone() {
            return Err(err);
        }

        let mut records = self.records.lock().unwrap().clone();
        match order {
            RemoteOrder::CreatedDesc => {
                records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            }
            RemoteOrder::ModifiedDesc => {
                records.sort_by(|a, b| b.modified_at.cmp(&a.modified_at));
            }
            RemoteOrder::TitleAsc => records.sort_by(|a, b| a.title.cmp(&b.title)),
        }

        // Index-based cursor, opaque to the caller.
        let start = after
            .map(|c| c.as_str().parse::<usize>().unwrap_or(0))
            .unwrap_or(0);
        let end = (start + limit as usize).min(records.len());
        let items = records[start.min(records.len())..end].to_vec();
        let next_cursor = if end < records.len() {
            Some(PageCursor::new(end.to_string()).unwrap())
        } else {
            None
        };

        Ok(QueryPage { items, next_cursor })
    }
}
