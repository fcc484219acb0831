//! Stateless forward pagination over the remote collection
//!
//! List views page through remote collections under a fixed ordering; the
//! [`PageLoader`] wraps `IRemoteSource::query` with page-size clamping and
//! optional client-side search filtering.
//!
//! The cursor is opaque: it comes back from the remote with each full page
//! and must be passed into the next request unmodified. There is no
//! backward pagination.
//!
//! Known limitation, kept deliberately: when a client-side search filter
//! drops items from a full server page, the page is under-filled and the
//! loader reports end-of-collection even though more matching items may
//! exist server-side. Fixing this properly needs server-side search.

use std::sync::Arc;

use thiserror::Error;
use tracing::debug;

use campushub_core::config::PagingConfig;
use campushub_core::domain::newtypes::{Collection, PageCursor};
use campushub_core::domain::record::RemoteRecord;
use campushub_core::ports::remote_source::{IRemoteSource, RemoteError, RemoteOrder};

// ============================================================================
// Errors and DTOs
// ============================================================================

/// Errors surfaced by page loads
///
/// A failed query is an explicit error, never an empty page: the UI must
/// be able to distinguish "no results" from "could not ask".
#[derive(Debug, Error)]
pub enum PagingError {
    /// The remote query failed
    #[error("remote query failed: {0}")]
    QueryFailed(#[from] RemoteError),

    /// The requested page size was zero
    #[error("page size must be greater than 0")]
    InvalidPageSize,
}

/// One page request
#[derive(Debug, Clone)]
pub struct PageRequest {
    /// Collection to page through
    pub collection: Collection,
    /// Fixed ordering; cursors are only valid within one ordering
    pub order: RemoteOrder,
    /// Requested page size; `None` uses the configured default
    pub page_size: Option<u32>,
    /// Cursor from the previous page, passed back unmodified
    pub after: Option<PageCursor>,
    /// Case-insensitive substring filter over title and description,
    /// applied client-side after the fetch
    pub search: Option<String>,
}

impl PageRequest {
    /// Creates a first-page request with defaults
    pub fn first(collection: Collection, order: RemoteOrder) -> Self {
        Self {
            collection,
            order,
            page_size: None,
            after: None,
            search: None,
        }
    }

    /// Sets the page size
    pub fn with_page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size);
        self
    }

    /// Continues from a cursor
    pub fn with_cursor(mut self, after: PageCursor) -> Self {
        self.after = Some(after);
        self
    }

    /// Applies a client-side search filter
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        self.search = Some(needle.into());
        self
    }
}

/// One loaded page
#[derive(Debug, Clone)]
pub struct RecordPage {
    /// Items of this page, post-filtering, in query order
    pub items: Vec<RemoteRecord>,
    /// Cursor for the next page; `None` means pagination is over
    pub next: Option<PageCursor>,
}

// ============================================================================
// PageLoader
// ============================================================================

/// Stateless loader for forward cursor pagination
pub struct PageLoader {
    remote: Arc<dyn IRemoteSource>,
    default_page_size: u32,
    max_page_size: u32,
}

impl PageLoader {
    /// Creates a loader over the given remote source
    pub fn new(remote: Arc<dyn IRemoteSource>, config: &PagingConfig) -> Self {
        Self {
            remote,
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
        }
    }

    /// Loads one page
    ///
    /// Pagination terminates (`next = None`) when the post-filter page
    /// holds fewer items than the effective page size — either the remote
    /// is exhausted or the search filter under-filled the page (see the
    /// module-level limitation note).
    pub async fn load(&self, request: &PageRequest) -> Result<RecordPage, PagingError> {
        let requested = request.page_size.unwrap_or(self.default_page_size);
        if requested == 0 {
            return Err(PagingError::InvalidPageSize);
        }
        let size = requested.min(self.max_page_size);

        let page = self
            .remote
            .query(
                &request.collection,
                request.order,
                size,
                request.after.as_ref(),
            )
            .await?;

        let fetched = page.items.len();
        let items: Vec<RemoteRecord> = match &request.search {
            None => page.items,
            Some(needle) => {
                let needle = needle.to_lowercase();
                page.items
                    .into_iter()
                    .filter(|record| {
                        record.title.to_lowercase().contains(&needle)
                            || record.description.to_lowercase().contains(&needle)
                    })
                    .collect()
            }
        };

        let next = if (items.len() as u32) < size {
            None
        } else {
            page.next_cursor
        };

        debug!(
            collection = %request.collection,
            fetched,
            kept = items.len(),
            has_next = next.is_some(),
            "Loaded page"
        );

        Ok(RecordPage { items, next })
    }
}

// ============================================================================
// Unit tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;
    use campushub_core::config::ConfigBuilder;
    use campushub_core::ports::remote_source::RemoteError;

    use crate::testutil::{notes, remote_record, MockRemote};

    fn loader(remote: Arc<MockRemote>) -> PageLoader {
        let config = ConfigBuilder::new()
            .paging_default_page_size(3)
            .paging_max_page_size(10)
            .build();
        PageLoader::new(remote, &config.paging)
    }

    fn seeded_remote(count: usize) -> Arc<MockRemote> {
        let remote = Arc::new(MockRemote::new());
        // Newest-first by modification time: m10, m9, ...
        remote.seed(
            (0..count)
                .map(|i| {
                    remote_record(
                        &format!("n{i}"),
                        &format!("note {i}"),
                        1000 + (count - i) as i64,
                    )
                })
                .collect(),
        );
        remote
    }

    #[tokio::test]
    async fn test_full_page_returns_next_cursor() {
        let remote = seeded_remote(7);
        let loader = loader(remote);

        let page = loader
            .load(&PageRequest::first(notes(), RemoteOrder::ModifiedDesc))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 3);
        assert!(page.next.is_some());
        assert_eq!(page.items[0].id.as_str(), "n0");
    }

    #[tokio::test]
    async fn test_cursor_walks_forward_to_the_end() {
        let remote = seeded_remote(7);
        let loader = loader(remote);

        let mut seen = Vec::new();
        let mut cursor: Option<PageCursor> = None;
        loop {
            let mut request = PageRequest::first(notes(), RemoteOrder::ModifiedDesc);
            if let Some(c) = cursor.take() {
                request = request.with_cursor(c);
            }
            let page = loader.load(&request).await.unwrap();
            seen.extend(page.items.iter().map(|r| r.id.to_string()));
            match page.next {
                Some(next) => cursor = Some(next),
                None => break,
            }
        }

        // 7 items over pages of 3: 3 + 3 + 1, no duplicates, in order.
        assert_eq!(seen, vec!["n0", "n1", "n2", "n3", "n4", "n5", "n6"]);
    }

    #[tokio::test]
    async fn test_short_page_ends_pagination() {
        let remote = seeded_remote(2);
        let loader = loader(remote);

        let page = loader
            .load(&PageRequest::first(notes(), RemoteOrder::ModifiedDesc))
            .await
            .unwrap();

        assert_eq!(page.items.len(), 2);
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_empty_collection_yields_empty_page() {
        let remote = Arc::new(MockRemote::new());
        let loader = loader(remote);

        let page = loader
            .load(&PageRequest::first(notes(), RemoteOrder::ModifiedDesc))
            .await
            .unwrap();

        assert!(page.items.is_empty());
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_search_filters_within_page() {
        let remote = Arc::new(MockRemote::new());
        remote.seed(vec![
            remote_record("a", "Operating Systems", 3000),
            remote_record("b", "Databases", 2000),
            remote_record("c", "operating manual", 1000),
        ]);
        let loader = loader(remote);

        let page = loader
            .load(
                &PageRequest::first(notes(), RemoteOrder::ModifiedDesc)
                    .with_page_size(3)
                    .with_search("operating"),
            )
            .await
            .unwrap();

        let ids: Vec<&str> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[tokio::test]
    async fn test_search_underfill_ends_pagination_early() {
        // Known limitation: the filter drops the page below the page size,
        // so pagination terminates even though later pages could match.
        let remote = Arc::new(MockRemote::new());
        remote.seed(vec![
            remote_record("a", "match one", 5000),
            remote_record("b", "other", 4000),
            remote_record("c", "other", 3000),
            remote_record("d", "match two", 2000),
        ]);
        let loader = loader(remote);

        let page = loader
            .load(
                &PageRequest::first(notes(), RemoteOrder::ModifiedDesc)
                    .with_page_size(3)
                    .with_search("match"),
            )
            .await
            .unwrap();

        assert_eq!(page.items.len(), 1);
        assert!(page.next.is_none());
    }

    #[tokio::test]
    async fn test_query_failure_is_an_error_not_an_empty_page() {
        let remote = Arc::new(MockRemote::new());
        remote.fail_query_with(RemoteError::Server {
            status: 500,
            message: "boom".to_string(),
        });
        let loader = loader(remote);

        let result = loader
            .load(&PageRequest::first(notes(), RemoteOrder::ModifiedDesc))
            .await;

        assert!(matches!(result, Err(PagingError::QueryFailed(_))));
    }

    #[tokio::test]
    async fn test_page_size_clamped_to_max() {
        let remote = seeded_remote(5);
        let loader = loader(remote.clone());

        loader
            .load(
                &PageRequest::first(notes(), RemoteOrder::ModifiedDesc).with_page_size(1000),
            )
            .await
            .unwrap();

        assert_eq!(*remote.query_limits.lock().unwrap(), vec![10]);
        assert_eq!(remote.query_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_zero_page_size_rejected() {
        let remote = seeded_remote(5);
        let loader = loader(remote);

        let result = loader
            .load(&PageRequest::first(notes(), RemoteOrder::ModifiedDesc).with_page_size(0))
            .await;

        assert!(matches!(result, Err(PagingError::InvalidPageSize)));
    }

    #[tokio::test]
    async fn test_title_ordering() {
        let remote = Arc::new(MockRemote::new());
        remote.seed(vec![
            remote_record("a", "zsh cheatsheet", 3000),
            remote_record("b", "algorithms", 2000),
        ]);
        let loader = loader(remote);

        let page = loader
            .load(&PageRequest::first(notes(), RemoteOrder::TitleAsc))
            .await
            .unwrap();

        assert_eq!(page.items[0].title, "algorithms");
    }
}
