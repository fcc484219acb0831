//! Telemetry sink port (driven/secondary port)
//!
//! The core emits structured sync lifecycle events but does not depend on
//! their delivery; a sink that drops everything is a valid implementation
//! and the default when none is wired.

use serde::Serialize;

/// Structured sync lifecycle events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum SyncEvent {
    /// A sync pass started for a collection
    SyncStarted {
        /// Collection being synchronized
        collection: String,
    },
    /// A sync pass completed successfully
    SyncSucceeded {
        /// Collection that was synchronized
        collection: String,
        /// Records pulled from the remote
        pulled: u32,
        /// Records pushed to the remote
        pushed: u32,
        /// Wall-clock duration of the pass
        duration_ms: u64,
    },
    /// The scheduler is retrying a retryable failure with backoff
    SyncRetried {
        /// Collection being retried
        collection: String,
        /// 1-based retry attempt
        attempt: u32,
        /// Backoff delay before this attempt
        delay_secs: u64,
    },
    /// A sync pass failed
    SyncFailed {
        /// Collection that failed
        collection: String,
        /// Outcome code (`RETRYABLE_NETWORK`, `FATAL_AUTH`, ...)
        code: String,
    },
}

/// Port trait for the fire-and-forget telemetry sink
pub trait ITelemetrySink: Send + Sync {
    /// Records one event; implementations must not block
    fn record(&self, event: &SyncEvent);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization() {
        let event = SyncEvent::SyncFailed {
            collection: "notes".to_string(),
            code: "RETRYABLE_NETWORK".to_string(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "sync_failed");
        assert_eq!(json["collection"], "notes");
        assert_eq!(json["code"], "RETRYABLE_NETWORK");
    }
}
