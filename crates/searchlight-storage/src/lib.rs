//! # Searchlight Storage
//!
//! Bounded, append-only logs for Searchlight's tracked activity
//!
//! This crate keeps two logs: the search terms visitors have entered and the
//! blog analytics events reported by the front end. Both are capped, both
//! evict oldest-first, and both write through to a pluggable backend.
//!
//! ## Features
//!
//! - **LogBackend trait**: Where a log's snapshot lives
//! - **MemoryBackend**: Volatile backend for tests and ephemeral deployments
//! - **FileBackend**: JSON snapshot on disk, replaced atomically on each write
//! - **EventLog**: The bounded log itself, generic over the payload
//! - **QueryLog / AnalyticsLog**: The two logs the service actually runs
//! - **RetentionPolicy**: Capacity and deduplication rules
//!
//! ## Example
//!
//! ```rust
//! use searchlight_core::SearchQuery;
//! use searchlight_storage::QueryLog;
//!
//! # tokio_test::block_on(async {
//! let log = QueryLog::in_memory(1000).await;
//!
//! log.record(SearchQuery::parse("Music").unwrap()).await.unwrap();
//! log.record(SearchQuery::parse("music").unwrap()).await.unwrap();
//!
//! assert_eq!(log.recorded_terms().await, vec!["music".to_string()]);
//! # });
//! ```

pub mod analytics_log;
pub mod error;
pub mod event_log;
pub mod memory;
pub mod persistent;
pub mod query_log;
pub mod record;
pub mod retention;

// Re-exports
pub use analytics_log::{AnalyticsLog, AnalyticsSummary, RECENT_VIEWS, RecentView};
pub use error::StorageError;
pub use event_log::{Ack, EventLog, Summary};
pub use memory::MemoryBackend;
pub use persistent::{FileBackend, SNAPSHOT_VERSION};
pub use query_log::{QueryLog, TermSource};
pub use record::{LogPayload, LogRecord};
pub use retention::{DEFAULT_CAPACITY, Deduplication, RetentionPolicy};

use async_trait::async_trait;

/// Where an [`EventLog`] keeps its snapshot
///
/// A backend stores the complete, already-trimmed contents of one log. The
/// log calls `load` once when it opens and `persist` after every change, so
/// implementations never see a partial update.
#[async_trait]
pub trait LogBackend<T: LogPayload>: Send + Sync {
    /// Read the last persisted snapshot, oldest entry first
    ///
    /// A backend with nothing stored yet returns an empty vector
    async fn load(&self) -> Result<Vec<LogRecord<T>>, StorageError>;

    /// Replace the stored snapshot with `entries`
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot could not be written. The previous
    /// snapshot must still be readable afterwards.
    async fn persist(&self, entries: &[LogRecord<T>]) -> Result<(), StorageError>;

    /// Short name for logs and health output
    fn kind(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlight_core::SearchQuery;

    #[test]
    fn test_log_backend_is_object_safe() {
        fn _assert(_: &dyn LogBackend<SearchQuery>) {}
    }
}
