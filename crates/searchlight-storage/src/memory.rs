//! In-memory storage backend
//!
//! This module provides a volatile backend, suitable for tests and for
//! deployments without a persistent volume.

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::trace;

use crate::LogBackend;
use crate::error::StorageError;
use crate::record::{LogPayload, LogRecord};

/// Volatile implementation of LogBackend
///
/// Keeps the last persisted snapshot in memory. A log re-opened over the
/// same backend sees that snapshot; a process restart loses it.
#[derive(Debug)]
pub struct MemoryBackend<T> {
    snapshot: RwLock<Vec<LogRecord<T>>>,
}

impl<T> Default for MemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> MemoryBackend<T> {
    /// Create an empty in-memory backend
    pub fn new() -> Self {
        Self {
            snapshot: RwLock::new(Vec::new()),
        }
    }

    /// Create a backend pre-populated with records
    pub fn with_records(records: Vec<LogRecord<T>>) -> Self {
        Self {
            snapshot: RwLock::new(records),
        }
    }
}

#[async_trait]
impl<T: LogPayload> LogBackend<T> for MemoryBackend<T> {
    async fn load(&self) -> Result<Vec<LogRecord<T>>, StorageError> {
        Ok(self.snapshot.read().await.clone())
    }

    async fn persist(&self, entries: &[LogRecord<T>]) -> Result<(), StorageError> {
        trace!(entries = entries.len(), "Replacing in-memory snapshot");
        *self.snapshot.write().await = entries.to_vec();
        Ok(())
    }

    fn kind(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlight_core::SearchQuery;

    fn record(term: &str) -> LogRecord<SearchQuery> {
        LogRecord::new(SearchQuery::parse(term).unwrap())
    }

    #[tokio::test]
    async fn test_starts_empty() {
        let backend: MemoryBackend<SearchQuery> = MemoryBackend::new();
        assert!(backend.load().await.unwrap().is_empty());
        assert_eq!(LogBackend::<SearchQuery>::kind(&backend), "memory");
    }

    #[tokio::test]
    async fn test_persist_replaces_snapshot() {
        let backend = MemoryBackend::with_records(vec![record("old")]);

        backend
            .persist(&[record("news"), record("sports")])
            .await
            .unwrap();

        let loaded = backend.load().await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].payload.as_str(), "news");
    }
}
