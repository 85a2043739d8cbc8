//! Search query log
//!
//! Remembers distinct search terms, most recent last. Repeats are
//! acknowledged but not stored, so a term keeps the position of its first
//! occurrence until it is evicted.

use std::sync::Arc;

use async_trait::async_trait;
use searchlight_core::{FALLBACK_CATALOG, SearchQuery};
use tracing::{debug, instrument};

use crate::LogBackend;
use crate::error::StorageError;
use crate::event_log::{Ack, EventLog};
use crate::retention::{Deduplication, RetentionPolicy};

/// Something that can list search terms for sitemap generation
#[async_trait]
pub trait TermSource: Send + Sync {
    /// Terms in the order they should appear, oldest first
    async fn search_terms(&self) -> Result<Vec<String>, StorageError>;
}

/// The deduplicating log of search terms
#[derive(Debug)]
pub struct QueryLog {
    inner: EventLog<SearchQuery>,
}

impl QueryLog {
    /// Log name, also used for the snapshot file
    pub const NAME: &'static str = "search-queries";

    /// Open over `backend`, keeping at most `capacity` terms
    pub async fn open(backend: Arc<dyn LogBackend<SearchQuery>>, capacity: usize) -> Self {
        let policy =
            RetentionPolicy::new(capacity).with_deduplication(Deduplication::DropRepeats);
        Self {
            inner: EventLog::open(Self::NAME, policy, backend).await,
        }
    }

    /// Open over a fresh in-memory backend
    pub async fn in_memory(capacity: usize) -> Self {
        Self::open(Arc::new(crate::MemoryBackend::<SearchQuery>::new()), capacity).await
    }

    /// Record a term; a repeat is a successful no-op
    #[instrument(skip(self), fields(term = %query))]
    pub async fn record(&self, query: SearchQuery) -> Result<Ack, StorageError> {
        let ack = self.inner.append(query).await?;
        debug!(stored = ack.is_stored(), "Search query recorded");
        Ok(ack)
    }

    /// Terms actually recorded, oldest first
    pub async fn recorded_terms(&self) -> Vec<String> {
        self.inner
            .list()
            .await
            .into_iter()
            .map(|r| r.payload.into_string())
            .collect()
    }

    /// Recorded terms, or the fallback catalog when nothing is recorded yet
    pub async fn terms(&self) -> Vec<String> {
        let recorded = self.recorded_terms().await;
        if recorded.is_empty() {
            FALLBACK_CATALOG.iter().map(|t| t.to_string()).collect()
        } else {
            recorded
        }
    }

    /// Number of recorded terms
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }

    /// Check if no term has been recorded
    pub async fn is_empty(&self) -> bool {
        self.inner.is_empty().await
    }

    /// Underlying event log
    pub fn log(&self) -> &EventLog<SearchQuery> {
        &self.inner
    }
}

#[async_trait]
impl TermSource for QueryLog {
    async fn search_terms(&self) -> Result<Vec<String>, StorageError> {
        Ok(self.terms().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(term: &str) -> SearchQuery {
        SearchQuery::parse(term).unwrap()
    }

    #[tokio::test]
    async fn test_empty_log_serves_catalog() {
        let log = QueryLog::in_memory(1000).await;

        assert!(log.is_empty().await);
        let terms = log.terms().await;
        assert_eq!(terms.len(), FALLBACK_CATALOG.len());
        assert_eq!(terms[0], "music");
        assert!(log.recorded_terms().await.is_empty());
    }

    #[tokio::test]
    async fn test_recorded_terms_replace_catalog() {
        let log = QueryLog::in_memory(1000).await;
        log.record(query("Rust")).await.unwrap();

        assert!(!log.is_empty().await);
        assert_eq!(log.terms().await, vec!["rust".to_string()]);
    }

    #[tokio::test]
    async fn test_case_insensitive_dedup() {
        let log = QueryLog::in_memory(1000).await;
        assert!(log.record(query("Music")).await.unwrap().is_stored());
        assert_eq!(log.record(query("  MUSIC ")).await.unwrap(), Ack::Duplicate);
        assert_eq!(log.len().await, 1);
    }

    #[tokio::test]
    async fn test_term_source_matches_terms() {
        let log = QueryLog::in_memory(1000).await;
        log.record(query("news")).await.unwrap();
        log.record(query("sports")).await.unwrap();

        let source: &dyn TermSource = &log;
        assert_eq!(
            source.search_terms().await.unwrap(),
            vec!["news".to_string(), "sports".to_string()]
        );
    }
}
