//! Behavioural tests for searchlight-storage
//!
//! These tests cover capacity limits, deduplication, failure atomicity,
//! concurrent appends and persistence across restarts.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use searchlight_core::{AnalyticsAction, AnalyticsEvent, SearchQuery};
use searchlight_storage::{
    AnalyticsLog, EventLog, FileBackend, LogBackend, LogRecord, MemoryBackend, QueryLog,
    RetentionPolicy, StorageError,
};
use tempfile::TempDir;

fn query(term: &str) -> SearchQuery {
    SearchQuery::parse(term).unwrap()
}

/// Backend that can be told to reject writes
#[derive(Default)]
struct FlakyBackend {
    inner: MemoryBackend<SearchQuery>,
    failing: AtomicBool,
}

#[async_trait]
impl LogBackend<SearchQuery> for FlakyBackend {
    async fn load(&self) -> Result<Vec<LogRecord<SearchQuery>>, StorageError> {
        self.inner.load().await
    }

    async fn persist(&self, entries: &[LogRecord<SearchQuery>]) -> Result<(), StorageError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StorageError::unavailable("disk full"));
        }
        self.inner.persist(entries).await
    }

    fn kind(&self) -> &'static str {
        "flaky"
    }
}

// ============================================================================
// Capacity
// ============================================================================

#[tokio::test]
async fn test_default_capacity_drops_first_entry() {
    let log = QueryLog::in_memory(1000).await;

    for i in 0..1001 {
        log.record(query(&format!("term {i}"))).await.unwrap();
    }

    let terms = log.recorded_terms().await;
    assert_eq!(terms.len(), 1000);
    assert!(!terms.contains(&"term 0".to_string()));
    assert_eq!(terms.first().map(String::as_str), Some("term 1"));
    assert_eq!(terms.last().map(String::as_str), Some("term 1000"));
}

#[tokio::test]
async fn test_overflow_keeps_newest_in_order() {
    let log = AnalyticsLog::in_memory(5).await;

    for post in 0..12 {
        log.record(AnalyticsEvent::new(post, "p", "u", AnalyticsAction::View))
            .await
            .unwrap();
    }

    let ids: Vec<u64> = log.events().await.iter().map(|r| r.payload.post_id).collect();
    assert_eq!(ids, vec![7, 8, 9, 10, 11]);
}

// ============================================================================
// Deduplication
// ============================================================================

#[tokio::test]
async fn test_repeat_keeps_original_position() {
    let log = QueryLog::in_memory(1000).await;
    log.record(query("Music")).await.unwrap();
    log.record(query("travel")).await.unwrap();
    log.record(query("music")).await.unwrap();

    assert_eq!(
        log.recorded_terms().await,
        vec!["music".to_string(), "travel".to_string()]
    );
}

#[tokio::test]
async fn test_analytics_keeps_repeats() {
    let log = AnalyticsLog::in_memory(1000).await;
    let event = AnalyticsEvent::new(42, "hello-world", "u1", AnalyticsAction::View);

    log.record(event.clone()).await.unwrap();
    log.record(event).await.unwrap();

    let summary = log.summary().await;
    assert_eq!(summary.total_views, 2);
    assert_eq!(summary.unique_posts, 1);
}

// ============================================================================
// Failure atomicity
// ============================================================================

#[tokio::test]
async fn test_failed_persist_leaves_log_unchanged() {
    let backend = Arc::new(FlakyBackend::default());
    let log = EventLog::open("q", RetentionPolicy::new(2), backend.clone()).await;

    log.append(query("a")).await.unwrap();
    log.append(query("b")).await.unwrap();

    backend.failing.store(true, Ordering::SeqCst);
    let result = log.append(query("c")).await;
    assert!(matches!(result, Err(StorageError::Unavailable(_))));

    let terms: Vec<_> = log.list().await.into_iter().map(|r| r.payload.into_string()).collect();
    assert_eq!(terms, vec!["a", "b"]);

    // The log recovers once the backend does
    backend.failing.store(false, Ordering::SeqCst);
    log.append(query("c")).await.unwrap();
    let terms: Vec<_> = log.list().await.into_iter().map(|r| r.payload.into_string()).collect();
    assert_eq!(terms, vec!["b", "c"]);
}

#[tokio::test]
async fn test_failed_persist_does_not_mark_term_seen() {
    let backend = Arc::new(FlakyBackend::default());
    let log = QueryLog::open(backend.clone(), 10).await;

    backend.failing.store(true, Ordering::SeqCst);
    assert!(log.record(query("news")).await.is_err());

    backend.failing.store(false, Ordering::SeqCst);
    assert!(log.record(query("news")).await.unwrap().is_stored());
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_appends_respect_capacity() {
    let log = Arc::new(AnalyticsLog::in_memory(100).await);

    let mut handles = Vec::new();
    for task in 0..8u64 {
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            for i in 0..50u64 {
                log.record(AnalyticsEvent::new(
                    task * 1000 + i,
                    "p",
                    "u",
                    AnalyticsAction::View,
                ))
                .await
                .unwrap();
            }
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(log.summary().await.total_views, 100);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicates_stored_once() {
    let log = Arc::new(QueryLog::in_memory(1000).await);

    let mut handles = Vec::new();
    for _ in 0..16 {
        let log = log.clone();
        handles.push(tokio::spawn(async move {
            log.record(query("cooking")).await.unwrap();
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(log.recorded_terms().await, vec!["cooking".to_string()]);
}

// ============================================================================
// Persistence
// ============================================================================

#[tokio::test]
async fn test_file_backed_logs_survive_restart() {
    let temp = TempDir::new().unwrap();

    {
        let backend: Arc<FileBackend<SearchQuery>> =
            Arc::new(FileBackend::new(temp.path(), QueryLog::NAME));
        let log = QueryLog::open(backend, 1000).await;
        log.record(query("gaming")).await.unwrap();
        log.record(query("fitness")).await.unwrap();
    }

    let backend: Arc<FileBackend<SearchQuery>> =
        Arc::new(FileBackend::new(temp.path(), QueryLog::NAME));
    let log = QueryLog::open(backend, 1000).await;
    assert_eq!(
        log.recorded_terms().await,
        vec!["gaming".to_string(), "fitness".to_string()]
    );
    assert_eq!(log.log().backend_kind(), "file");
}

#[tokio::test]
async fn test_reopen_with_smaller_capacity_trims() {
    let temp = TempDir::new().unwrap();

    {
        let backend: Arc<FileBackend<AnalyticsEvent>> =
            Arc::new(FileBackend::new(temp.path(), AnalyticsLog::NAME));
        let log = AnalyticsLog::open(backend, 10).await;
        for post in 0..10 {
            log.record(AnalyticsEvent::new(post, "p", "u", AnalyticsAction::View))
                .await
                .unwrap();
        }
    }

    let backend: Arc<FileBackend<AnalyticsEvent>> =
        Arc::new(FileBackend::new(temp.path(), AnalyticsLog::NAME));
    let log = AnalyticsLog::open(backend, 3).await;
    let ids: Vec<u64> = log.events().await.iter().map(|r| r.payload.post_id).collect();
    assert_eq!(ids, vec![7, 8, 9]);
}

#[tokio::test]
async fn test_corrupt_snapshot_starts_empty() {
    let temp = TempDir::new().unwrap();
    std::fs::write(temp.path().join("search-queries.json"), b"garbage").unwrap();

    let backend: Arc<FileBackend<SearchQuery>> =
        Arc::new(FileBackend::new(temp.path(), QueryLog::NAME));
    let log = QueryLog::open(backend, 1000).await;

    assert!(log.is_empty().await);
    log.record(query("news")).await.unwrap();
    assert_eq!(log.recorded_terms().await, vec!["news".to_string()]);
}
