//! Blog analytics log
//!
//! Every submitted event is kept, repeats included, up to the capacity

use std::sync::Arc;

use chrono::{DateTime, Utc};
use searchlight_core::AnalyticsEvent;
use serde::Serialize;
use tracing::instrument;

use crate::LogBackend;
use crate::error::StorageError;
use crate::event_log::{Ack, EventLog};
use crate::record::LogRecord;
use crate::retention::{Deduplication, RetentionPolicy};

/// How many events the summary lists
pub const RECENT_VIEWS: usize = 10;

/// An event as shown in the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentView {
    #[serde(flatten)]
    pub event: AnalyticsEvent,
    /// Server time of receipt
    pub received_at: DateTime<Utc>,
}

impl From<LogRecord<AnalyticsEvent>> for RecentView {
    fn from(record: LogRecord<AnalyticsEvent>) -> Self {
        Self {
            event: record.payload,
            received_at: record.received_at,
        }
    }
}

/// Aggregate view over the analytics log
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSummary {
    pub total_views: usize,
    pub unique_posts: usize,
    pub recent_views: Vec<RecentView>,
}

/// The non-deduplicating log of analytics events
#[derive(Debug)]
pub struct AnalyticsLog {
    inner: EventLog<AnalyticsEvent>,
}

impl AnalyticsLog {
    /// Log name, also used for the snapshot file
    pub const NAME: &'static str = "blog-analytics";

    /// Open over `backend`, keeping at most `capacity` events
    pub async fn open(backend: Arc<dyn LogBackend<AnalyticsEvent>>, capacity: usize) -> Self {
        let policy = RetentionPolicy::new(capacity).with_deduplication(Deduplication::KeepAll);
        Self {
            inner: EventLog::open(Self::NAME, policy, backend).await,
        }
    }

    /// Open over a fresh in-memory backend
    pub async fn in_memory(capacity: usize) -> Self {
        Self::open(Arc::new(crate::MemoryBackend::<AnalyticsEvent>::new()), capacity).await
    }

    /// Record one event
    #[instrument(skip(self, event), fields(post_id = event.post_id, action = %event.action))]
    pub async fn record(&self, event: AnalyticsEvent) -> Result<Ack, StorageError> {
        self.inner.append(event).await
    }

    /// Totals plus the newest events
    pub async fn summary(&self) -> AnalyticsSummary {
        let summary = self.inner.summarize(RECENT_VIEWS, |e| e.post_id).await;
        AnalyticsSummary {
            total_views: summary.total_count,
            unique_posts: summary.unique_key_count,
            recent_views: summary.most_recent.into_iter().map(RecentView::from).collect(),
        }
    }

    /// All retained events, oldest first
    pub async fn events(&self) -> Vec<LogRecord<AnalyticsEvent>> {
        self.inner.list().await
    }

    /// Underlying event log
    pub fn log(&self) -> &EventLog<AnalyticsEvent> {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use searchlight_core::AnalyticsAction;

    #[tokio::test]
    async fn test_empty_summary() {
        let log = AnalyticsLog::in_memory(1000).await;
        let summary = log.summary().await;

        assert_eq!(summary.total_views, 0);
        assert_eq!(summary.unique_posts, 0);
        assert!(summary.recent_views.is_empty());
    }

    #[tokio::test]
    async fn test_single_view() {
        let log = AnalyticsLog::in_memory(1000).await;
        log.record(AnalyticsEvent::new(42, "hello-world", "u1", AnalyticsAction::View))
            .await
            .unwrap();

        let summary = log.summary().await;
        assert_eq!(summary.total_views, 1);
        assert_eq!(summary.unique_posts, 1);
        assert_eq!(summary.recent_views[0].event.slug, "hello-world");
    }

    #[tokio::test]
    async fn test_recent_views_capped() {
        let log = AnalyticsLog::in_memory(1000).await;
        for post in 0..15 {
            log.record(AnalyticsEvent::new(post, "p", "u", AnalyticsAction::View))
                .await
                .unwrap();
        }

        let summary = log.summary().await;
        assert_eq!(summary.total_views, 15);
        assert_eq!(summary.unique_posts, 15);
        assert_eq!(summary.recent_views.len(), RECENT_VIEWS);
        assert_eq!(summary.recent_views[0].event.post_id, 5);
        assert_eq!(summary.recent_views[9].event.post_id, 14);
    }

    #[tokio::test]
    async fn test_summary_json_shape() {
        let log = AnalyticsLog::in_memory(1000).await;
        log.record(AnalyticsEvent::new(7, "s", "u", AnalyticsAction::Share))
            .await
            .unwrap();

        let json = serde_json::to_value(log.summary().await).unwrap();
        assert_eq!(json["totalViews"], 1);
        assert_eq!(json["uniquePosts"], 1);
        assert_eq!(json["recentViews"][0]["postId"], 7);
        assert_eq!(json["recentViews"][0]["action"], "share");
        assert!(json["recentViews"][0]["receivedAt"].is_string());
    }
}
