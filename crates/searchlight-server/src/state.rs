//! Shared application state, built once at startup

use std::sync::Arc;

use searchlight_core::{AnalyticsEvent, SearchQuery};
use searchlight_storage::{
    AnalyticsLog, FileBackend, LogBackend, MemoryBackend, QueryLog, TermSource,
};
use searchlight_upstream::{
    BlogSource, UnifiedSearch, UpstreamError, VideoIndexClient, VideoSource, WordPressClient,
    build_http_client,
};
use tracing::info;

use crate::config::{ServerConfig, StorageMode};

/// Everything a handler can reach
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<ServerConfig>,
    pub queries: Arc<QueryLog>,
    pub analytics: Arc<AnalyticsLog>,
    /// Terms for sitemaps; the query log unless overridden
    pub terms: Arc<dyn TermSource>,
    pub blog: Arc<dyn BlogSource>,
    pub videos: Arc<dyn VideoSource>,
    pub search: UnifiedSearch,
}

impl AppState {
    /// Assemble state from already-built parts
    pub fn new(
        config: ServerConfig,
        queries: QueryLog,
        analytics: AnalyticsLog,
        blog: Arc<dyn BlogSource>,
        videos: Arc<dyn VideoSource>,
    ) -> Self {
        let queries = Arc::new(queries);
        Self {
            config: Arc::new(config),
            terms: queries.clone(),
            queries,
            analytics: Arc::new(analytics),
            search: UnifiedSearch::new(blog.clone(), videos.clone()),
            blog,
            videos,
        }
    }

    /// Replace the source sitemaps read their terms from
    pub fn with_term_source(mut self, terms: Arc<dyn TermSource>) -> Self {
        self.terms = terms;
        self
    }

    /// Open the logs and upstream clients described by `config`
    pub async fn from_config(config: ServerConfig) -> Result<Self, UpstreamError> {
        let (query_backend, analytics_backend) = backends(&config.storage);
        let queries = QueryLog::open(query_backend, config.capacity).await;
        let analytics = AnalyticsLog::open(analytics_backend, config.capacity).await;

        let http = build_http_client(config.upstream_timeout)?;
        let blog = Arc::new(WordPressClient::with_client(
            http.clone(),
            config.blog_api_url.clone(),
        ));
        let videos = Arc::new(VideoIndexClient::with_client(
            http,
            config.video_api_url.clone(),
        ));

        info!(
            storage = queries.log().backend_kind(),
            query_log = queries.log().name(),
            analytics_log = analytics.log().name(),
            capacity = queries.log().policy().capacity(),
            blog_api = %config.blog_api_url,
            video_api = %config.video_api_url,
            "Application state ready"
        );

        Ok(Self::new(config, queries, analytics, blog, videos))
    }
}

type Backends = (
    Arc<dyn LogBackend<SearchQuery>>,
    Arc<dyn LogBackend<AnalyticsEvent>>,
);

fn backends(mode: &StorageMode) -> Backends {
    match mode {
        StorageMode::Memory => {
            let queries: Arc<dyn LogBackend<SearchQuery>> =
                Arc::new(MemoryBackend::<SearchQuery>::new());
            let analytics: Arc<dyn LogBackend<AnalyticsEvent>> =
                Arc::new(MemoryBackend::<AnalyticsEvent>::new());
            (queries, analytics)
        }
        StorageMode::File { data_dir } => {
            let queries: Arc<dyn LogBackend<SearchQuery>> =
                Arc::new(FileBackend::<SearchQuery>::new(data_dir, QueryLog::NAME));
            let analytics: Arc<dyn LogBackend<AnalyticsEvent>> =
                Arc::new(FileBackend::<AnalyticsEvent>::new(data_dir, AnalyticsLog::NAME));
            (queries, analytics)
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .field("queries", &self.queries)
            .field("analytics", &self.analytics)
            .finish_non_exhaustive()
    }
}
