//! reqwest clients for the WordPress and video index APIs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use searchlight_core::{BlogPost, Video};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::error::UpstreamError;
use crate::{BlogSource, VideoSource, decode_posts};

/// Default WordPress custom posts endpoint
pub const DEFAULT_BLOG_API_URL: &str = "https://wordpress.codeopx.com/wp-json/custom/v1/posts/";

/// Default video index backend
pub const DEFAULT_VIDEO_API_URL: &str = "http://localhost:5000";

/// Default per-request timeout
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Build a client with a total request timeout
pub fn build_http_client(timeout: Duration) -> Result<Client, UpstreamError> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("searchlight/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| UpstreamError::Client(e.to_string()))
}

/// GET `url` and decode a JSON body, failing on non-2xx
async fn get_json<T: DeserializeOwned>(client: &Client, url: &str) -> Result<T, UpstreamError> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| UpstreamError::from_reqwest(url, e))?;

    let status = response.status();
    if !status.is_success() {
        return Err(UpstreamError::Status {
            url: url.to_string(),
            status: status.as_u16(),
        });
    }

    let body = response
        .bytes()
        .await
        .map_err(|e| UpstreamError::from_reqwest(url, e))?;
    serde_json::from_slice(&body).map_err(|e| UpstreamError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

/// Client for the WordPress custom posts endpoint
#[derive(Debug, Clone)]
pub struct WordPressClient {
    client: Client,
    posts_url: String,
}

impl WordPressClient {
    /// Create a client for `posts_url`
    pub fn new(posts_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self::with_client(build_http_client(timeout)?, posts_url))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, posts_url: impl Into<String>) -> Self {
        Self {
            client,
            posts_url: posts_url.into(),
        }
    }

    /// The posts endpoint
    pub fn posts_url(&self) -> &str {
        &self.posts_url
    }
}

#[async_trait]
impl BlogSource for WordPressClient {
    #[instrument(skip(self), fields(url = %self.posts_url))]
    async fn raw_posts(&self) -> Result<Vec<Value>, UpstreamError> {
        let posts: Vec<Value> = get_json(&self.client, &self.posts_url).await?;
        debug!(count = posts.len(), "Fetched blog posts");
        Ok(posts)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<BlogPost>, UpstreamError> {
        let url = format!("{}?search={}", self.posts_url, urlencoding::encode(query));
        let posts = decode_posts(get_json(&self.client, &url).await?);
        debug!(count = posts.len(), "Blog search complete");
        Ok(posts)
    }
}

/// Client for the video index backend
#[derive(Debug, Clone)]
pub struct VideoIndexClient {
    client: Client,
    api_url: String,
}

impl VideoIndexClient {
    /// Create a client for the backend at `api_url`
    pub fn new(api_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        Ok(Self::with_client(build_http_client(timeout)?, api_url))
    }

    /// Create a client sharing an existing connection pool
    pub fn with_client(client: Client, api_url: impl Into<String>) -> Self {
        let api_url: String = api_url.into();
        Self {
            client,
            api_url: api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Base URL of the backend, without a trailing slash
    pub fn api_url(&self) -> &str {
        &self.api_url
    }
}

#[async_trait]
impl VideoSource for VideoIndexClient {
    #[instrument(skip(self), fields(url = %self.api_url))]
    async fn videos(&self) -> Result<Vec<Video>, UpstreamError> {
        let url = format!("{}/api/videos", self.api_url);
        let videos: Vec<Video> = get_json(&self.client, &url).await?;
        debug!(count = videos.len(), "Fetched videos");
        Ok(videos)
    }

    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> Result<Vec<Video>, UpstreamError> {
        let url = format!("{}/api/search?q={}", self.api_url, urlencoding::encode(query));
        let videos: Vec<Video> = get_json(&self.client, &url).await?;
        debug!(count = videos.len(), "Video search complete");
        Ok(videos)
    }
}
