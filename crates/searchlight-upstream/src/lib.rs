//! # Searchlight Upstream
//!
//! Read-only access to the two content feeds Searchlight sits in front of:
//! a WordPress blog and a video index backend.
//!
//! ## Features
//!
//! - **BlogSource / VideoSource traits**: what the server needs from each feed
//! - **WordPressClient / VideoIndexClient**: reqwest implementations with a
//!   bounded timeout and no retries
//! - **UnifiedSearch**: queries both feeds concurrently, degrading per side
//!
//! Callers decide how to degrade; these clients only report what went wrong

pub mod client;
pub mod error;
pub mod unified;

pub use client::{
    DEFAULT_BLOG_API_URL, DEFAULT_TIMEOUT, DEFAULT_VIDEO_API_URL, VideoIndexClient,
    WordPressClient, build_http_client,
};
pub use error::UpstreamError;
pub use unified::{BlogHit, SearchResults, UnifiedSearch};

use async_trait::async_trait;
use searchlight_core::{BlogPost, Video};
use serde_json::Value;
use tracing::warn;

/// Source of blog posts
#[async_trait]
pub trait BlogSource: Send + Sync {
    /// Every published post, exactly as the feed sent it
    async fn raw_posts(&self) -> Result<Vec<Value>, UpstreamError>;

    /// Every published post that decodes as a [`BlogPost`]
    async fn posts(&self) -> Result<Vec<BlogPost>, UpstreamError> {
        Ok(decode_posts(self.raw_posts().await?))
    }

    /// Posts matching a search term
    async fn search(&self, query: &str) -> Result<Vec<BlogPost>, UpstreamError>;
}

/// Decode posts one at a time, skipping any that do not fit [`BlogPost`]
pub fn decode_posts(raw: Vec<Value>) -> Vec<BlogPost> {
    raw.into_iter()
        .filter_map(|value| match serde_json::from_value(value) {
            Ok(post) => Some(post),
            Err(e) => {
                warn!(error = %e, "Skipping malformed blog post");
                None
            }
        })
        .collect()
}

/// Source of videos
#[async_trait]
pub trait VideoSource: Send + Sync {
    /// Every indexed video
    async fn videos(&self) -> Result<Vec<Video>, UpstreamError>;

    /// Videos matching a search term
    async fn search(&self, query: &str) -> Result<Vec<Video>, UpstreamError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_posts_skips_malformed() {
        let raw = vec![
            json!({"ID": 1, "slug": "good", "thumbnail": "https://cdn/a.jpg"}),
            json!({"ID": 2, "title": "no slug"}),
            json!({"ID": 3, "slug": "odd", "categories": [{"name": "News"}]}),
        ];

        let posts = decode_posts(raw);
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].slug, "good");
        assert_eq!(posts[0].extra["thumbnail"], "https://cdn/a.jpg");
    }
}
