//! Parallel search across both content sources

use std::sync::Arc;

use searchlight_core::blog_text::{EXCERPT_LENGTH, extract_excerpt, reading_time};
use searchlight_core::{BlogPost, SearchQuery, Video};
use serde::Serialize;
use tracing::{instrument, warn};

use crate::{BlogSource, VideoSource};

/// A blog post decorated for search results
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogHit {
    #[serde(flatten)]
    pub post: BlogPost,
    /// Plain-text summary
    pub summary: String,
    /// e.g. "3 min read"
    pub reading_time: String,
}

impl From<BlogPost> for BlogHit {
    fn from(post: BlogPost) -> Self {
        let source = if post.excerpt.trim().is_empty() {
            &post.content
        } else {
            &post.excerpt
        };
        let summary = extract_excerpt(source, EXCERPT_LENGTH);
        let reading_time = reading_time(&post.content);
        Self {
            post,
            summary,
            reading_time,
        }
    }
}

/// Results from both sources
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResults {
    pub query: String,
    pub videos: Vec<Video>,
    pub blog_posts: Vec<BlogHit>,
    pub videos_count: usize,
    pub blogs_count: usize,
    /// One note per source that failed
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
}

/// Searches videos and blog posts concurrently
#[derive(Clone)]
pub struct UnifiedSearch {
    blog: Arc<dyn BlogSource>,
    videos: Arc<dyn VideoSource>,
}

impl UnifiedSearch {
    /// Create over the two sources
    pub fn new(blog: Arc<dyn BlogSource>, videos: Arc<dyn VideoSource>) -> Self {
        Self { blog, videos }
    }

    /// Query both sources at once
    ///
    /// Never fails: a source that errors contributes no results and a
    /// note in `errors`.
    #[instrument(skip(self), fields(query = %query))]
    pub async fn search(&self, query: &SearchQuery) -> SearchResults {
        let (videos, posts) = tokio::join!(
            self.videos.search(query.as_str()),
            self.blog.search(query.as_str())
        );

        let mut errors = Vec::new();
        let videos = videos.unwrap_or_else(|e| {
            warn!(error = %e, "Video search failed");
            errors.push(format!("videos: {e}"));
            Vec::new()
        });
        let blog_posts: Vec<BlogHit> = match posts {
            Ok(posts) => posts.into_iter().map(BlogHit::from).collect(),
            Err(e) => {
                warn!(error = %e, "Blog search failed");
                errors.push(format!("blog: {e}"));
                Vec::new()
            }
        };

        SearchResults {
            query: query.to_string(),
            videos_count: videos.len(),
            blogs_count: blog_posts.len(),
            videos,
            blog_posts,
            errors,
        }
    }
}

impl std::fmt::Debug for UnifiedSearch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UnifiedSearch").finish_non_exhaustive()
    }
}
