//! # Searchlight Sitemap
//!
//! Sitemap protocol documents for crawler discovery
//!
//! Documents are derived fresh on every request and never cached. The
//! functions here do no I/O; they take already-fetched terms, posts or
//! videos and return a [`UrlSet`] ready for [`UrlSet::to_xml`].
//!
//! ```rust
//! use chrono::Utc;
//! use searchlight_sitemap::search_sitemap;
//!
//! let xml = search_sitemap("https://example.com", &["live stream"], 50, Utc::now()).to_xml();
//! assert!(xml.contains("<loc>https://example.com/search/live%20stream</loc>"));
//! ```

pub mod entry;
pub mod escape;
pub mod render;
pub mod robots;
pub mod video;

pub use entry::{ChangeFrequency, SITEMAP_NS, UrlEntry, UrlSet, VIDEO_NS, VideoInfo};
pub use escape::escape_xml;
pub use render::{
    RenderOptions, SEARCH_PAGE_LIMIT, blog_sitemap, combined_sitemap, encode_slug, join_url,
    render, search_sitemap,
};
pub use robots::robots_txt;
pub use video::video_sitemap;
