//! Materializing sitemaps from search terms and blog posts
//!
//! Everything here is pure: callers fetch the data (and decide what to do
//! when fetching fails), these functions only shape it into a [`UrlSet`].

use chrono::{DateTime, Utc};
use searchlight_core::BlogPost;
use tracing::debug;

use crate::entry::{ChangeFrequency, UrlEntry, UrlSet};

/// Most search pages a sitemap lists
pub const SEARCH_PAGE_LIMIT: usize = 50;

/// How fragments become entries
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// Inserted between the base URL and each fragment, e.g. `/search/`
    pub path_prefix: String,
    pub changefreq: ChangeFrequency,
    pub priority: f32,
    /// Stamped on every rendered entry
    pub lastmod: DateTime<Utc>,
    /// Keep at most this many fragments (earliest first)
    pub limit: Option<usize>,
}

impl RenderOptions {
    /// Options for `/search/<term>` pages
    pub fn search_pages(now: DateTime<Utc>, limit: usize) -> Self {
        Self {
            path_prefix: "/search/".to_string(),
            changefreq: ChangeFrequency::Weekly,
            priority: 0.8,
            lastmod: now,
            limit: Some(limit),
        }
    }
}

/// Join a base URL and a path without doubling the slash
pub fn join_url(base_url: &str, path: &str) -> String {
    let base = base_url.trim_end_matches('/');
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        format!("{base}{path}")
    } else {
        format!("{base}/{path}")
    }
}

/// Percent-encode a slug as a path segment, keeping existing `%XX` escapes
///
/// WordPress sends non-ASCII slugs already encoded. A `%` that does not
/// start an escape is encoded like any other reserved character.
pub fn encode_slug(slug: &str) -> String {
    let mut out = String::with_capacity(slug.len());
    let mut rest = slug;

    while let Some(idx) = rest.find('%') {
        let (head, tail) = rest.split_at(idx);
        out.push_str(&urlencoding::encode(head));

        let bytes = tail.as_bytes();
        if bytes.len() >= 3 && bytes[1].is_ascii_hexdigit() && bytes[2].is_ascii_hexdigit() {
            out.push_str(&tail[..3]);
            rest = &tail[3..];
        } else {
            out.push_str("%25");
            rest = &tail[1..];
        }
    }
    out.push_str(&urlencoding::encode(rest));
    out
}

/// Build one entry per fragment
///
/// Each fragment is percent-encoded as a single path component. When
/// `options.limit` is set, fragments past it are dropped.
pub fn render_entries<S: AsRef<str>>(
    base_url: &str,
    fragments: &[S],
    options: &RenderOptions,
) -> Vec<UrlEntry> {
    let limit = options.limit.unwrap_or(fragments.len());
    if fragments.len() > limit {
        debug!(total = fragments.len(), limit, "Truncating sitemap fragments");
    }

    fragments
        .iter()
        .take(limit)
        .map(|fragment| {
            let path = format!(
                "{}{}",
                options.path_prefix,
                urlencoding::encode(fragment.as_ref())
            );
            UrlEntry::new(join_url(base_url, &path))
                .lastmod(options.lastmod)
                .changefreq(options.changefreq)
                .priority(options.priority)
        })
        .collect()
}

/// Render fragments into a complete document
pub fn render<S: AsRef<str>>(base_url: &str, fragments: &[S], options: &RenderOptions) -> UrlSet {
    render_entries(base_url, fragments, options).into_iter().collect()
}

/// `/` entry shared by the combined sitemap
fn home_entry(base_url: &str, now: DateTime<Utc>) -> UrlEntry {
    UrlEntry::new(join_url(base_url, "/"))
        .lastmod(now)
        .changefreq(ChangeFrequency::Daily)
        .priority(1.0)
}

/// `/blog` entry, always present in the blog sitemap
fn blog_index_entry(base_url: &str, now: DateTime<Utc>) -> UrlEntry {
    UrlEntry::new(join_url(base_url, "/blog"))
        .lastmod(now)
        .changefreq(ChangeFrequency::Daily)
        .priority(0.8)
}

/// Sitemap of search result pages
pub fn search_sitemap<S: AsRef<str>>(
    base_url: &str,
    terms: &[S],
    limit: usize,
    now: DateTime<Utc>,
) -> UrlSet {
    render(base_url, terms, &RenderOptions::search_pages(now, limit))
}

/// Sitemap of the blog index plus one page per post
///
/// A post's `lastmod` is its publication date, falling back to `now` when
/// the date does not parse. Posts without a slug are skipped.
pub fn blog_sitemap(base_url: &str, posts: &[BlogPost], now: DateTime<Utc>) -> UrlSet {
    let mut set = UrlSet::new();
    set.push(blog_index_entry(base_url, now));

    for post in posts.iter().filter(|p| !p.slug.is_empty()) {
        let path = format!("/blog/{}", encode_slug(&post.slug));
        set.push(
            UrlEntry::new(join_url(base_url, &path))
                .lastmod(post.published_at().unwrap_or(now))
                .changefreq(ChangeFrequency::Weekly)
                .priority(0.7),
        );
    }
    set
}

/// The site-wide sitemap: home, blog index, then search pages
pub fn combined_sitemap<S: AsRef<str>>(
    base_url: &str,
    terms: &[S],
    limit: usize,
    now: DateTime<Utc>,
) -> UrlSet {
    let mut set = UrlSet::new();
    set.push(home_entry(base_url, now));
    set.push(blog_index_entry(base_url, now));
    set.extend(render_entries(
        base_url,
        terms,
        &RenderOptions::search_pages(now, limit),
    ));
    set
}
