//! Text helpers for blog posts: slugs, excerpts and reading time

use std::sync::LazyLock;

use regex::Regex;

static TAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid regex"));
static NON_SLUG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^a-z0-9_\s-]").expect("valid regex"));
static WHITESPACE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").expect("valid regex"));
static HYPHENS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"-+").expect("valid regex"));
static SLUG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9_]|%[0-9a-fA-F]{2})+(?:-(?:[a-z0-9_]|%[0-9a-fA-F]{2})+)*$")
        .expect("valid regex")
});

const WORDS_PER_MINUTE: usize = 200;

/// Default excerpt length in characters
pub const EXCERPT_LENGTH: usize = 160;

/// Build a URL-friendly slug from a title
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let cleaned = NON_SLUG.replace_all(&lowered, "");
    let hyphenated = WHITESPACE.replace_all(cleaned.trim(), "-");
    let collapsed = HYPHENS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Check that a slug is runs of lowercase alphanumerics, underscores or
/// `%XX` escapes, joined by single hyphens
///
/// WordPress percent-encodes non-ASCII titles, so `%e0%a6%ac-news` is a
/// real slug.
pub fn is_valid_slug(slug: &str) -> bool {
    SLUG.is_match(slug)
}

/// Remove HTML tags and decode the handful of entities WordPress emits
pub fn strip_html(content: &str) -> String {
    TAG.replace_all(content, "")
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&#8217;", "'")
        .replace("&amp;", "&")
}

/// Plain-text excerpt of at most `max_len` characters, cut on a word boundary
pub fn extract_excerpt(content: &str, max_len: usize) -> String {
    let text = strip_html(content);
    let text = text.trim();
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    format!("{}...", cut_at_word(text, max_len).trim())
}

/// Truncate on a word boundary, appending `...` when anything was dropped
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    format!("{}...", cut_at_word(text, max_len))
}

/// Truncate to at most `max_chars` characters without splitting a code point
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Estimated reading time at 200 words per minute, e.g. `"3 min read"`
pub fn reading_time(content: &str) -> String {
    let words = strip_html(content).split_whitespace().count();
    let minutes = words.div_ceil(WORDS_PER_MINUTE).max(1);
    format!("{minutes} min read")
}

fn cut_at_word(text: &str, max_len: usize) -> &str {
    let truncated = truncate_chars(text, max_len);
    match truncated.rfind(' ') {
        Some(idx) if idx > 0 => &truncated[..idx],
        _ => truncated,
    }
}
