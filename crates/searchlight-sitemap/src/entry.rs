//! Sitemap documents and their entries

use std::fmt::{self, Write as _};

use chrono::{DateTime, SecondsFormat, Utc};

use crate::escape::escape_xml;

/// Sitemap protocol namespace
pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

/// Google video sitemap extension namespace
pub const VIDEO_NS: &str = "http://www.google.com/schemas/sitemap-video/1.1";

/// How often a page is expected to change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChangeFrequency {
    Always,
    Hourly,
    Daily,
    Weekly,
    Monthly,
    Yearly,
    Never,
}

impl ChangeFrequency {
    /// Protocol keyword
    pub fn as_str(&self) -> &'static str {
        match self {
            ChangeFrequency::Always => "always",
            ChangeFrequency::Hourly => "hourly",
            ChangeFrequency::Daily => "daily",
            ChangeFrequency::Weekly => "weekly",
            ChangeFrequency::Monthly => "monthly",
            ChangeFrequency::Yearly => "yearly",
            ChangeFrequency::Never => "never",
        }
    }
}

impl fmt::Display for ChangeFrequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Format a timestamp the way sitemaps expect it
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Video metadata attached to a URL entry
#[derive(Debug, Clone, PartialEq)]
pub struct VideoInfo {
    pub thumbnail_loc: String,
    pub title: String,
    pub description: String,
    pub player_loc: String,
    pub publication_date: DateTime<Utc>,
    pub family_friendly: bool,
    pub live: bool,
}

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct UrlEntry {
    /// Absolute URL
    pub loc: String,
    /// Omitted from the output when `None`
    pub lastmod: Option<DateTime<Utc>>,
    pub changefreq: Option<ChangeFrequency>,
    /// 0.0 to 1.0
    pub priority: Option<f32>,
    pub video: Option<VideoInfo>,
}

impl UrlEntry {
    /// An entry with just a location
    pub fn new(loc: impl Into<String>) -> Self {
        Self {
            loc: loc.into(),
            lastmod: None,
            changefreq: None,
            priority: None,
            video: None,
        }
    }

    /// Set the last modification time
    pub fn lastmod(mut self, lastmod: DateTime<Utc>) -> Self {
        self.lastmod = Some(lastmod);
        self
    }

    /// Set the change frequency
    pub fn changefreq(mut self, changefreq: ChangeFrequency) -> Self {
        self.changefreq = Some(changefreq);
        self
    }

    /// Set the priority, clamped to 0.0..=1.0
    pub fn priority(mut self, priority: f32) -> Self {
        self.priority = Some(priority.clamp(0.0, 1.0));
        self
    }

    /// Attach video metadata
    pub fn video(mut self, video: VideoInfo) -> Self {
        self.video = Some(video);
        self
    }

    fn write_xml(&self, out: &mut String) {
        out.push_str("  <url>\n");
        let _ = writeln!(out, "    <loc>{}</loc>", escape_xml(&self.loc));
        if let Some(lastmod) = &self.lastmod {
            let _ = writeln!(out, "    <lastmod>{}</lastmod>", format_timestamp(lastmod));
        }
        if let Some(changefreq) = self.changefreq {
            let _ = writeln!(out, "    <changefreq>{changefreq}</changefreq>");
        }
        if let Some(priority) = self.priority {
            let _ = writeln!(out, "    <priority>{priority:.1}</priority>");
        }
        if let Some(video) = &self.video {
            write_video(video, out);
        }
        out.push_str("  </url>\n");
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

fn write_video(video: &VideoInfo, out: &mut String) {
    out.push_str("    <video:video>\n");
    let _ = writeln!(
        out,
        "      <video:thumbnail_loc>{}</video:thumbnail_loc>",
        escape_xml(&video.thumbnail_loc)
    );
    let _ = writeln!(out, "      <video:title>{}</video:title>", escape_xml(&video.title));
    let _ = writeln!(
        out,
        "      <video:description>{}</video:description>",
        escape_xml(&video.description)
    );
    let _ = writeln!(
        out,
        "      <video:player_loc>{}</video:player_loc>",
        escape_xml(&video.player_loc)
    );
    let _ = writeln!(
        out,
        "      <video:publication_date>{}</video:publication_date>",
        format_timestamp(&video.publication_date)
    );
    let _ = writeln!(
        out,
        "      <video:family_friendly>{}</video:family_friendly>",
        yes_no(video.family_friendly)
    );
    let _ = writeln!(out, "      <video:live>{}</video:live>", yes_no(video.live));
    out.push_str("    </video:video>\n");
}

/// A complete `<urlset>` document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UrlSet {
    entries: Vec<UrlEntry>,
}

impl UrlSet {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an entry
    pub fn push(&mut self, entry: UrlEntry) {
        self.entries.push(entry);
    }

    /// Entries in document order
    pub fn entries(&self) -> &[UrlEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the document has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Serialize, declaring the video namespace only when an entry needs it
    pub fn to_xml(&self) -> String {
        let has_video = self.entries.iter().any(|e| e.video.is_some());

        let mut out = String::with_capacity(128 + self.entries.len() * 160);
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        if has_video {
            let _ = writeln!(
                out,
                "<urlset xmlns=\"{SITEMAP_NS}\" xmlns:video=\"{VIDEO_NS}\">"
            );
        } else {
            let _ = writeln!(out, "<urlset xmlns=\"{SITEMAP_NS}\">");
        }
        for entry in &self.entries {
            entry.write_xml(&mut out);
        }
        out.push_str("</urlset>\n");
        out
    }
}

impl Extend<UrlEntry> for UrlSet {
    fn extend<I: IntoIterator<Item = UrlEntry>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl FromIterator<UrlEntry> for UrlSet {
    fn from_iter<I: IntoIterator<Item = UrlEntry>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
