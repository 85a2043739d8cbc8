//! Video sitemap using Google's video extension

use chrono::{DateTime, Utc};
use searchlight_core::Video;
use searchlight_core::blog_text::truncate_chars;

use crate::entry::{UrlEntry, UrlSet, VideoInfo};
use crate::render::join_url;

/// Longest description the video extension accepts
pub const MAX_DESCRIPTION_CHARS: usize = 2048;

/// One `/video/<id>` entry per video
///
/// Thumbnails are served by the video backend, so their paths are resolved
/// against `video_api_url`. Videos with an unparsable creation date are
/// stamped with `now`.
pub fn video_sitemap(
    base_url: &str,
    video_api_url: &str,
    videos: &[Video],
    now: DateTime<Utc>,
) -> UrlSet {
    videos
        .iter()
        .map(|video| {
            let info = VideoInfo {
                thumbnail_loc: join_url(video_api_url, &video.thumbnail),
                title: video.title.clone(),
                description: truncate_chars(&video.description, MAX_DESCRIPTION_CHARS).to_string(),
                player_loc: video.player_url(),
                publication_date: video.created_at().unwrap_or(now),
                family_friendly: true,
                live: false,
            };
            let path = format!("/video/{}", urlencoding::encode(&video.id));
            UrlEntry::new(join_url(base_url, &path)).video(info)
        })
        .collect()
}
