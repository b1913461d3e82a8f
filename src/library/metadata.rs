//! Metadata lookup for incoming content.
//!
//! Tutorials get their title and thumbnail from the YouTube oEmbed
//! endpoint; link documents fall back to deriving a title from the URL.

use anyhow::{Context, Result};
use serde::Deserialize;

/// Metadata resolved for a video URL
#[derive(Debug, Clone)]
pub struct VideoMetadata {
    pub title: String,
    pub thumbnail_url: String,
    /// oEmbed does not expose duration
    pub duration: String,
}

/// oEmbed response (only the fields we read)
#[derive(Debug, Deserialize)]
struct OEmbedResponse {
    title: String,
}

/// Extract the video id from a YouTube URL.
///
/// Handles watch, short-link, and embed forms.
pub fn youtube_video_id(url: &str) -> Option<String> {
    let trimmed = url.trim();

    let candidate = if let Some(rest) = trimmed.split("watch?v=").nth(1) {
        rest
    } else if let Some(rest) = trimmed.split("youtu.be/").nth(1) {
        rest
    } else if let Some(rest) = trimmed.split("/embed/").nth(1) {
        rest
    } else {
        return None;
    };

    let id: String = candidate
        .chars()
        .take_while(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();

    // YouTube ids are 10-12 characters
    if (10..=12).contains(&id.len()) {
        Some(id)
    } else {
        None
    }
}

/// Fetch title and thumbnail for a YouTube video via oEmbed
pub async fn fetch_youtube_metadata(url: &str) -> Result<VideoMetadata> {
    let video_id =
        youtube_video_id(url).with_context(|| format!("Not a YouTube URL: {}", url))?;

    let oembed_url = format!(
        "https://www.youtube.com/oembed?url=https://www.youtube.com/watch?v={}&format=json",
        video_id
    );

    let response: OEmbedResponse = reqwest::get(&oembed_url)
        .await
        .context("Failed to reach the YouTube oEmbed endpoint")?
        .error_for_status()
        .with_context(|| format!("oEmbed lookup failed for video {}", video_id))?
        .json()
        .await
        .context("Failed to parse oEmbed response")?;

    Ok(VideoMetadata {
        title: response.title,
        thumbnail_url: format!("https://img.youtube.com/vi/{}/maxresdefault.jpg", video_id),
        duration: "00:00".to_string(),
    })
}

/// Best-effort title for a plain link: the last path segment, or the
/// URL itself when there is none
pub fn link_title(url: &str) -> String {
    let without_scheme = url.split("://").nth(1).unwrap_or(url);
    let trimmed = without_scheme.trim_end_matches('/');

    match trimmed.split_once('/') {
        Some((_, path)) => {
            let segment = path.rsplit('/').next().unwrap_or(path);
            let segment = segment.split('?').next().unwrap_or(segment);
            if segment.is_empty() {
                url.to_string()
            } else {
                segment.to_string()
            }
        }
        None => url.to_string(),
    }
}
