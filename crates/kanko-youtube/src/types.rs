//! Wire types for the YouTube Data API (`search` and `videos` endpoints).

use serde::Deserialize;

/// One page of search results plus its continuation token.
#[derive(Debug)]
pub struct SearchPage {
    pub items: Vec<SearchItem>,
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchListResponse {
    #[serde(default)]
    pub items: Vec<SearchItem>,
    #[serde(rename = "nextPageToken")]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchItem {
    pub id: SearchItemId,
    pub snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
pub struct SearchItemId {
    #[serde(rename = "videoId")]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SearchSnippet {
    #[serde(rename = "publishedAt")]
    pub published_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoListResponse {
    #[serde(default)]
    pub items: Vec<VideoItem>,
}

/// One item from the `videos` endpoint
/// (`part=snippet,contentDetails,statistics`).
#[derive(Debug, Deserialize)]
pub struct VideoItem {
    pub id: String,
    pub snippet: VideoSnippet,
    #[serde(rename = "contentDetails", default)]
    pub content_details: ContentDetails,
    #[serde(default)]
    pub statistics: Statistics,
}

#[derive(Debug, Deserialize)]
pub struct VideoSnippet {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "publishedAt")]
    pub published_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "channelId")]
    pub channel_id: Option<String>,
    #[serde(rename = "channelTitle")]
    pub channel_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(rename = "categoryId")]
    pub category_id: Option<String>,
    #[serde(rename = "defaultLanguage")]
    pub default_language: Option<String>,
    #[serde(rename = "defaultAudioLanguage")]
    pub default_audio_language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ContentDetails {
    /// ISO-8601 duration, e.g. `PT10M15S`.
    pub duration: Option<String>,
    pub definition: Option<String>,
}

/// Engagement counters. The API serializes these as JSON strings; absent or
/// unparsable counters are treated as zero downstream.
#[derive(Debug, Default, Deserialize)]
pub struct Statistics {
    #[serde(rename = "viewCount")]
    pub view_count: Option<String>,
    #[serde(rename = "likeCount")]
    pub like_count: Option<String>,
    #[serde(rename = "commentCount")]
    pub comment_count: Option<String>,
    #[serde(rename = "favoriteCount")]
    pub favorite_count: Option<String>,
}

impl Statistics {
    pub(crate) fn count(raw: Option<&str>) -> u64 {
        raw.and_then(|s| s.parse::<u64>().ok()).unwrap_or(0)
    }
}
