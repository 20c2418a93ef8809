use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One search hit, as persisted per query.
///
/// `video_id` is the identity; later entries for the same id overwrite
/// earlier ones when runs are merged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResultItem {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub published_at: DateTime<Utc>,
    /// Originating query string.
    pub query: String,
}

/// A video joined against the details API, retained only when it clears the
/// engagement floor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnrichedVideoRecord {
    pub video_id: String,
    pub title: String,
    pub description: String,
    pub publish_date: Option<DateTime<Utc>>,
    pub channel_id: Option<String>,
    pub channel_title: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub view_count: u64,
    pub like_count: u64,
    pub comment_count: u64,
    pub favorite_count: u64,
    pub duration_secs: Option<f64>,
    pub definition: Option<String>,
    /// Human-readable category label; unmapped codes fall back to `"Other"`.
    pub category: String,
    pub default_language: Option<String>,
    pub default_audio_language: Option<String>,
    /// One boolean per configured keyword category.
    #[serde(default)]
    pub keyword_flags: BTreeMap<String, bool>,
}

/// An enriched record plus its fetched transcript. Videos without an
/// obtainable transcript are never written to this table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionedVideoRecord {
    #[serde(flatten)]
    pub video: EnrichedVideoRecord,
    pub caption: String,
}

/// One flattened place from the details payload (`gmap_places` table).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRow {
    pub place_id: String,
    pub name: Option<String>,
    pub display_name_lang: Option<String>,
    pub address: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub rating: Option<f64>,
    pub rating_count: Option<u64>,
    pub summary: Option<String>,
    pub editorial_lang: Option<String>,
    #[serde(default)]
    pub types: Vec<String>,
    pub price_level: Option<String>,
    /// Category-membership flags derived from `types`.
    pub tourist_attraction: bool,
    pub food: bool,
}

/// One review extracted from a place's details (`gmap_reviews` table).
/// Identity is implicit: a review exists only through its owning place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewRow {
    pub place_id: String,
    pub place_name: Option<String>,
    pub review_author: Option<String>,
    pub review_rating: Option<f64>,
    pub review_text: Option<String>,
    pub review_time: Option<DateTime<Utc>>,
    pub review_language: Option<String>,
}
