//! Wire types for the nearby-search endpoint.

use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub(crate) struct NearbySearchResponse {
    #[serde(default)]
    pub results: Vec<PlaceCandidate>,
    #[serde(rename = "next_page_token")]
    pub next_page_token: Option<String>,
    #[serde(default)]
    pub status: String,
}

/// A place stub from nearby search. Candidates are transient: only the
/// selected subset proceeds to the detail fetch, and nothing here is
/// persisted directly.
#[derive(Debug, Clone, Deserialize)]
pub struct PlaceCandidate {
    pub place_id: Option<String>,
    pub name: Option<String>,
    pub rating: Option<f64>,
    pub user_ratings_total: Option<u64>,
}

impl PlaceCandidate {
    /// Review count with absent values treated as zero.
    #[must_use]
    pub fn review_count(&self) -> u64 {
        self.user_ratings_total.unwrap_or(0)
    }

    /// Rating with absent values treated as zero.
    #[must_use]
    pub fn rating_or_zero(&self) -> f64 {
        self.rating.unwrap_or(0.0)
    }
}
