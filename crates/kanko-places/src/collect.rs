//! Place collection orchestration: breadth search across category filters,
//! cross-category dedup, two-tier selection, and sequential detail fetch.

use kanko_store::{dedup_keyed_first_wins, DataRoot};

use crate::client::NearbySearchClient;
use crate::details::PlaceDetailsClient;
use crate::error::PlacesError;
use crate::select::pick_top_places;
use crate::types::PlaceCandidate;

/// The fixed breadth-search category filters: unfiltered plus the two
/// tourism-relevant types.
const CATEGORY_FILTERS: [Option<&str>; 3] = [None, Some("tourist_attraction"), Some("restaurant")];

#[derive(Debug, Clone)]
pub struct CollectParams {
    pub center: (f64, f64),
    pub search_radius: u32,
    /// Page budget per category filter.
    pub max_pages: u32,
    /// Result cap across both selection tiers.
    pub max_results: usize,
    pub ratio_popularity: f64,
    pub min_reviews: u64,
    /// Pause before each continuation request.
    pub page_delay_secs: u64,
}

impl CollectParams {
    #[must_use]
    pub fn new(center: (f64, f64), search_radius: u32, max_pages: u32, max_results: usize) -> Self {
        Self {
            center,
            search_radius,
            max_pages,
            max_results,
            ratio_popularity: 0.8,
            min_reviews: 200,
            page_delay_secs: 2,
        }
    }
}

/// Collect high-value places near the center and persist their full detail
/// payloads as one combined JSON file.
///
/// Returns the number of detail records persisted.
///
/// # Errors
///
/// Any nearby-search or detail-fetch failure aborts the entire run with no
/// partial persistence; store failures propagate as
/// [`PlacesError::Store`].
pub async fn run_collect_places(
    nearby: &NearbySearchClient,
    details: &PlaceDetailsClient,
    root: &DataRoot,
    params: &CollectParams,
) -> Result<usize, PlacesError> {
    let candidates = fetch_nearby_places(nearby, params).await?;
    let selected = pick_top_places(
        &candidates,
        params.max_results,
        params.ratio_popularity,
        params.min_reviews,
    );
    tracing::info!(
        candidates = candidates.len(),
        selected = selected.len(),
        "selected places for detail fetch"
    );

    let mut payloads = Vec::with_capacity(selected.len());
    for place in &selected {
        let Some(place_id) = place.place_id.as_deref() else {
            continue;
        };
        payloads.push(details.fetch_detail(place_id).await?);
    }

    root.save_place_details(&payloads)?;
    tracing::info!(count = payloads.len(), "saved place details");
    Ok(payloads.len())
}

/// Phase 1: paged nearby search per category filter, deduplicated across
/// categories by place id (first occurrence wins).
async fn fetch_nearby_places(
    nearby: &NearbySearchClient,
    params: &CollectParams,
) -> Result<Vec<PlaceCandidate>, PlacesError> {
    let mut all_results = Vec::new();
    for place_type in CATEGORY_FILTERS {
        let results = nearby
            .fetch_category(
                params.center,
                params.search_radius,
                place_type,
                params.max_pages,
                params.page_delay_secs,
            )
            .await?;
        all_results.extend(results);
    }

    let deduped = dedup_keyed_first_wins(
        all_results
            .into_iter()
            .filter(|p| p.place_id.is_some())
            .collect(),
        |p: &PlaceCandidate| p.place_id.clone(),
    );
    tracing::info!(
        unique = deduped.len(),
        searches = CATEGORY_FILTERS.len(),
        "deduplicated nearby results"
    );
    Ok(deduped)
}
