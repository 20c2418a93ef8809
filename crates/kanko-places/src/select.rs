//! Two-tier place selection.
//!
//! After dropping places below the review-count threshold, the result cap is
//! split between a "popularity" tier (most reviews) and a "quality" tier
//! (best (rating, review-count), excluding anything already chosen). The
//! quality tier is simply shorter when non-overlapping candidates run out;
//! there is no backfill from the popularity tier. The concatenated order
//! carries no downstream meaning.

use std::collections::HashSet;

use crate::types::PlaceCandidate;

/// Select up to `limit` places: `floor(limit * ratio_popularity)` by review
/// count, the remainder by (rating, review count), with candidates below
/// `min_reviews` discarded up front.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss, clippy::cast_sign_loss)]
pub fn pick_top_places(
    candidates: &[PlaceCandidate],
    limit: usize,
    ratio_popularity: f64,
    min_reviews: u64,
) -> Vec<PlaceCandidate> {
    let filtered: Vec<&PlaceCandidate> = candidates
        .iter()
        .filter(|p| p.review_count() >= min_reviews)
        .collect();

    let n_popularity = (limit as f64 * ratio_popularity) as usize;
    let n_quality = limit.saturating_sub(n_popularity);

    let mut by_reviews = filtered.clone();
    by_reviews.sort_by(|a, b| b.review_count().cmp(&a.review_count()));
    let top_popularity: Vec<&PlaceCandidate> =
        by_reviews.iter().take(n_popularity).copied().collect();

    let mut by_quality = filtered;
    by_quality.sort_by(|a, b| {
        b.rating_or_zero()
            .total_cmp(&a.rating_or_zero())
            .then_with(|| b.review_count().cmp(&a.review_count()))
    });

    let mut seen: HashSet<&str> = top_popularity
        .iter()
        .filter_map(|p| p.place_id.as_deref())
        .collect();
    let mut top_quality: Vec<&PlaceCandidate> = Vec::new();
    for place in by_quality {
        if top_quality.len() >= n_quality {
            break;
        }
        let Some(place_id) = place.place_id.as_deref() else {
            continue;
        };
        if seen.insert(place_id) {
            top_quality.push(place);
        }
    }

    top_popularity
        .into_iter()
        .chain(top_quality)
        .cloned()
        .collect()
}
