//! Flattening of raw place-detail payloads into the two normalized tables.

use chrono::{DateTime, Utc};
use serde_json::Value;

use kanko_store::{DataRoot, PlaceRow, ReviewRow};

use crate::error::PlacesError;

/// Type labels that become binary category-membership flags on each place.
const FLAG_LABELS: [&str; 2] = ["tourist_attraction", "food"];

/// Filter raw details by rating and split them into the places and reviews
/// tables (one-to-many by place id).
///
/// Returns `(places, reviews)` row counts.
///
/// # Errors
///
/// Returns [`PlacesError::Store`] if the raw payload file is missing or a
/// table cannot be written.
pub fn run_clean_places(root: &DataRoot, rating_threshold: f64) -> Result<(usize, usize), PlacesError> {
    let details = root.load_place_details()?;

    let kept: Vec<&Value> = details
        .iter()
        .filter(|d| d.get("rating").and_then(Value::as_f64).unwrap_or(0.0) >= rating_threshold)
        .collect();

    let places: Vec<PlaceRow> = kept.iter().filter_map(|d| flatten_place(d)).collect();
    let reviews: Vec<ReviewRow> = kept.iter().flat_map(|d| flatten_reviews(d)).collect();

    root.save_places(&places)?;
    root.save_reviews(&reviews)?;
    tracing::info!(places = places.len(), reviews = reviews.len(), "saved place tables");
    Ok((places.len(), reviews.len()))
}

/// Flatten one detail payload into a [`PlaceRow`]. Payloads without an id
/// are skipped; every other gap substitutes an empty value. The opening
/// hours block is dropped during flattening.
#[must_use]
pub fn flatten_place(detail: &Value) -> Option<PlaceRow> {
    let place_id = detail.get("id")?.as_str()?.to_owned();

    let types: Vec<String> = detail
        .get("types")
        .and_then(Value::as_array)
        .map(|a| {
            a.iter()
                .filter_map(Value::as_str)
                .map(str::to_owned)
                .collect()
        })
        .unwrap_or_default();

    let has_label = |label: &str| types.iter().any(|t| t == label);
    let tourist_attraction = has_label(FLAG_LABELS[0]);
    let food = has_label(FLAG_LABELS[1]);

    Some(PlaceRow {
        place_id,
        name: nested_str(detail, "displayName", "text"),
        display_name_lang: nested_str(detail, "displayName", "languageCode"),
        address: top_str(detail, "formattedAddress"),
        lat: detail
            .get("location")
            .and_then(|l| l.get("latitude"))
            .and_then(Value::as_f64),
        lng: detail
            .get("location")
            .and_then(|l| l.get("longitude"))
            .and_then(Value::as_f64),
        rating: detail.get("rating").and_then(Value::as_f64),
        rating_count: detail.get("userRatingCount").and_then(Value::as_u64),
        summary: nested_str(detail, "editorialSummary", "text"),
        editorial_lang: nested_str(detail, "editorialSummary", "languageCode"),
        types,
        price_level: top_str(detail, "priceLevel"),
        tourist_attraction,
        food,
    })
}

/// Extract the embedded reviews of one detail payload. A review's text and
/// language prefer the original-language block, falling back to the
/// translated one.
#[must_use]
pub fn flatten_reviews(detail: &Value) -> Vec<ReviewRow> {
    let Some(place_id) = detail.get("id").and_then(Value::as_str) else {
        return Vec::new();
    };
    let place_name = nested_str(detail, "displayName", "text");

    detail
        .get("reviews")
        .and_then(Value::as_array)
        .map(|reviews| {
            reviews
                .iter()
                .map(|r| ReviewRow {
                    place_id: place_id.to_owned(),
                    place_name: place_name.clone(),
                    review_author: nested_str(r, "authorAttribution", "displayName"),
                    review_rating: r.get("rating").and_then(Value::as_f64),
                    review_text: nested_str(r, "originalText", "text")
                        .or_else(|| nested_str(r, "text", "text")),
                    review_time: top_str(r, "publishTime")
                        .and_then(|t| t.parse::<DateTime<Utc>>().ok()),
                    review_language: nested_str(r, "originalText", "languageCode")
                        .or_else(|| nested_str(r, "text", "languageCode")),
                })
                .collect()
        })
        .unwrap_or_default()
}

fn top_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn nested_str(value: &Value, outer: &str, inner: &str) -> Option<String> {
    value
        .get(outer)
        .and_then(|o| o.get(inner))
        .and_then(Value::as_str)
        .map(str::to_owned)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn detail() -> Value {
        serde_json::json!({
            "id": "p1",
            "displayName": {"text": "川越氷川神社", "languageCode": "ja"},
            "formattedAddress": "埼玉県川越市宮下町2-11-3",
            "location": {"latitude": 35.932, "longitude": 139.489},
            "regularOpeningHours": {"periods": []},
            "rating": 4.4,
            "userRatingCount": 12000,
            "types": ["tourist_attraction", "place_of_worship"],
            "priceLevel": "PRICE_LEVEL_FREE",
            "editorialSummary": {"text": "縁結びで知られる神社", "languageCode": "ja"},
            "reviews": [
                {
                    "authorAttribution": {"displayName": "Taro"},
                    "rating": 5,
                    "originalText": {"text": "風鈴が綺麗", "languageCode": "ja"},
                    "text": {"text": "The wind chimes are beautiful", "languageCode": "en"},
                    "publishTime": "2023-07-20T10:00:00Z"
                },
                {
                    "rating": 4,
                    "text": {"text": "Nice shrine", "languageCode": "en"},
                    "publishTime": "2023-06-01T08:30:00Z"
                }
            ]
        })
    }

    #[test]
    fn flatten_place_extracts_fields_and_flags() {
        let row = flatten_place(&detail()).unwrap();
        assert_eq!(row.place_id, "p1");
        assert_eq!(row.name.as_deref(), Some("川越氷川神社"));
        assert_eq!(row.lat, Some(35.932));
        assert_eq!(row.rating_count, Some(12000));
        assert_eq!(row.summary.as_deref(), Some("縁結びで知られる神社"));
        assert!(row.tourist_attraction);
        assert!(!row.food);
    }

    #[test]
    fn flatten_place_without_id_is_skipped() {
        assert!(flatten_place(&serde_json::json!({"rating": 4.0})).is_none());
    }

    #[test]
    fn flatten_place_tolerates_missing_optional_fields() {
        let row = flatten_place(&serde_json::json!({"id": "bare"})).unwrap();
        assert!(row.name.is_none());
        assert!(row.rating.is_none());
        assert!(row.types.is_empty());
        assert!(!row.tourist_attraction);
    }

    #[test]
    fn flatten_reviews_prefers_original_text_with_fallback() {
        let reviews = flatten_reviews(&detail());
        assert_eq!(reviews.len(), 2);
        assert_eq!(reviews[0].review_text.as_deref(), Some("風鈴が綺麗"));
        assert_eq!(reviews[0].review_language.as_deref(), Some("ja"));
        assert_eq!(reviews[1].review_text.as_deref(), Some("Nice shrine"));
        assert_eq!(reviews[1].review_language.as_deref(), Some("en"));
        assert!(reviews[1].review_author.is_none());
        assert_eq!(reviews[0].place_name.as_deref(), Some("川越氷川神社"));
    }

    #[test]
    fn run_clean_places_applies_rating_threshold() {
        let dir = tempfile::tempdir().unwrap();
        let root = DataRoot::new(dir.path());
        root.save_place_details(&[
            detail(),
            serde_json::json!({"id": "low", "rating": 3.2, "reviews": [{"rating": 3}]}),
            serde_json::json!({"id": "unrated"}),
        ])
        .unwrap();

        let (places, reviews) = run_clean_places(&root, 3.9).unwrap();
        assert_eq!(places, 1);
        assert_eq!(reviews, 2);
        let rows = root.load_places().unwrap();
        assert_eq!(rows[0].place_id, "p1");
        assert!(root.load_reviews().unwrap().iter().all(|r| r.place_id == "p1"));
    }
}
