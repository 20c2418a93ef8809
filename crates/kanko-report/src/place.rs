//! The place strategy report, built from the flattened places and reviews
//! tables.

use std::path::PathBuf;

use chrono::Datelike;

use kanko_genai::{GenAiClient, GenerationConfig};
use kanko_store::{DataRoot, PlaceRow, ReviewRow};

use crate::error::ReportError;
use crate::prompt::{aggregate_token_budget, strategy_header};
use crate::text::{clean_review_text, wrap_preserve_newlines};

/// Reviews included per place block, most recent first.
const REVIEWS_PER_PLACE: usize = 5;

#[derive(Debug, Clone)]
pub struct PlaceReportParams {
    /// Number of places included, ranked by review count.
    pub max_places: usize,
    pub pro_model: String,
    /// Column width of the wrapped rendering.
    pub wrap_width: usize,
}

/// Generate and persist the place report plus its line-wrapped rendering.
/// Returns the `(raw, wrapped)` output paths.
///
/// # Errors
///
/// Propagates generation and persistence failures; either aborts the run.
pub async fn run_place_report(
    genai: &GenAiClient,
    root: &DataRoot,
    params: &PlaceReportParams,
) -> Result<(PathBuf, PathBuf), ReportError> {
    let reviews = root.load_reviews()?;
    let mut places = root.load_places()?;
    places.sort_by(|a, b| b.rating_count.unwrap_or(0).cmp(&a.rating_count.unwrap_or(0)));

    let blocks: Vec<String> = places
        .iter()
        .take(params.max_places)
        .map(|place| build_place_block(place, &reviews))
        .collect();
    tracing::info!(places = blocks.len(), "generating place report");

    let prompt = format!(
        "{}{}",
        strategy_header("グーグルマップのレビュー", 2_000 + 100 * params.max_places),
        blocks.join("\n\n")
    );
    let report = genai
        .generate(
            &params.pro_model,
            &prompt,
            &GenerationConfig::strategy(aggregate_token_budget(params.max_places)),
        )
        .await?;

    let wrapped = wrap_preserve_newlines(&report, params.wrap_width);
    let (text_path, wrapped_path) = root.save_place_report(&report, &wrapped)?;
    tracing::info!(path = %text_path.display(), "saved generated place report");
    Ok((text_path, wrapped_path))
}

/// One place's block: name/rating/summary header plus its most recent
/// reviews tagged with their month.
fn build_place_block(place: &PlaceRow, reviews: &[ReviewRow]) -> String {
    let header = format!(
        "{name} | {rating}⭐ ({count}) | {summary}",
        name = place.name.as_deref().unwrap_or(""),
        rating = place.rating.map(|r| r.to_string()).unwrap_or_default(),
        count = place.rating_count.unwrap_or(0),
        summary = place.summary.as_deref().unwrap_or(""),
    );

    let mut place_reviews: Vec<&ReviewRow> = reviews
        .iter()
        .filter(|r| r.place_id == place.place_id)
        .collect();
    place_reviews.sort_by(|a, b| b.review_time.cmp(&a.review_time));

    let lines: Vec<String> = place_reviews
        .iter()
        .take(REVIEWS_PER_PLACE)
        .map(|r| {
            let month = r
                .review_time
                .map_or_else(|| "?".to_owned(), |t| t.month().to_string());
            format!(
                "[M{month}] {}",
                clean_review_text(r.review_text.as_deref().unwrap_or(""))
            )
        })
        .collect();

    format!("Place: {header}\nReviews:\n{}", lines.join("\n"))
}
