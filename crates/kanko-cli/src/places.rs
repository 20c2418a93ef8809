//! Handlers for the places subcommands.

use kanko_core::AppConfig;
use kanko_places::{CollectParams, NearbySearchClient, PlaceDetailsClient};
use kanko_store::DataRoot;

/// Collect nearby places, select the high-value subset, and persist their
/// detail payloads.
pub(crate) async fn run_places(
    config: &AppConfig,
    search_radius: u32,
    max_pages: u32,
    max_results: usize,
    ratio_popularity: f64,
    min_reviews: u64,
) -> anyhow::Result<()> {
    let api_key = config.require_maps_api_key()?;
    let nearby = NearbySearchClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let details = PlaceDetailsClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let params = CollectParams {
        center: (config.center_lat, config.center_lng),
        search_radius,
        max_pages,
        max_results,
        ratio_popularity,
        min_reviews,
        page_delay_secs: config.place_page_delay_secs,
    };
    let count = kanko_places::run_collect_places(&nearby, &details, &root, &params).await?;
    println!("saved details for {count} places");
    Ok(())
}

/// Flatten the raw detail payloads into the places/reviews tables.
pub(crate) fn run_clean(config: &AppConfig, rating_threshold: f64) -> anyhow::Result<()> {
    let root = DataRoot::new(&config.data_root);
    let (places, reviews) = kanko_places::run_clean_places(&root, rating_threshold)?;
    println!("saved {places} places and {reviews} reviews");
    Ok(())
}
