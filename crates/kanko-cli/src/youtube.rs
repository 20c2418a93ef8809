//! Handlers for the YouTube pipeline subcommands.

use chrono::{DateTime, Utc};

use kanko_core::{AppConfig, KeywordConfig};
use kanko_store::DataRoot;
use kanko_youtube::{CaptionParams, EnrichParams, TranscriptClient, YouTubeClient};

/// Collect windowed search results for one query and persist the merged
/// collection.
pub(crate) async fn run_search(
    config: &AppConfig,
    query: &str,
    max_requests: u32,
    after: Option<DateTime<Utc>>,
) -> anyhow::Result<()> {
    let api_key = config.require_youtube_api_key()?;
    let client = YouTubeClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let count = kanko_youtube::run_search(&client, &root, query, max_requests, after).await?;
    println!("saved {count} unique search results for '{query}'");
    Ok(())
}

/// Enrich one batch window of collected search results.
pub(crate) async fn run_enrich(
    config: &AppConfig,
    max_requests: usize,
    batch_idx: usize,
    min_views: u64,
) -> anyhow::Result<()> {
    let api_key = config.require_youtube_api_key()?;
    let keywords = KeywordConfig::load(&config.keyword_paths)?;
    let client = YouTubeClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let params = EnrichParams {
        max_requests,
        batch_idx,
        min_views,
    };
    let count = kanko_youtube::run_enrich(&client, &root, &keywords, &params).await?;
    println!("enriched table now holds {count} records");
    Ok(())
}

/// Fetch transcripts for the top-viewed enriched videos.
pub(crate) async fn run_captions(
    config: &AppConfig,
    max_fetches: usize,
    languages: Vec<String>,
) -> anyhow::Result<()> {
    let transcripts = TranscriptClient::new(config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let params = CaptionParams {
        max_fetches,
        languages,
        delay_min_secs: config.caption_delay_min_secs,
        delay_max_secs: config.caption_delay_max_secs,
    };
    let count = kanko_youtube::run_captions(&transcripts, &root, &params).await?;
    println!("saved {count} videos with captions");
    Ok(())
}
