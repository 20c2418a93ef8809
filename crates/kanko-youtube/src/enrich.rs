//! Enrichment: join collected search stubs against the details endpoint,
//! apply the engagement floor, and classify by keyword category.

use std::collections::BTreeMap;

use regex::{Regex, RegexBuilder};

use kanko_core::KeywordConfig;
use kanko_store::{dedup_keyed_first_wins, DataRoot, EnrichedVideoRecord};

use crate::client::YouTubeClient;
use crate::duration::parse_iso8601_duration;
use crate::error::YouTubeError;
use crate::types::{Statistics, VideoItem};

#[derive(Debug, Clone)]
pub struct EnrichParams {
    /// Size of the batch window processed per invocation.
    pub max_requests: usize,
    /// Which batch window to process: rows
    /// `[batch_idx * max_requests, (batch_idx + 1) * max_requests)`.
    pub batch_idx: usize,
    /// Engagement floor: records below this view count are dropped.
    pub min_views: u64,
}

/// Enrich one batch window of collected search results and merge the
/// outcome into the persisted details table (existing rows win on key
/// conflict, which makes re-runs idempotent).
///
/// Returns the size of the persisted table after the merge.
///
/// # Errors
///
/// Propagates client failures, store failures, and keyword-pattern
/// compilation failures.
pub async fn run_enrich(
    client: &YouTubeClient,
    root: &DataRoot,
    keywords: &KeywordConfig,
    params: &EnrichParams,
) -> Result<usize, YouTubeError> {
    let all = root.load_all_search_results()?;
    let unique = dedup_keyed_first_wins(all, |item| item.video_id.clone());

    let negative = negative_pattern(&keywords.negative_keywords)?;
    let candidates: Vec<_> = unique
        .into_iter()
        .filter(|item| {
            let text = format!("{} {}", item.title, item.description);
            negative.as_ref().is_none_or(|re| !re.is_match(&text))
        })
        .collect();
    tracing::info!(
        remaining = candidates.len(),
        "videos after negative-keyword filtering"
    );

    let (start, end) = batch_window(candidates.len(), params.batch_idx, params.max_requests);
    let batch = &candidates[start..end];
    tracing::info!(count = batch.len(), start, end, "processing batch window");

    let ids: Vec<String> = batch.iter().map(|item| item.video_id.clone()).collect();
    let details = client.video_details(&ids).await?;

    let matchers = keyword_matchers(&keywords.keyword_rules)?;
    let fresh: Vec<EnrichedVideoRecord> = details
        .iter()
        .filter_map(|item| build_record(item, params.min_views, &keywords.category_map, &matchers))
        .collect();

    let existing = root.load_video_details()?;
    let merged = dedup_keyed_first_wins(
        existing.into_iter().chain(fresh).collect(),
        |record| record.video_id.clone(),
    );
    root.save_video_details(&merged)?;
    tracing::info!(count = merged.len(), "saved enriched records");
    Ok(merged.len())
}

/// Case-insensitive substring matcher over the negative-keyword list, or
/// `None` when the list is empty.
fn negative_pattern(words: &[String]) -> Result<Option<Regex>, regex::Error> {
    match alternation(words) {
        None => Ok(None),
        Some(pattern) => compile_ci(&pattern).map(Some),
    }
}

/// One case-insensitive matcher per keyword category, in category order.
fn keyword_matchers(
    rules: &BTreeMap<String, Vec<String>>,
) -> Result<Vec<(String, Regex)>, regex::Error> {
    rules
        .iter()
        .filter_map(|(category, words)| {
            alternation(words).map(|pattern| {
                compile_ci(&pattern).map(|re| (category.clone(), re))
            })
        })
        .collect()
}

fn alternation(words: &[String]) -> Option<String> {
    if words.is_empty() {
        return None;
    }
    Some(
        words
            .iter()
            .map(|w| regex::escape(w))
            .collect::<Vec<_>>()
            .join("|"),
    )
}

fn compile_ci(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// Bounds of the batch window, clamped to the candidate count.
fn batch_window(len: usize, batch_idx: usize, max_requests: usize) -> (usize, usize) {
    let start = batch_idx.saturating_mul(max_requests).min(len);
    let end = start.saturating_add(max_requests).min(len);
    (start, end)
}

fn build_record(
    item: &VideoItem,
    min_views: u64,
    category_map: &BTreeMap<String, String>,
    matchers: &[(String, Regex)],
) -> Option<EnrichedVideoRecord> {
    let view_count = Statistics::count(item.statistics.view_count.as_deref());
    if view_count < min_views {
        return None;
    }

    let text = format!("{} {}", item.snippet.title, item.snippet.description);
    let keyword_flags: BTreeMap<String, bool> = matchers
        .iter()
        .map(|(category, re)| (category.clone(), re.is_match(&text)))
        .collect();

    let category = item
        .snippet
        .category_id
        .as_ref()
        .and_then(|id| category_map.get(id))
        .cloned()
        .unwrap_or_else(|| "Other".to_owned());

    Some(EnrichedVideoRecord {
        video_id: item.id.clone(),
        title: item.snippet.title.clone(),
        description: item.snippet.description.clone(),
        publish_date: item.snippet.published_at,
        channel_id: item.snippet.channel_id.clone(),
        channel_title: item.snippet.channel_title.clone(),
        tags: item.snippet.tags.clone(),
        view_count,
        like_count: Statistics::count(item.statistics.like_count.as_deref()),
        comment_count: Statistics::count(item.statistics.comment_count.as_deref()),
        favorite_count: Statistics::count(item.statistics.favorite_count.as_deref()),
        duration_secs: item
            .content_details
            .duration
            .as_deref()
            .and_then(parse_iso8601_duration),
        definition: item.content_details.definition.clone(),
        category,
        default_language: item.snippet.default_language.clone(),
        default_audio_language: item.snippet.default_audio_language.clone(),
        keyword_flags,
    })
}
