//! Windowed, budget-bounded search collection.
//!
//! The search endpoint caps how many results one query can page through, so
//! the collector partitions the lookback range into one-year windows and
//! pages each window separately, newest first. The request budget is shared
//! across windows; when it runs out mid-history, older windows are never
//! observed in that run. Re-runs merge into the persisted collection with
//! new data winning on key collision, so collection is resumable across
//! invocations.

use std::collections::HashMap;

use chrono::{DateTime, Months, Utc};

use kanko_store::{merge_keyed_new_wins, DataRoot, SearchResultItem};

use crate::client::YouTubeClient;
use crate::error::YouTubeError;

/// Lookback when no lower publish bound is given: 10 years.
const DEFAULT_LOOKBACK_MONTHS: u32 = 120;

/// Partition `[lower, now]` into successive one-year windows, most recent
/// first. The oldest window is clamped to `lower`. Empty when
/// `lower >= now`.
#[must_use]
pub fn year_windows(
    lower: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Vec<(DateTime<Utc>, DateTime<Utc>)> {
    let mut windows = Vec::new();
    let mut end = now;
    while end > lower {
        let start = end
            .checked_sub_months(Months::new(12))
            .filter(|start| *start > lower)
            .unwrap_or(lower);
        windows.push((start, end));
        end = start;
    }
    windows
}

/// Collect the unique search results for `query` published in
/// `[after, now]`, spending at most `max_requests` paged API calls.
///
/// Results are merged into a map keyed by video id, which makes the merge
/// idempotent and order-independent within a run. A window with zero
/// results still consumes exactly one request.
///
/// # Errors
///
/// Propagates any [`YouTubeError`] from the client; there is no retry.
pub async fn collect_windowed_search(
    client: &YouTubeClient,
    query: &str,
    max_requests: u32,
    after: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<Vec<SearchResultItem>, YouTubeError> {
    let lower = after.unwrap_or_else(|| {
        now.checked_sub_months(Months::new(DEFAULT_LOOKBACK_MONTHS))
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    });

    let mut remaining = max_requests;
    let mut collected: HashMap<String, SearchResultItem> = HashMap::new();

    'windows: for (start, end) in year_windows(lower, now) {
        let mut page_token: Option<String> = None;
        loop {
            if remaining == 0 {
                tracing::info!(query, collected = collected.len(), "request budget exhausted");
                break 'windows;
            }
            let page = client
                .search_page(query, Some(start), Some(end), page_token.as_deref())
                .await?;
            remaining -= 1;

            for item in page.items {
                let Some(video_id) = item.id.video_id else {
                    continue;
                };
                collected.insert(
                    video_id.clone(),
                    SearchResultItem {
                        video_id,
                        title: item.snippet.title,
                        description: item.snippet.description,
                        published_at: item.snippet.published_at,
                        query: query.to_owned(),
                    },
                );
            }

            page_token = page.next_page_token;
            if page_token.is_none() {
                break;
            }
        }
        tracing::info!(
            query,
            window_start = %start,
            window_end = %end,
            requests_used = max_requests - remaining,
            collected = collected.len(),
            "window exhausted"
        );
    }

    Ok(collected.into_values().collect())
}

/// Merge freshly collected results into the persisted collection (new data
/// wins on key collision) and sort by publish timestamp descending.
#[must_use]
pub(crate) fn merge_and_sort(
    existing: Vec<SearchResultItem>,
    fresh: Vec<SearchResultItem>,
) -> Vec<SearchResultItem> {
    let mut merged = merge_keyed_new_wins(existing, fresh, |item| item.video_id.clone());
    merged.sort_by(|a, b| b.published_at.cmp(&a.published_at));
    merged
}

/// Run one search collection for `query` and persist the merged result as
/// the complete table for that query.
///
/// Returns the number of unique results persisted.
///
/// # Errors
///
/// Propagates API failures ([`YouTubeError`]) and persistence failures
/// ([`YouTubeError::Store`]).
pub async fn run_search(
    client: &YouTubeClient,
    root: &DataRoot,
    query: &str,
    max_requests: u32,
    after: Option<DateTime<Utc>>,
) -> Result<usize, YouTubeError> {
    tracing::info!(query, max_requests, "fetching search results");
    let fresh = collect_windowed_search(client, query, max_requests, after, Utc::now()).await?;
    let existing = root.load_search_results(query)?;
    let merged = merge_and_sort(existing, fresh);
    root.save_search_results(query, &merged)?;
    tracing::info!(query, count = merged.len(), "saved unique search results");
    Ok(merged.len())
}
