//! Transcript fetching for the highest-engagement videos.
//!
//! The transcript collaborator is sensitive to burst request patterns, so
//! fetches run strictly sequentially with a randomized pause before each
//! one. Videos without an obtainable transcript are dropped entirely rather
//! than kept with an empty caption.

use std::time::Duration;

use kanko_store::{CaptionedVideoRecord, DataRoot};

use crate::error::{TranscriptError, YouTubeError};
use crate::transcript::TranscriptClient;

#[derive(Debug, Clone)]
pub struct CaptionParams {
    /// Fetch budget: only the top-N records by view count are attempted.
    pub max_fetches: usize,
    /// Language preference order, e.g. `["ja", "en"]`.
    pub languages: Vec<String>,
    /// Bounds of the uniformly random pause before each fetch, in seconds.
    pub delay_min_secs: u64,
    pub delay_max_secs: u64,
}

/// Fetch transcripts for the top videos by view count and persist the
/// captioned table (overwritten wholesale each run).
///
/// Returns the number of records persisted with a caption.
///
/// # Errors
///
/// Returns [`YouTubeError::Store`] on table load/save failure. Per-video
/// transcript failures of any kind degrade to dropping the video and never
/// abort the run.
pub async fn run_captions(
    transcripts: &TranscriptClient,
    root: &DataRoot,
    params: &CaptionParams,
) -> Result<usize, YouTubeError> {
    let mut videos = root.load_video_details()?;
    videos.sort_by(|a, b| b.view_count.cmp(&a.view_count));
    videos.truncate(params.max_fetches);
    tracing::info!(count = videos.len(), "fetching captions for top-viewed videos");

    let mut captioned = Vec::new();
    for video in videos {
        pace(params.delay_min_secs, params.delay_max_secs).await;

        match transcripts.fetch(&video.video_id, &params.languages).await {
            Ok(caption) => captioned.push(CaptionedVideoRecord { video, caption }),
            Err(TranscriptError::NotFound { video_id }) => {
                tracing::warn!(video_id, languages = ?params.languages, "no transcript found");
            }
            Err(TranscriptError::Disabled { video_id }) => {
                tracing::warn!(video_id, "transcripts disabled");
            }
            Err(e) => {
                tracing::warn!(video_id = %video.video_id, error = %e, "caption fetch failed");
            }
        }
    }

    root.save_captions(&captioned)?;
    tracing::info!(count = captioned.len(), "saved videos with captions");
    Ok(captioned.len())
}

/// Sleep for a uniformly random duration in `[min_secs, max_secs]`.
#[allow(clippy::cast_precision_loss)]
async fn pace(min_secs: u64, max_secs: u64) {
    let secs = {
        let mut rng = rand::rng();
        rand::Rng::random_range(&mut rng, min_secs as f64..=max_secs as f64)
    };
    tokio::time::sleep(Duration::from_secs_f64(secs)).await;
}
