//! The video strategy report.
//!
//! Raw captions are far too large to fit the aggregate prompt's budget, so
//! each video's caption is first summarized by a separate call to the fast
//! model; only the summaries enter the aggregate prompt submitted to the
//! pro model.

use std::path::PathBuf;

use kanko_genai::{GenAiClient, GenerationConfig};
use kanko_store::{CaptionedVideoRecord, DataRoot};

use crate::error::ReportError;
use crate::prompt::{
    aggregate_token_budget, caption_summary_prompt, strategy_header, summary_token_budget,
};
use crate::text::CaptionCleaner;

#[derive(Debug, Clone)]
pub struct VideoReportParams {
    /// Upper bound on the number of videos included.
    pub max_videos: usize,
    /// Character budget for the aggregate prompt's item blocks.
    pub max_chars: usize,
    pub fast_model: String,
    pub pro_model: String,
}

/// Generate and persist the video report. Returns the output path.
///
/// # Errors
///
/// Propagates generation and persistence failures; either aborts the run.
pub async fn run_video_report(
    genai: &GenAiClient,
    root: &DataRoot,
    params: &VideoReportParams,
) -> Result<PathBuf, ReportError> {
    let mut records = root.load_captions()?;
    records.sort_by(|a, b| b.video.view_count.cmp(&a.video.view_count));

    let cleaner = CaptionCleaner::new()?;
    let mut blocks: Vec<String> = Vec::new();
    let mut current_length = 0usize;

    for record in records.iter().take(params.max_videos) {
        let block = build_video_block(genai, &cleaner, record, &params.fast_model).await?;
        let block_len = block.chars().count();
        if current_length + block_len + 2 > params.max_chars {
            break;
        }
        current_length += block_len + 2;
        blocks.push(block);
    }

    let n_videos = blocks.len();
    tracing::info!(videos = n_videos, "generating video report");

    let prompt = format!(
        "{}{}",
        strategy_header("Youtubeのデータ", n_videos * 250),
        blocks.join("\n\n")
    );
    let report = genai
        .generate(
            &params.pro_model,
            &prompt,
            &GenerationConfig::strategy(aggregate_token_budget(n_videos)),
        )
        .await?;

    let path = root.save_video_report(&report)?;
    tracing::info!(path = %path.display(), "saved generated video report");
    Ok(path)
}

/// Build one video's block: a title/metrics header plus the summarized
/// caption produced by the secondary generation call.
async fn build_video_block(
    genai: &GenAiClient,
    cleaner: &CaptionCleaner,
    record: &CaptionedVideoRecord,
    fast_model: &str,
) -> Result<String, ReportError> {
    let caption = cleaner.clean(&record.caption);
    let title = record
        .video
        .title
        .split('#')
        .next()
        .unwrap_or_default()
        .trim();

    let summary = genai
        .generate(
            fast_model,
            &caption_summary_prompt(title, &caption),
            &GenerationConfig::strategy(summary_token_budget(caption.chars().count())),
        )
        .await?;

    let date = record
        .video
        .publish_date
        .map(|d| d.date_naive().to_string())
        .unwrap_or_default();

    Ok(format!(
        "『{title}』 (Views:{views}, Likes:{likes}, Date:{date})\n{summary}",
        views = record.video.view_count,
        likes = record.video.like_count,
    ))
}
