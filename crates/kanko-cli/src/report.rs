//! Handlers for the report subcommands.

use kanko_core::AppConfig;
use kanko_genai::GenAiClient;
use kanko_report::{PlaceReportParams, VideoReportParams};
use kanko_store::DataRoot;

/// Column width of the place report's wrapped rendering.
const WRAP_WIDTH: usize = 100;

pub(crate) async fn run_video_report(
    config: &AppConfig,
    max_videos: usize,
    max_chars: usize,
) -> anyhow::Result<()> {
    let api_key = config.require_genai_api_key()?;
    let genai = GenAiClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let params = VideoReportParams {
        max_videos,
        max_chars,
        fast_model: config.genai_fast_model.clone(),
        pro_model: config.genai_pro_model.clone(),
    };
    let path = kanko_report::run_video_report(&genai, &root, &params).await?;
    println!("saved generated report to {}", path.display());
    Ok(())
}

pub(crate) async fn run_place_report(config: &AppConfig, max_places: usize) -> anyhow::Result<()> {
    let api_key = config.require_genai_api_key()?;
    let genai = GenAiClient::new(api_key, config.http_timeout_secs, &config.user_agent)?;
    let root = DataRoot::new(&config.data_root);

    let params = PlaceReportParams {
        max_places,
        pro_model: config.genai_pro_model.clone(),
        wrap_width: WRAP_WIDTH,
    };
    let (text_path, wrapped_path) =
        kanko_report::run_place_report(&genai, &root, &params).await?;
    println!("saved generated report to {}", text_path.display());
    println!("saved wrapped rendering to {}", wrapped_path.display());
    Ok(())
}
