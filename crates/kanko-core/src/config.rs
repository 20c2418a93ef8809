use std::path::PathBuf;

use crate::app_config::AppConfig;
use crate::keywords::KeywordPaths;
use crate::ConfigError;

/// Load application configuration from environment variables.
///
/// Calls `dotenvy::dotenv().ok()` to load `.env` files before reading env vars.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value fails to parse.
pub fn load_app_config() -> Result<AppConfig, ConfigError> {
    dotenvy::dotenv().ok();
    load_app_config_from_env()
}

/// Load application configuration from environment variables already in the
/// process.
///
/// Unlike [`load_app_config`], this does NOT load `.env` files; useful for
/// testing or when the caller manages env setup.
///
/// # Errors
///
/// Returns `ConfigError` if a configured value fails to parse.
pub fn load_app_config_from_env() -> Result<AppConfig, ConfigError> {
    build_app_config(|key| std::env::var(key))
}

/// Build application configuration using the provided env-var lookup function.
///
/// This is the core parsing/validation logic, decoupled from the actual
/// environment so it can be tested with a pure `HashMap` lookup.
fn build_app_config<F>(lookup: F) -> Result<AppConfig, ConfigError>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let or_default = |var: &str, default: &str| -> String {
        lookup(var).unwrap_or_else(|_| default.to_string())
    };

    let parse_u64 = |var: &str, default: &str| -> Result<u64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let parse_f64 = |var: &str, default: &str| -> Result<f64, ConfigError> {
        let raw = or_default(var, default);
        raw.parse::<f64>().map_err(|e| ConfigError::InvalidEnvVar {
            var: var.to_string(),
            reason: e.to_string(),
        })
    };

    let youtube_api_key = lookup("YOUTUBE_API_KEY").ok();
    let maps_api_key = lookup("GOOGLE_MAPS_API_KEY").ok();
    let genai_api_key = lookup("GEMINI_API_KEY").ok();
    let gcp_project_id = lookup("GCP_PROJECT_ID").ok();
    let bq_dataset = lookup("BQ_DATASET").ok();
    let gcs_bucket = lookup("GCS_BUCKET").ok();
    let bq_access_token = lookup("KANKO_BQ_ACCESS_TOKEN").ok();

    let data_root = PathBuf::from(or_default("KANKO_DATA_ROOT", "."));
    let log_level = or_default("KANKO_LOG_LEVEL", "info");

    // Kawagoe city center; override per deployment locality.
    let center_lat = parse_f64("KANKO_CENTER_LAT", "35.9251")?;
    let center_lng = parse_f64("KANKO_CENTER_LNG", "139.4856")?;

    let http_timeout_secs = parse_u64("KANKO_HTTP_TIMEOUT_SECS", "30")?;
    let user_agent = or_default("KANKO_USER_AGENT", "kanko/0.1 (tourism-analytics)");
    let place_page_delay_secs = parse_u64("KANKO_PLACE_PAGE_DELAY_SECS", "2")?;
    let caption_delay_min_secs = parse_u64("KANKO_CAPTION_DELAY_MIN_SECS", "5")?;
    let caption_delay_max_secs = parse_u64("KANKO_CAPTION_DELAY_MAX_SECS", "15")?;

    if caption_delay_max_secs < caption_delay_min_secs {
        return Err(ConfigError::InvalidEnvVar {
            var: "KANKO_CAPTION_DELAY_MAX_SECS".to_string(),
            reason: format!(
                "must be >= KANKO_CAPTION_DELAY_MIN_SECS ({caption_delay_min_secs})"
            ),
        });
    }

    let genai_fast_model = or_default("KANKO_GENAI_FAST_MODEL", "gemini-2.5-flash");
    let genai_pro_model = or_default("KANKO_GENAI_PRO_MODEL", "gemini-2.5-pro");

    let keyword_paths = KeywordPaths {
        keywords: PathBuf::from(or_default("KANKO_KEYWORDS_PATH", "./config/keywords.yaml")),
        category_map: PathBuf::from(or_default(
            "KANKO_CATEGORY_MAP_PATH",
            "./config/youtube_category_map.yaml",
        )),
        keyword_rules: PathBuf::from(or_default(
            "KANKO_KEYWORD_RULES_PATH",
            "./config/tourism_keyword_rules.yaml",
        )),
    };

    Ok(AppConfig {
        youtube_api_key,
        maps_api_key,
        genai_api_key,
        gcp_project_id,
        bq_dataset,
        gcs_bucket,
        bq_access_token,
        data_root,
        log_level,
        center_lat,
        center_lng,
        http_timeout_secs,
        user_agent,
        place_page_delay_secs,
        caption_delay_min_secs,
        caption_delay_max_secs,
        genai_fast_model,
        genai_pro_model,
        keyword_paths,
    })
}
