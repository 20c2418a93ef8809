use std::path::PathBuf;

use crate::ConfigError;

/// Process-wide configuration, built once at startup and threaded into each
/// component's entry point.
///
/// API credentials are optional at load time; each command that needs one
/// calls the corresponding `require_*` accessor, which turns an absent
/// credential into a fatal [`ConfigError::MissingEnvVar`] before any network
/// call is made.
#[derive(Clone)]
pub struct AppConfig {
    pub youtube_api_key: Option<String>,
    pub maps_api_key: Option<String>,
    pub genai_api_key: Option<String>,
    pub gcp_project_id: Option<String>,
    pub bq_dataset: Option<String>,
    pub gcs_bucket: Option<String>,
    pub bq_access_token: Option<String>,

    /// Base directory under which `data/raw`, `data/processed` and `outputs`
    /// live.
    pub data_root: PathBuf,
    pub log_level: String,

    /// Center coordinate of the locality under analysis.
    pub center_lat: f64,
    pub center_lng: f64,

    pub http_timeout_secs: u64,
    pub user_agent: String,
    /// Delay before using a nearby-search continuation token; the token is
    /// not valid immediately after issuance.
    pub place_page_delay_secs: u64,
    /// Bounds of the randomized pause before each transcript fetch.
    pub caption_delay_min_secs: u64,
    pub caption_delay_max_secs: u64,

    /// Model used for per-caption summaries.
    pub genai_fast_model: String,
    /// Model used for the aggregate strategy reports.
    pub genai_pro_model: String,

    pub keyword_paths: crate::KeywordPaths,
}

impl AppConfig {
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `YOUTUBE_API_KEY` is unset.
    pub fn require_youtube_api_key(&self) -> Result<&str, ConfigError> {
        require(self.youtube_api_key.as_deref(), "YOUTUBE_API_KEY")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `GOOGLE_MAPS_API_KEY` is unset.
    pub fn require_maps_api_key(&self) -> Result<&str, ConfigError> {
        require(self.maps_api_key.as_deref(), "GOOGLE_MAPS_API_KEY")
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] if `GEMINI_API_KEY` is unset.
    pub fn require_genai_api_key(&self) -> Result<&str, ConfigError> {
        require(self.genai_api_key.as_deref(), "GEMINI_API_KEY")
    }

    /// Returns `(project_id, dataset, bucket, access_token)` for a warehouse
    /// run.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] naming the first missing
    /// warehouse variable.
    pub fn require_warehouse(&self) -> Result<(&str, &str, &str, &str), ConfigError> {
        Ok((
            require(self.gcp_project_id.as_deref(), "GCP_PROJECT_ID")?,
            require(self.bq_dataset.as_deref(), "BQ_DATASET")?,
            require(self.gcs_bucket.as_deref(), "GCS_BUCKET")?,
            require(self.bq_access_token.as_deref(), "KANKO_BQ_ACCESS_TOKEN")?,
        ))
    }
}

fn require<'a>(value: Option<&'a str>, var: &str) -> Result<&'a str, ConfigError> {
    value.ok_or_else(|| ConfigError::MissingEnvVar(var.to_owned()))
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "youtube_api_key",
                &self.youtube_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "maps_api_key",
                &self.maps_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field(
                "genai_api_key",
                &self.genai_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gcp_project_id", &self.gcp_project_id)
            .field("bq_dataset", &self.bq_dataset)
            .field("gcs_bucket", &self.gcs_bucket)
            .field(
                "bq_access_token",
                &self.bq_access_token.as_ref().map(|_| "[redacted]"),
            )
            .field("data_root", &self.data_root)
            .field("log_level", &self.log_level)
            .field("center_lat", &self.center_lat)
            .field("center_lng", &self.center_lng)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("place_page_delay_secs", &self.place_page_delay_secs)
            .field("caption_delay_min_secs", &self.caption_delay_min_secs)
            .field("caption_delay_max_secs", &self.caption_delay_max_secs)
            .field("genai_fast_model", &self.genai_fast_model)
            .field("genai_pro_model", &self.genai_pro_model)
            .field("keyword_paths", &self.keyword_paths)
            .finish()
    }
}
