mod app_config;
mod config;
mod keywords;

pub use app_config::AppConfig;
pub use config::{load_app_config, load_app_config_from_env};
pub use keywords::{KeywordConfig, KeywordPaths};

use thiserror::Error;

/// Configuration-loading errors. All of these are fatal and raised before
/// any network call is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("invalid environment variable {var}: {reason}")]
    InvalidEnvVar { var: String, reason: String },

    #[error("failed to read keyword config file {path}: {source}")]
    KeywordsFileIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse keyword config file: {0}")]
    KeywordsFileParse(#[from] serde_yaml::Error),

    #[error("keyword config validation failed: {0}")]
    Validation(String),
}
