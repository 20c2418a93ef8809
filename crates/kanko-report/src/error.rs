use thiserror::Error;

/// Errors from the report generators.
#[derive(Debug, Error)]
pub enum ReportError {
    #[error(transparent)]
    GenAi(#[from] kanko_genai::GenAiError),

    #[error(transparent)]
    Store(#[from] kanko_store::StoreError),

    #[error("invalid caption-cleaning pattern: {0}")]
    Pattern(#[from] regex::Error),
}
