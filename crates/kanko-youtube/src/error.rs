use thiserror::Error;

/// Errors from the YouTube Data API client and the pipeline steps built on
/// it.
#[derive(Debug, Error)]
pub enum YouTubeError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status.
    #[error("YouTube API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// A configured keyword list produced an invalid match pattern.
    #[error("invalid keyword pattern: {0}")]
    KeywordPattern(#[from] regex::Error),

    /// Persistence failure in one of the hand-off tables.
    #[error(transparent)]
    Store(#[from] kanko_store::StoreError),
}

/// Errors from the transcript collaborator. `NotFound` and `Disabled` are
/// deliberately distinct conditions; both degrade to dropping the video.
#[derive(Debug, Error)]
pub enum TranscriptError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid transcript base URL: {0}")]
    InvalidBaseUrl(String),

    /// No transcript exists in any requested or fallback language.
    #[error("no transcript found for {video_id}")]
    NotFound { video_id: String },

    /// The video has transcripts turned off entirely.
    #[error("transcripts are disabled for {video_id}")]
    Disabled { video_id: String },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}
