use thiserror::Error;

/// Errors from the places clients and pipeline steps.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with an error status (HTTP or envelope-level).
    #[error("Places API error (status {status}): {message}")]
    Api { status: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// Persistence failure in one of the hand-off tables.
    #[error(transparent)]
    Store(#[from] kanko_store::StoreError),
}
