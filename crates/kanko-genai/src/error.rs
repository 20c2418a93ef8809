use thiserror::Error;

/// Errors from the generative-language-model client.
#[derive(Debug, Error)]
pub enum GenAiError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status with a message.
    #[error("generation API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The model answered without any usable candidate text.
    #[error("model {model} returned no candidate text")]
    EmptyResponse { model: String },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
