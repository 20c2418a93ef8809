use thiserror::Error;

/// Errors from the warehouse loader.
#[derive(Debug, Error)]
pub enum BigQueryError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API returned a non-success status with a message.
    #[error("BigQuery API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// The query job itself reported errors.
    #[error("query job failed: {message}")]
    JobFailed { message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read SQL template {path}: {source}")]
    TemplateIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid base URL: {0}")]
    InvalidBaseUrl(String),
}
