//! HTTP client for the generative-language-model endpoint.

mod client;
mod error;
mod types;

pub use client::GenAiClient;
pub use error::GenAiError;
pub use types::GenerationConfig;
