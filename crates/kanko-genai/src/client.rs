//! Synchronous text-generation calls with fixed decoding parameters.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::GenAiError;
use crate::types::{Content, GenerateRequest, GenerateResponse, GenerationConfig, Part};

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models/";

/// Client for the generative-language-model endpoint.
///
/// One call submits a text prompt plus decoding parameters and returns the
/// completed text synchronously. There is no retry; failures propagate.
pub struct GenAiClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl GenAiClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, GenAiError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`GenAiError::Http`] if the client cannot be constructed or
    /// [`GenAiError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, GenAiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| GenAiError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Submits `prompt` to `model` and returns the trimmed completion text.
    ///
    /// # Errors
    ///
    /// - [`GenAiError::Api`] if the API returns a non-success status.
    /// - [`GenAiError::EmptyResponse`] if no candidate carries any text.
    /// - [`GenAiError::Http`] / [`GenAiError::Deserialize`] on transport or
    ///   payload failures.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        config: &GenerationConfig,
    ) -> Result<String, GenAiError> {
        // Built by concatenation: the "model:generateContent" segment would
        // be misread as a URL scheme by a relative join.
        let url = Url::parse(&format!("{}{model}:generateContent", self.base_url))
            .map_err(|e| GenAiError::InvalidBaseUrl(format!("{model}: {e}")))?;

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt }],
            }],
            generation_config: config,
        };

        let response = self
            .client
            .post(url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&body)
                .ok()
                .and_then(|v| {
                    v.get("error")
                        .and_then(|e| e.get("message"))
                        .and_then(serde_json::Value::as_str)
                        .map(str::to_owned)
                })
                .unwrap_or_else(|| "unknown error".to_owned());
            return Err(GenAiError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&body).map_err(|e| GenAiError::Deserialize {
                context: format!("generateContent(model={model})"),
                source: e,
            })?;

        let text = parsed
            .candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
            .map(|p| p.text.as_str())
            .collect::<Vec<_>>()
            .join("");

        let text = text.trim();
        if text.is_empty() {
            return Err(GenAiError::EmptyResponse {
                model: model.to_owned(),
            });
        }
        Ok(text.to_owned())
    }
}
