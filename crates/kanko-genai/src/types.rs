use serde::{Deserialize, Serialize};

/// Decoding parameters for one generation call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    /// The fixed decoding parameters used by every report call; only the
    /// token budget varies per call.
    #[must_use]
    pub fn strategy(max_output_tokens: u32) -> Self {
        Self {
            temperature: 0.4,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens,
        }
    }
}

#[derive(Serialize)]
pub(crate) struct GenerateRequest<'a> {
    pub contents: Vec<Content<'a>>,
    #[serde(rename = "generationConfig")]
    pub generation_config: &'a GenerationConfig,
}

#[derive(Serialize)]
pub(crate) struct Content<'a> {
    pub parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
pub(crate) struct Part<'a> {
    pub text: &'a str,
}

#[derive(Deserialize)]
pub(crate) struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Deserialize)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
pub(crate) struct CandidatePart {
    #[serde(default)]
    pub text: String,
}
