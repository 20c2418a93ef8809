//! Client for the timedtext transcript endpoint.
//!
//! Tracks are fetched per language in `fmt=json3`; when no manual track
//! exists in any preferred language, the same languages are retried as
//! automatically generated (`kind=asr`) tracks. A 403 means the video has
//! transcripts turned off, which is a distinct condition from "no track in
//! these languages".

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::TranscriptError;

const DEFAULT_BASE_URL: &str = "https://video.google.com/timedtext";

#[derive(Debug, Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Debug, Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Debug, Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

/// Client for per-video transcript lookup with language fallback.
pub struct TranscriptClient {
    client: Client,
    base_url: Url,
}

impl TranscriptClient {
    /// # Errors
    ///
    /// Returns [`TranscriptError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, TranscriptError> {
        Self::with_base_url(timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// # Errors
    ///
    /// Returns [`TranscriptError::Http`] if the client cannot be constructed
    /// or `base_url` is invalid.
    pub fn with_base_url(
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, TranscriptError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| TranscriptError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self { client, base_url })
    }

    /// Fetches the transcript for `video_id`, preferring a manual track in
    /// the given language order, then an automatically generated track in
    /// the same order.
    ///
    /// # Errors
    ///
    /// - [`TranscriptError::Disabled`] if the video has transcripts turned
    ///   off.
    /// - [`TranscriptError::NotFound`] if no requested or fallback language
    ///   has a track.
    /// - [`TranscriptError::Http`] / [`TranscriptError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn fetch(
        &self,
        video_id: &str,
        languages: &[String],
    ) -> Result<String, TranscriptError> {
        for asr in [false, true] {
            for lang in languages {
                match self.fetch_track(video_id, lang, asr).await? {
                    Some(text) if !text.is_empty() => return Ok(text),
                    _ => {}
                }
            }
        }
        Err(TranscriptError::NotFound {
            video_id: video_id.to_owned(),
        })
    }

    /// Fetches a single track. `Ok(None)` means the track does not exist in
    /// this language/kind combination.
    async fn fetch_track(
        &self,
        video_id: &str,
        lang: &str,
        asr: bool,
    ) -> Result<Option<String>, TranscriptError> {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("v", video_id);
            pairs.append_pair("lang", lang);
            pairs.append_pair("fmt", "json3");
            if asr {
                pairs.append_pair("kind", "asr");
            }
        }

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN {
            return Err(TranscriptError::Disabled {
                video_id: video_id.to_owned(),
            });
        }
        if status == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status()?;

        let body = response.text().await?;
        if body.trim().is_empty() {
            // The endpoint answers 200 with an empty body for missing tracks.
            return Ok(None);
        }

        let parsed: TimedTextResponse =
            serde_json::from_str(&body).map_err(|e| TranscriptError::Deserialize {
                context: format!("timedtext(v={video_id}, lang={lang}, asr={asr})"),
                source: e,
            })?;

        Ok(Some(join_segments(&parsed)))
    }
}

fn join_segments(response: &TimedTextResponse) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for event in &response.events {
        for seg in &event.segs {
            let text = seg.utf8.trim();
            if !text.is_empty() {
                parts.push(text);
            }
        }
    }
    parts.join(" ")
}
