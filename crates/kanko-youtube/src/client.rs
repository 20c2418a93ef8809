//! HTTP client for the YouTube Data API v3.
//!
//! Wraps `reqwest` with API-key management and typed response
//! deserialization. Non-success statuses surface the API's error message as
//! [`YouTubeError::Api`]; there is no retry, so any transient failure
//! propagates and aborts the run.

use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Client, Url};

use crate::error::YouTubeError;
use crate::types::{SearchListResponse, SearchPage, VideoItem, VideoListResponse};

const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/youtube/v3/";

/// Page size fixed by the search endpoint's maximum.
pub(crate) const SEARCH_PAGE_SIZE: u32 = 50;

/// Maximum number of ids per `videos` lookup call.
pub(crate) const DETAILS_BATCH_SIZE: usize = 50;

/// Client for the YouTube Data API.
///
/// Use [`YouTubeClient::new`] for production or
/// [`YouTubeClient::with_base_url`] to point at a mock server in tests.
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl YouTubeClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, YouTubeError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`YouTubeError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`YouTubeError::Api`] if `base_url` is not a
    /// valid URL.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, YouTubeError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| YouTubeError::Api {
            status: 0,
            message: format!("invalid base URL '{base_url}': {e}"),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches one page of video search results, newest first within the
    /// given publish window, tagged with the opaque continuation token for
    /// the next page.
    ///
    /// # Errors
    ///
    /// - [`YouTubeError::Api`] if the API returns a non-success status.
    /// - [`YouTubeError::Http`] on network failure.
    /// - [`YouTubeError::Deserialize`] if the response does not match the
    ///   expected shape.
    pub async fn search_page(
        &self,
        query: &str,
        published_after: Option<DateTime<Utc>>,
        published_before: Option<DateTime<Utc>>,
        page_token: Option<&str>,
    ) -> Result<SearchPage, YouTubeError> {
        let mut params: Vec<(&str, String)> = vec![
            ("part", "id,snippet".to_owned()),
            ("type", "video".to_owned()),
            ("order", "date".to_owned()),
            ("maxResults", SEARCH_PAGE_SIZE.to_string()),
            ("q", query.to_owned()),
        ];
        if let Some(after) = published_after {
            params.push(("publishedAfter", rfc3339(after)));
        }
        if let Some(before) = published_before {
            params.push(("publishedBefore", rfc3339(before)));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_owned()));
        }

        let url = self.build_url("search", &params);
        let body = self.request_json(&url).await?;
        let response: SearchListResponse =
            serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                context: format!("search(q={query})"),
                source: e,
            })?;

        Ok(SearchPage {
            items: response.items,
            next_page_token: response.next_page_token,
        })
    }

    /// Fetches statistics and metadata for the given video ids, batched into
    /// lookup calls of at most [`DETAILS_BATCH_SIZE`] ids each.
    ///
    /// # Errors
    ///
    /// Same conditions as [`YouTubeClient::search_page`]; a failure in any
    /// batch aborts the whole lookup.
    pub async fn video_details(&self, video_ids: &[String]) -> Result<Vec<VideoItem>, YouTubeError> {
        let mut all_items = Vec::with_capacity(video_ids.len());

        for chunk in video_ids.chunks(DETAILS_BATCH_SIZE) {
            let params: Vec<(&str, String)> = vec![
                ("part", "snippet,contentDetails,statistics".to_owned()),
                ("id", chunk.join(",")),
            ];
            let url = self.build_url("videos", &params);
            let body = self.request_json(&url).await?;
            let response: VideoListResponse =
                serde_json::from_value(body).map_err(|e| YouTubeError::Deserialize {
                    context: format!("videos(ids={})", chunk.len()),
                    source: e,
                })?;
            all_items.extend(response.items);
        }

        Ok(all_items)
    }

    fn build_url(&self, endpoint: &str, params: &[(&str, String)]) -> Url {
        // The base URL always ends in a slash, so join appends the endpoint
        // as a path segment.
        let mut url = self
            .base_url
            .join(endpoint)
            .unwrap_or_else(|_| self.base_url.clone());
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            for (k, v) in params {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    async fn request_json(&self, url: &Url) -> Result<serde_json::Value, YouTubeError> {
        let response = self.client.get(url.clone()).send().await?;
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
            return Err(YouTubeError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| YouTubeError::Deserialize {
            context: url.path().to_owned(),
            source: e,
        })
    }
}

fn rfc3339(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Secs, true)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn test_client(base_url: &str) -> YouTubeClient {
        YouTubeClient::with_base_url("test-key", 30, "kanko-test/0.1", base_url)
            .expect("client construction should not fail")
    }

    #[test]
    fn build_url_appends_key_and_params() {
        let client = test_client("https://youtube.example.com/v3");
        let url = client.build_url("search", &[("q", "川越".to_owned())]);
        assert!(url.as_str().starts_with("https://youtube.example.com/v3/search?"));
        assert!(url.as_str().contains("key=test-key"));
        // Query values are percent-encoded by Url::query_pairs_mut.
        assert!(url.as_str().contains("q=%E5%B7%9D%E8%B6%8A"));
    }

    #[test]
    fn rfc3339_uses_utc_z_suffix() {
        let ts = Utc.with_ymd_and_hms(2023, 7, 1, 0, 0, 0).unwrap();
        assert_eq!(rfc3339(ts), "2023-07-01T00:00:00Z");
    }
}
