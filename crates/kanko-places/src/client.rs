//! HTTP client for the nearby-search endpoint.
//!
//! The endpoint answers HTTP 200 with an envelope-level `status` field;
//! anything other than `OK` or `ZERO_RESULTS` is surfaced as
//! [`PlacesError::Api`]. Continuation tokens are not valid immediately after
//! issuance, so callers must pause before requesting the next page.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::types::{NearbySearchResponse, PlaceCandidate};

const DEFAULT_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place/nearbysearch/json";

/// One page of nearby-search results plus its continuation token.
pub(crate) struct NearbyPage {
    pub results: Vec<PlaceCandidate>,
    pub next_page_token: Option<String>,
}

/// Client for paged nearby search.
pub struct NearbySearchClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl NearbySearchClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the client cannot be constructed or
    /// [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let base_url = Url::parse(base_url)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches one page of nearby results. A continuation request carries
    /// only the token (plus the key); the original location parameters are
    /// encoded in the token itself.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] on a non-success HTTP or envelope status.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body does not match the
    ///   expected shape.
    pub(crate) async fn nearby_page(
        &self,
        center: (f64, f64),
        radius: u32,
        place_type: Option<&str>,
        page_token: Option<&str>,
    ) -> Result<NearbyPage, PlacesError> {
        let mut url = self.base_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("key", &self.api_key);
            if let Some(token) = page_token {
                pairs.append_pair("pagetoken", token);
            } else {
                pairs.append_pair("location", &format!("{},{}", center.0, center.1));
                pairs.append_pair("radius", &radius.to_string());
                if let Some(t) = place_type {
                    pairs.append_pair("type", t);
                }
            }
        }

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(PlacesError::Api {
                status: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        let parsed: NearbySearchResponse =
            serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
                context: format!("nearby search (type={place_type:?})"),
                source: e,
            })?;

        if parsed.status != "OK" && parsed.status != "ZERO_RESULTS" {
            return Err(PlacesError::Api {
                status: parsed.status,
                message: "nearby search rejected".to_owned(),
            });
        }

        Ok(NearbyPage {
            results: parsed.results,
            next_page_token: parsed.next_page_token,
        })
    }

    /// Fetches up to `max_pages` pages for one category filter, pausing
    /// `page_delay_secs` before each continuation request.
    ///
    /// # Errors
    ///
    /// Propagates the first page failure; pages already fetched are
    /// discarded.
    pub async fn fetch_category(
        &self,
        center: (f64, f64),
        radius: u32,
        place_type: Option<&str>,
        max_pages: u32,
        page_delay_secs: u64,
    ) -> Result<Vec<PlaceCandidate>, PlacesError> {
        let mut results = Vec::new();
        let mut page_token: Option<String> = None;
        let mut pages_fetched = 0u32;

        loop {
            if page_token.is_some() {
                // The continuation token needs a moment to become valid.
                tokio::time::sleep(Duration::from_secs(page_delay_secs)).await;
            }
            let page = self
                .nearby_page(center, radius, place_type, page_token.as_deref())
                .await?;
            results.extend(page.results);
            pages_fetched += 1;

            page_token = page.next_page_token;
            if page_token.is_none() || pages_fetched >= max_pages {
                break;
            }
        }

        tracing::info!(
            place_type = place_type.unwrap_or("no type"),
            results = results.len(),
            pages = pages_fetched,
            "nearby search category complete"
        );
        Ok(results)
    }
}
