//! Per-place detail fetch from the v1 places endpoint.

use std::time::Duration;

use reqwest::{Client, Url};

use crate::error::PlacesError;

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1/places/";

/// Field mask for the detail payload; includes embedded reviews.
const FIELD_MASK: &str = "id,displayName,formattedAddress,location,\
regularOpeningHours,rating,userRatingCount,\
reviews,types,priceLevel,editorialSummary";

/// Client for per-id detail lookup. The payload is kept as raw JSON and
/// persisted verbatim; flattening happens later in the cleaner.
pub struct PlaceDetailsClient {
    client: Client,
    api_key: String,
    base_url: Url,
}

impl PlaceDetailsClient {
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
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
        })
    }

    /// Fetches the full detail payload for one place id.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Api`] on any non-success status. Callers treat this
    ///   as fatal for the whole batch: no partial persistence, no retry.
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::Deserialize`] if the body is not valid JSON.
    pub async fn fetch_detail(&self, place_id: &str) -> Result<serde_json::Value, PlacesError> {
        let url = self
            .base_url
            .join(place_id)
            .map_err(|e| PlacesError::InvalidBaseUrl(format!("{place_id}: {e}")))?;

        let response = self
            .client
            .get(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .header(reqwest::header::ACCEPT_LANGUAGE, "ja")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(PlacesError::Api {
                status: status.as_u16().to_string(),
                message: body.chars().take(200).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| PlacesError::Deserialize {
            context: format!("place detail (id={place_id})"),
            source: e,
        })
    }
}
