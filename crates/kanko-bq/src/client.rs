//! Blocking query execution against the BigQuery REST API.

use std::time::Duration;

use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::BigQueryError;

const DEFAULT_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2/";

/// How long one `jobs.query` / `getQueryResults` call waits server-side
/// before answering with `jobComplete: false`.
const QUERY_TIMEOUT_MS: u64 = 60_000;

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(rename = "jobComplete", default)]
    job_complete: bool,
    #[serde(rename = "jobReference")]
    job_reference: Option<JobReference>,
    #[serde(default)]
    errors: Vec<JobError>,
}

#[derive(Debug, Deserialize)]
struct JobReference {
    #[serde(rename = "jobId")]
    job_id: String,
}

#[derive(Debug, Deserialize)]
struct JobError {
    #[serde(default)]
    message: String,
}

/// Client for submitting SQL query jobs and blocking until they finish.
pub struct BigQueryClient {
    client: Client,
    project_id: String,
    access_token: String,
    base_url: Url,
}

impl BigQueryClient {
    /// Creates a new client pointed at the production API.
    ///
    /// # Errors
    ///
    /// Returns [`BigQueryError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(
        project_id: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
    ) -> Result<Self, BigQueryError> {
        Self::with_base_url(project_id, access_token, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a new client with a custom base URL (for testing with
    /// wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`BigQueryError::Http`] if the client cannot be constructed
    /// or [`BigQueryError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        project_id: &str,
        access_token: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, BigQueryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised)
            .map_err(|e| BigQueryError::InvalidBaseUrl(format!("{base_url}: {e}")))?;
        Ok(Self {
            client,
            project_id: project_id.to_owned(),
            access_token: access_token.to_owned(),
            base_url,
        })
    }

    /// Submits `sql` as a query job and blocks until it completes or fails.
    ///
    /// # Errors
    ///
    /// - [`BigQueryError::Api`] on a non-success HTTP status.
    /// - [`BigQueryError::JobFailed`] if the job reports errors.
    /// - [`BigQueryError::Http`] / [`BigQueryError::Deserialize`] on
    ///   transport or payload failures.
    pub async fn run_query(&self, sql: &str) -> Result<(), BigQueryError> {
        let url = self
            .base_url
            .join(&format!("projects/{}/queries", self.project_id))
            .map_err(|e| BigQueryError::InvalidBaseUrl(e.to_string()))?;

        let body = serde_json::json!({
            "query": sql,
            "useLegacySql": false,
            "timeoutMs": QUERY_TIMEOUT_MS,
        });

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        let mut result = Self::parse_response(response, "jobs.query").await?;

        // The server may answer before the job finishes; keep polling the
        // job until it reports completion.
        while !result.job_complete {
            let Some(job_id) = result.job_reference.as_ref().map(|r| r.job_id.clone()) else {
                return Err(BigQueryError::JobFailed {
                    message: "incomplete job without a job reference".to_owned(),
                });
            };
            let mut url = self
                .base_url
                .join(&format!("projects/{}/queries/{job_id}", self.project_id))
                .map_err(|e| BigQueryError::InvalidBaseUrl(e.to_string()))?;
            url.query_pairs_mut()
                .append_pair("timeoutMs", &QUERY_TIMEOUT_MS.to_string());

            let response = self
                .client
                .get(url)
                .bearer_auth(&self.access_token)
                .send()
                .await?;
            result = Self::parse_response(response, "getQueryResults").await?;
        }

        if !result.errors.is_empty() {
            let message = result
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(BigQueryError::JobFailed { message });
        }

        Ok(())
    }

    async fn parse_response(
        response: reqwest::Response,
        context: &str,
    ) -> Result<QueryResponse, BigQueryError> {
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
            return Err(BigQueryError::Api {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&body).map_err(|e| BigQueryError::Deserialize {
            context: context.to_owned(),
            source: e,
        })
    }
}
