//! HTTP client for the crawl API.
//!
//! Covers the three endpoints the poller and CLI need:
//! - `GET  /api/v1/crawl-runs/{run_id}/status` - current [`RunStatus`]
//! - `POST /api/v1/tasks/{job_id}/cancel` - cancel the job behind a run
//! - `POST /api/v1/crawl-runs` - start a new crawl

mod error;
mod job_id;
mod parser;

pub use error::ClientError;
pub use job_id::{normalize_job_id, JOB_ID_PREFIX};
pub use parser::{error_message, parse_run_status};

use crate::config::ApiConfig;
use crate::poller::StatusSource;
use crate::status::RunStatus;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::{Client, Url};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Body of a start-crawl request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCrawlRequest {
    pub website_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_pages: Option<u32>,
}

/// Response to a start-crawl request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StartCrawlResponse {
    pub run_id: String,
}

/// Client for the crawl API with connection pooling.
#[derive(Debug, Clone)]
pub struct CrawlApiClient {
    client: Client,
    base_url: Url,
    timeout_seconds: u64,
}

impl CrawlApiClient {
    /// Build a client from configuration.
    ///
    /// When `token_env` names a set environment variable its value is sent as
    /// a bearer token on every request.
    pub fn new(config: &ApiConfig) -> Result<Self, ClientError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = config.token() {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|e| ClientError::Configuration(format!("invalid API token: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .default_headers(headers)
            .build()
            .map_err(|e| ClientError::Configuration(e.to_string()))?;

        Self::with_client(config, client)
    }

    /// Create a client around an existing HTTP client (for testing).
    pub fn with_client(config: &ApiConfig, client: Client) -> Result<Self, ClientError> {
        let base_url = config.url().map_err(ClientError::Configuration)?;
        Ok(Self {
            client,
            base_url,
            timeout_seconds: config.timeout_seconds,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Fetch the current status of a run.
    pub async fn get_run_status(&self, run_id: &str) -> Result<RunStatus, ClientError> {
        let url = self.endpoint(&["api", "v1", "crawl-runs", check_id(run_id)?, "status"])?;
        let body = self.send(self.client.get(url)).await?;
        parser::parse_run_status(&body)
    }

    /// Ask the server to cancel the job behind `run_id`.
    ///
    /// Accepts either a bare run id or a job id; the id is normalized first.
    pub async fn cancel_job(&self, run_id: &str) -> Result<String, ClientError> {
        let job_id = normalize_job_id(check_id(run_id)?);
        let url = self.endpoint(&["api", "v1", "tasks", &job_id, "cancel"])?;
        self.send(self.client.post(url)).await?;
        tracing::info!(run_id = %run_id, job_id = %job_id, "Cancellation requested");
        Ok(job_id)
    }

    /// Start a new crawl run.
    pub async fn start_crawl(
        &self,
        request: &StartCrawlRequest,
    ) -> Result<StartCrawlResponse, ClientError> {
        let url = self.endpoint(&["api", "v1", "crawl-runs"])?;
        let body = self.send(self.client.post(url).json(request)).await?;
        let response: StartCrawlResponse = serde_json::from_str(&body)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        tracing::info!(
            run_id = %response.run_id,
            website_url = %request.website_url,
            "Crawl started"
        );
        Ok(response)
    }

    /// Append path segments to the base URL, percent-encoding each one.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.set_query(None);
        url.set_fragment(None);
        url.path_segments_mut()
            .map_err(|_| {
                ClientError::Configuration(format!("'{}' cannot be a base URL", self.base_url))
            })?
            .pop_if_empty()
            .extend(segments.iter().copied());
        Ok(url)
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, ClientError> {
        let response = request
            .send()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout_seconds))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ClientError::from_reqwest(e, self.timeout_seconds))?;

        if !status.is_success() {
            let error = parser::status_error(status, &body);
            tracing::debug!(status = status.as_u16(), error = %error, "API request failed");
            return Err(error);
        }

        Ok(body)
    }
}

/// Ids are opaque but must survive as one path segment.
///
/// Empty, `.` and `..` ids would be dropped or resolved away by URL path
/// normalization and address a different endpoint.
fn check_id(id: &str) -> Result<&str, ClientError> {
    match id {
        "" | "." | ".." => Err(ClientError::InvalidId(id.to_string())),
        _ => Ok(id),
    }
}

#[async_trait]
impl StatusSource for CrawlApiClient {
    async fn fetch_status(&self, run_id: &str) -> Result<RunStatus, ClientError> {
        self.get_run_status(run_id).await
    }
}
