//! Shared test utilities for crawlwatch integration tests.

#![allow(dead_code)]

use crawlwatch::client::CrawlApiClient;
use crawlwatch::config::{ApiConfig, BackoffPhase, PollerConfig};
use serde_json::{json, Value};

/// Status endpoint path for a run.
pub fn status_path(run_id: &str) -> String {
    format!("/api/v1/crawl-runs/{}/status", run_id)
}

/// A valid status payload.
pub fn status_body(run_id: &str, state: &str, progress: f64) -> Value {
    json!({
        "id": run_id,
        "status": state,
        "progress_percentage": progress,
        "successful_count": 2,
        "failed_count": 1,
        "total_count": 10,
        "errors": [
            {
                "subject": "https://example.com/a",
                "message": "connection reset",
                "timestamp": "2026-03-01T10:15:00Z"
            }
        ],
        "cost_breakdown": {
            "firecrawl": { "request_count": 3, "cost_amount": 0.03 }
        }
    })
}

/// API config pointing at a mock server.
pub fn api_config(base_url: &str) -> ApiConfig {
    ApiConfig {
        base_url: base_url.to_string(),
        timeout_seconds: 2,
        token_env: None,
    }
}

pub fn client_for(base_url: &str) -> CrawlApiClient {
    CrawlApiClient::new(&api_config(base_url)).unwrap()
}

/// Millisecond-scale schedule so real-clock tests stay fast.
pub fn fast_poller_config() -> PollerConfig {
    PollerConfig {
        phases: vec![
            BackoffPhase {
                up_to_poll: 2,
                interval_ms: 20,
            },
            BackoffPhase {
                up_to_poll: 4,
                interval_ms: 40,
            },
        ],
        steady_interval_ms: 80,
    }
}
