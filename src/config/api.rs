//! API endpoint configuration

use reqwest::Url;
use serde::{Deserialize, Serialize};

/// Where and how to reach the crawl API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    /// Per-request timeout
    pub timeout_seconds: u64,
    /// Name of the environment variable holding a bearer token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_env: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8020".to_string(),
            timeout_seconds: 10,
            token_env: None,
        }
    }
}

impl ApiConfig {
    /// Resolve the bearer token, if one is configured and set.
    pub fn token(&self) -> Option<String> {
        self.token_env
            .as_deref()
            .and_then(|name| std::env::var(name).ok())
            .filter(|token| !token.is_empty())
    }

    /// The base URL, parsed and checked.
    pub fn url(&self) -> Result<Url, String> {
        parse_http_url(&self.base_url)
    }
}

/// Parse an absolute `http` or `https` URL with a host.
pub fn parse_http_url(raw: &str) -> Result<Url, String> {
    let url = Url::parse(raw).map_err(|e| format!("Invalid URL '{}': {}", raw, e))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(format!(
            "'{}' uses scheme '{}', expected http or https",
            raw,
            url.scheme()
        ));
    }
    if url.host_str().map_or(true, str::is_empty) {
        return Err(format!("'{}' has no host", raw));
    }
    Ok(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_config_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.base_url, "http://localhost:8020");
        assert_eq!(config.timeout_seconds, 10);
        assert!(config.token_env.is_none());
        assert!(config.token().is_none());
    }

    #[test]
    fn test_token_from_env() {
        std::env::set_var("CRAWLWATCH_TEST_TOKEN_A", "secret");
        let config = ApiConfig {
            token_env: Some("CRAWLWATCH_TEST_TOKEN_A".to_string()),
            ..Default::default()
        };
        assert_eq!(config.token().as_deref(), Some("secret"));
        std::env::remove_var("CRAWLWATCH_TEST_TOKEN_A");
    }

    #[test]
    fn test_parse_http_url_accepts_http_and_https() {
        let url = parse_http_url("https://crawl.example.com/base").unwrap();
        assert_eq!(url.host_str(), Some("crawl.example.com"));
        assert!(parse_http_url("http://localhost:8020").is_ok());
    }

    #[test]
    fn test_parse_http_url_rejects_unusable_urls() {
        for raw in [
            "http://",
            "https:// not a host",
            "http://[::1",
            "localhost:8020",
            "ftp://example.com",
            "",
        ] {
            assert!(parse_http_url(raw).is_err(), "accepted {:?}", raw);
        }
    }

    #[test]
    fn test_unset_token_env_is_none() {
        let config = ApiConfig {
            token_env: Some("CRAWLWATCH_TEST_TOKEN_UNSET".to_string()),
            ..Default::default()
        };
        assert!(config.token().is_none());
    }
}
