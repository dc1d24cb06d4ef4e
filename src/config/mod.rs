//! Configuration module for crawlwatch
//!
//! Provides layered configuration loading from files, environment variables, and defaults.
//!
//! # Configuration Precedence
//!
//! 1. CLI arguments (highest priority)
//! 2. Environment variables (`CRAWLWATCH_*`)
//! 3. Configuration file (TOML)
//! 4. Default values (lowest priority)
//!
//! # Example
//!
//! ```rust
//! use crawlwatch::config::CrawlwatchConfig;
//!
//! let toml = r#"
//! [api]
//! base_url = "https://api.example.com"
//! "#;
//! let config: CrawlwatchConfig = toml::from_str(toml).unwrap();
//! assert_eq!(config.api.base_url, "https://api.example.com");
//! assert_eq!(config.poller.steady_interval_ms, 30_000);
//! ```

pub mod api;
pub mod error;
pub mod logging;

pub use api::{parse_http_url, ApiConfig};
pub use error::ConfigError;
pub use logging::{LogFormat, LoggingConfig};

// Re-export PollerConfig from poller module
pub use crate::poller::{BackoffPhase, PollerConfig};

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Example configuration written by `crawlwatch config init`.
pub const EXAMPLE_CONFIG: &str = include_str!("../../crawlwatch.example.toml");

/// Unified configuration for crawlwatch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct CrawlwatchConfig {
    /// Crawl API endpoint settings
    pub api: ApiConfig,
    /// Poll schedule
    pub poller: PollerConfig,
    /// Logging configuration
    pub logging: LoggingConfig,
}

impl CrawlwatchConfig {
    /// Load configuration from a TOML file
    ///
    /// If path is None, returns default configuration.
    /// If path doesn't exist, returns NotFound error.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(p) => {
                if !p.exists() {
                    return Err(ConfigError::NotFound(p.to_path_buf()));
                }
                let content = std::fs::read_to_string(p).map_err(|source| ConfigError::Read {
                    path: p.to_path_buf(),
                    source,
                })?;
                toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))
            }
            None => Ok(Self::default()),
        }
    }

    /// Apply environment variable overrides
    ///
    /// Invalid values are ignored and the previous value is kept.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(url) = std::env::var("CRAWLWATCH_API_URL") {
            self.api.base_url = url;
        }
        if let Ok(timeout) = std::env::var("CRAWLWATCH_TIMEOUT") {
            if let Ok(t) = timeout.parse() {
                self.api.timeout_seconds = t;
            }
        }
        if let Ok(level) = std::env::var("CRAWLWATCH_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("CRAWLWATCH_LOG_FORMAT") {
            if let Ok(f) = format.parse() {
                self.logging.format = f;
            }
        }

        self
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Err(message) = self.api.url() {
            return Err(ConfigError::invalid("api.base_url", message));
        }
        if self.api.timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "api.timeout_seconds",
                "timeout must be non-zero",
            ));
        }

        validate_phases(&self.poller)?;

        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::invalid(
                "logging.level",
                "level cannot be empty",
            ));
        }
        if let Some(component) = self.logging.unknown_component() {
            return Err(ConfigError::invalid(
                format!("logging.component_levels.{}", component),
                format!(
                    "unknown component, expected one of: {}",
                    logging::COMPONENTS.join(", ")
                ),
            ));
        }

        Ok(())
    }
}

/// Phases must have non-zero intervals and strictly increasing bounds.
fn validate_phases(poller: &PollerConfig) -> Result<(), ConfigError> {
    let mut previous: Option<u32> = None;
    for (i, phase) in poller.phases.iter().enumerate() {
        if phase.interval_ms == 0 {
            return Err(ConfigError::invalid(
                format!("poller.phases[{}].interval_ms", i),
                "interval must be non-zero",
            ));
        }
        if let Some(prev) = previous {
            if phase.up_to_poll <= prev {
                return Err(ConfigError::invalid(
                    format!("poller.phases[{}].up_to_poll", i),
                    format!("must be greater than the previous bound ({})", prev),
                ));
            }
        }
        previous = Some(phase.up_to_poll);
    }

    if poller.steady_interval_ms == 0 {
        return Err(ConfigError::invalid(
            "poller.steady_interval_ms",
            "interval must be non-zero",
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_config_defaults() {
        let config = CrawlwatchConfig::default();
        assert_eq!(config.api.base_url, "http://localhost:8020");
        assert_eq!(config.poller.phases.len(), 3);
        assert_eq!(config.poller.steady_interval_ms, 30_000);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_phases_match_schedule() {
        let phases = PollerConfig::default().phases;
        let pairs: Vec<(u32, u64)> = phases.iter().map(|p| (p.up_to_poll, p.interval_ms)).collect();
        assert_eq!(pairs, vec![(5, 2_000), (15, 5_000), (30, 10_000)]);
    }

    #[test]
    fn test_config_parse_example_file() {
        let config: CrawlwatchConfig = toml::from_str(EXAMPLE_CONFIG).unwrap();
        assert_eq!(config.poller, PollerConfig::default());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_parse_custom_phases() {
        let toml = r#"
        [poller]
        steady_interval_ms = 60000

        [[poller.phases]]
        up_to_poll = 3
        interval_ms = 1000

        [[poller.phases]]
        up_to_poll = 10
        interval_ms = 4000
        "#;

        let config: CrawlwatchConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.poller.phases.len(), 2);
        assert_eq!(config.poller.phases[1].interval_ms, 4_000);
        assert_eq!(config.poller.steady_interval_ms, 60_000);
        assert_eq!(config.api.timeout_seconds, 10); // Default
    }

    #[test]
    fn test_config_load_from_file() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[api]\ntimeout_seconds = 3").unwrap();

        let config = CrawlwatchConfig::load(Some(temp.path())).unwrap();
        assert_eq!(config.api.timeout_seconds, 3);
    }

    #[test]
    fn test_config_load_invalid_toml() {
        let temp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(temp.path(), "[api\nbase_url = ").unwrap();

        let result = CrawlwatchConfig::load(Some(temp.path()));
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_config_missing_file_error() {
        let result = CrawlwatchConfig::load(Some(Path::new("/nonexistent/crawlwatch.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn test_config_load_none_returns_defaults() {
        let config = CrawlwatchConfig::load(None).unwrap();
        assert_eq!(config, CrawlwatchConfig::default());
    }

    #[test]
    fn test_config_env_override_api_url() {
        std::env::set_var("CRAWLWATCH_API_URL", "https://crawl.example.com");
        let config = CrawlwatchConfig::default().with_env_overrides();
        std::env::remove_var("CRAWLWATCH_API_URL");

        assert_eq!(config.api.base_url, "https://crawl.example.com");
    }

    #[test]
    fn test_config_env_invalid_timeout_ignored() {
        std::env::set_var("CRAWLWATCH_TIMEOUT", "soon");
        let config = CrawlwatchConfig::default().with_env_overrides();
        std::env::remove_var("CRAWLWATCH_TIMEOUT");

        assert_eq!(config.api.timeout_seconds, 10);
    }

    #[test]
    fn test_config_env_override_log_settings() {
        std::env::set_var("CRAWLWATCH_LOG_LEVEL", "debug");
        std::env::set_var("CRAWLWATCH_LOG_FORMAT", "json");
        let config = CrawlwatchConfig::default().with_env_overrides();
        std::env::remove_var("CRAWLWATCH_LOG_LEVEL");
        std::env::remove_var("CRAWLWATCH_LOG_FORMAT");

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_validation_rejects_bad_scheme() {
        let mut config = CrawlwatchConfig::default();
        config.api.base_url = "localhost:8020".to_string();

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api.base_url"
        ));
    }

    #[test]
    fn test_validation_rejects_unparseable_base_url() {
        for raw in ["http://", "https:// not a host", "http://[::1"] {
            let mut config = CrawlwatchConfig::default();
            config.api.base_url = raw.to_string();

            assert!(
                matches!(
                    config.validate(),
                    Err(ConfigError::Validation { ref field, .. }) if field == "api.base_url"
                ),
                "accepted {:?}",
                raw
            );
        }
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let mut config = CrawlwatchConfig::default();
        config.api.timeout_seconds = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api.timeout_seconds"
        ));
    }

    #[test]
    fn test_validation_rejects_unordered_phases() {
        let mut config = CrawlwatchConfig::default();
        config.poller.phases = vec![
            BackoffPhase {
                up_to_poll: 10,
                interval_ms: 1_000,
            },
            BackoffPhase {
                up_to_poll: 10,
                interval_ms: 2_000,
            },
        ];

        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "poller.phases[1].up_to_poll"
        ));
    }

    #[test]
    fn test_validation_rejects_unknown_log_component() {
        let mut config = CrawlwatchConfig::default();
        config.logging.component_levels = Some(
            [("routing".to_string(), "debug".to_string())]
                .into_iter()
                .collect(),
        );

        let err = config.validate().unwrap_err();
        assert_eq!(err.field(), Some("logging.component_levels.routing"));
    }

    #[test]
    fn test_config_load_unreadable_path() {
        let dir = tempfile::tempdir().unwrap();
        let result = CrawlwatchConfig::load(Some(dir.path()));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }

    #[test]
    fn test_validation_rejects_zero_interval() {
        let mut config = CrawlwatchConfig::default();
        config.poller.phases[0].interval_ms = 0;
        assert!(config.validate().is_err());

        let mut config = CrawlwatchConfig::default();
        config.poller.steady_interval_ms = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation { ref field, .. }) if field == "poller.steady_interval_ms"
        ));
    }
}
