//! CLI module for crawlwatch
//!
//! # Commands
//!
//! - `watch` - Poll a run until it reaches a terminal state
//! - `status` - Fetch the current status of a run once
//! - `cancel` - Request cancellation of a run
//! - `start` - Start a new crawl, optionally watching it
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! crawlwatch start https://example.com --max-pages 50 --watch
//! crawlwatch status 7f3c2a --json
//! crawlwatch cancel 7f3c2a
//! ```

pub mod cancel;
pub mod completions;
pub mod config;
pub mod output;
pub mod start;
pub mod status;
pub mod watch;

pub use completions::handle_completions;
pub use config::handle_config_init;

use crate::config::CrawlwatchConfig;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Result type shared by command handlers.
pub type CliResult<T> = Result<T, Box<dyn std::error::Error + Send + Sync>>;

/// crawlwatch - follow long-running crawl runs
#[derive(Parser, Debug)]
#[command(
    name = "crawlwatch",
    version,
    about = "Follow long-running crawl runs with adaptive status polling"
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Path to configuration file
    #[arg(short, long, global = true, default_value = "crawlwatch.toml")]
    pub config: PathBuf,

    /// Override the API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll a run until it finishes
    Watch(WatchArgs),
    /// Show the current status of a run
    Status(StatusArgs),
    /// Cancel a run
    Cancel(CancelArgs),
    /// Start a new crawl
    Start(StartArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct WatchArgs {
    /// Run identifier
    pub run_id: String,

    /// Print the final status as JSON instead of progress lines
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Run identifier
    pub run_id: String,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct CancelArgs {
    /// Run or job identifier
    pub run_id: String,
}

#[derive(Args, Debug)]
pub struct StartArgs {
    /// Website to crawl
    pub url: String,

    /// Maximum number of pages to crawl
    #[arg(short, long)]
    pub max_pages: Option<u32>,

    /// Watch the new run until it finishes
    #[arg(short, long)]
    pub watch: bool,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "crawlwatch.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

/// Load configuration with environment and CLI overrides, then validate.
///
/// A missing file is only an error when it is not the default path.
pub fn load_config_with_overrides(args: &GlobalArgs) -> CliResult<CrawlwatchConfig> {
    let mut config = if args.config.exists() {
        CrawlwatchConfig::load(Some(&args.config))?
    } else if args.config == PathBuf::from("crawlwatch.toml") {
        CrawlwatchConfig::default()
    } else {
        return Err(crate::config::ConfigError::NotFound(args.config.clone()).into());
    };

    config = config.with_env_overrides();

    if let Some(ref url) = args.api_url {
        config.api.base_url = url.clone();
    }
    if let Some(ref level) = args.log_level {
        config.logging.level = level.clone();
    }

    config.validate()?;
    Ok(config)
}
