//! crawlwatch - follow long-running crawl runs
//!
//! This library provides an adaptive status poller for server-side background
//! jobs, the run status data model, and an HTTP client for the crawl API.

pub mod cli;
pub mod client;
pub mod config;
pub mod logging;
pub mod poller;
pub mod status;
