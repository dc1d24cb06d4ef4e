//! Configuration for the status poller.

use serde::{Deserialize, Serialize};

/// One step of the poll schedule: every poll up to and including
/// `up_to_poll` waits `interval_ms` before the next fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackoffPhase {
    pub up_to_poll: u32,
    pub interval_ms: u64,
}

/// Poll timing configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollerConfig {
    /// Phases ordered by `up_to_poll`, ascending
    pub phases: Vec<BackoffPhase>,
    /// Interval once every phase is exhausted
    pub steady_interval_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            phases: vec![
                BackoffPhase {
                    up_to_poll: 5,
                    interval_ms: 2_000,
                },
                BackoffPhase {
                    up_to_poll: 15,
                    interval_ms: 5_000,
                },
                BackoffPhase {
                    up_to_poll: 30,
                    interval_ms: 10_000,
                },
            ],
            steady_interval_ms: 30_000,
        }
    }
}
