//! Step-function backoff for run status polling.

use super::config::{BackoffPhase, PollerConfig};
use crate::status::RunState;
use std::time::Duration;

/// Why a session stopped scheduling polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StopReason {
    /// The run reached `completed`, `failed` or `partial`
    Terminal(RunState),
    /// The run reported a state that is neither active nor terminal
    Inactive(RunState),
}

/// Outcome of evaluating the policy after a poll.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollDecision {
    /// Fetch again after the given delay
    Continue(Duration),
    Stop(StopReason),
}

/// Selects the delay before the next poll from the poll count and the last
/// observed run state.
#[derive(Debug, Clone)]
pub struct BackoffPolicy {
    phases: Vec<BackoffPhase>,
    steady: Duration,
}

impl BackoffPolicy {
    pub fn new(config: &PollerConfig) -> Self {
        Self {
            phases: config.phases.clone(),
            steady: Duration::from_millis(config.steady_interval_ms),
        }
    }

    /// Interval for an active run that has completed `poll_count` polls.
    pub fn interval_for(&self, poll_count: u32) -> Duration {
        self.phases
            .iter()
            .find(|phase| poll_count <= phase.up_to_poll)
            .map(|phase| Duration::from_millis(phase.interval_ms))
            .unwrap_or(self.steady)
    }

    /// Decide what happens after a poll.
    ///
    /// Terminal states stop first, then any present state that is not
    /// `pending`/`in_progress`. An absent state (nothing fetched yet) keeps
    /// polling on the phase schedule.
    pub fn next(&self, poll_count: u32, state: Option<&RunState>) -> PollDecision {
        match state {
            Some(state) if state.is_terminal() => {
                PollDecision::Stop(StopReason::Terminal(state.clone()))
            }
            Some(state) if !state.is_active() => {
                PollDecision::Stop(StopReason::Inactive(state.clone()))
            }
            _ => PollDecision::Continue(self.interval_for(poll_count)),
        }
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::new(&PollerConfig::default())
    }
}
