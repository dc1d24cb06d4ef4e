//! Per-session poll state.

use crate::status::{RunState, RunStatus};

/// Policy state for one observed run.
///
/// Created when observation of a run starts and discarded when the run id
/// changes or polling is disabled, so a new session always begins at
/// `poll_count == 0`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollSession {
    pub run_id: Option<String>,
    /// Successful polls since the session started
    pub poll_count: u32,
    pub enabled: bool,
    /// State from the most recent successful poll
    pub last_state: Option<RunState>,
}

impl PollSession {
    pub fn new(run_id: Option<String>, enabled: bool) -> Self {
        Self {
            run_id,
            poll_count: 0,
            enabled,
            last_state: None,
        }
    }

    /// Whether this session is already tracking `(run_id, enabled)`.
    pub fn matches(&self, run_id: Option<&str>, enabled: bool) -> bool {
        self.run_id.as_deref() == run_id && self.enabled == enabled
    }

    /// Polling only happens for a selected run with polling enabled.
    pub fn should_poll(&self) -> bool {
        self.enabled && self.run_id.is_some()
    }

    /// Record a successful fetch.
    pub fn record_success(&mut self, status: &RunStatus) {
        self.poll_count = self.poll_count.saturating_add(1);
        self.last_state = Some(status.status.clone());
    }
}
