//! Run status data model.
//!
//! A [`RunStatus`] is the payload returned by the remote status endpoint on
//! every poll. The client never mutates it; it only validates the counters
//! and hands it to the poller and the output layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Lifecycle state of a run as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RunState {
    Pending,
    InProgress,
    Completed,
    Failed,
    Partial,
    /// A state string this client does not recognise.
    Unknown(String),
}

impl RunState {
    /// No further progress updates will occur after a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Partial)
    }

    /// States in which the run is still expected to make progress.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::InProgress)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Partial => "partial",
            Self::Unknown(raw) => raw,
        }
    }
}

impl From<&str> for RunState {
    fn from(s: &str) -> Self {
        match s {
            "pending" => Self::Pending,
            "in_progress" => Self::InProgress,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            "partial" => Self::Partial,
            other => Self::Unknown(other.to_string()),
        }
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RunState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for RunState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(RunState::from(raw.as_str()))
    }
}

/// One per-subject failure recorded by the server during a run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunError {
    /// What failed, typically a page URL
    pub subject: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Usage and spend attributed to one external service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceCost {
    pub request_count: u64,
    pub cost_amount: f64,
}

/// Current status of a run, as returned by the status endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunStatus {
    pub id: String,
    pub status: RunState,
    pub progress_percentage: f64,
    pub successful_count: u64,
    pub failed_count: u64,
    pub total_count: u64,
    #[serde(default)]
    pub errors: Vec<RunError>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cost_breakdown: Option<BTreeMap<String, ServiceCost>>,
}

impl RunStatus {
    /// Check the payload invariants the server is expected to uphold.
    pub fn validate(&self) -> Result<(), String> {
        if !(0.0..=100.0).contains(&self.progress_percentage) {
            return Err(format!(
                "progress_percentage {} is outside 0..=100",
                self.progress_percentage
            ));
        }

        let processed = self.successful_count.saturating_add(self.failed_count);
        if processed > self.total_count {
            return Err(format!(
                "successful_count ({}) + failed_count ({}) exceeds total_count ({})",
                self.successful_count, self.failed_count, self.total_count
            ));
        }

        Ok(())
    }

    /// Total spend across every service in the breakdown.
    pub fn total_cost(&self) -> f64 {
        self.cost_breakdown
            .as_ref()
            .map(|costs| costs.values().map(|c| c.cost_amount).sum())
            .unwrap_or(0.0)
    }
}
