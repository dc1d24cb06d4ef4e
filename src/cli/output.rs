//! Output formatting helpers for CLI commands

use crate::poller::{PollSnapshot, StopReason};
use crate::status::{RunState, RunStatus};
use colored::{ColoredString, Colorize};
use comfy_table::{presets::UTF8_FULL, Cell, ContentArrangement, Table};
use std::time::Duration;

/// Colored label for a run state
pub fn state_label(state: &RunState) -> ColoredString {
    match state {
        RunState::Pending => state.as_str().yellow(),
        RunState::InProgress => state.as_str().cyan(),
        RunState::Completed => state.as_str().green(),
        RunState::Failed => state.as_str().red(),
        RunState::Partial => state.as_str().magenta(),
        RunState::Unknown(raw) => raw.as_str().normal(),
    }
}

/// Format duration in a human-readable way
pub fn format_duration(duration: Duration) -> String {
    let seconds = duration.as_secs();
    let minutes = seconds / 60;
    let secs = seconds % 60;

    if seconds == 0 {
        format!("{}ms", duration.as_millis())
    } else if minutes > 0 {
        format!("{}m {}s", minutes, secs)
    } else {
        format!("{}s", secs)
    }
}

/// One progress line for `watch`.
pub fn format_progress(snapshot: &PollSnapshot) -> String {
    let mut line = String::new();

    match &snapshot.status {
        Some(status) => {
            line.push_str(&format!(
                "[{}] {:5.1}%  {} ok, {} failed, {} total",
                state_label(&status.status),
                status.progress_percentage,
                status.successful_count,
                status.failed_count,
                status.total_count
            ));
        }
        None if snapshot.is_loading => line.push_str("[loading]"),
        None => line.push_str("[no status]"),
    }

    if let Some(delay) = snapshot.next_delay {
        line.push_str(&format!("  next poll in {}", format_duration(delay)));
    }

    if let Some(error) = &snapshot.error {
        line.push_str(&format!("\n  {} {}", "last poll failed:".yellow(), error));
    }

    if let Some(StopReason::Inactive(state)) = &snapshot.stopped {
        line.push_str(&format!(
            "\n  {} run reported unexpected state '{}'",
            "stopped:".yellow(),
            state
        ));
    }

    line
}

/// Full status report for `status` and the end of `watch`.
pub fn format_status_report(status: &RunStatus) -> String {
    let mut output = String::new();

    output.push_str(&format!("Run: {}\n", status.id));
    output.push_str(&format!("Status: {}\n", state_label(&status.status)));
    output.push_str(&format!("Progress: {:.1}%\n", status.progress_percentage));
    output.push_str(&format!(
        "Pages: {} successful, {} failed, {} total\n",
        status.successful_count, status.failed_count, status.total_count
    ));

    if !status.errors.is_empty() {
        output.push_str(&format!("\nErrors ({}):\n", status.errors.len()));
        output.push_str(&format!("{}\n", format_errors_table(status)));
    }

    if let Some(costs) = &status.cost_breakdown {
        if !costs.is_empty() {
            output.push_str("\nCost breakdown:\n");
            output.push_str(&format!("{}\n", format_costs_table(status)));
            output.push_str(&format!("Total cost: ${:.4}\n", status.total_cost()));
        }
    }

    output
}

/// Table of per-subject errors
pub fn format_errors_table(status: &RunStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Subject", "Message", "Time"]);

    for error in &status.errors {
        table.add_row(vec![
            Cell::new(&error.subject),
            Cell::new(&error.message),
            Cell::new(error.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()),
        ]);
    }

    table.to_string()
}

/// Table of per-service usage and spend
pub fn format_costs_table(status: &RunStatus) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec!["Service", "Requests", "Cost"]);

    if let Some(costs) = &status.cost_breakdown {
        for (service, cost) in costs {
            table.add_row(vec![
                Cell::new(service),
                Cell::new(cost.request_count),
                Cell::new(format!("${:.4}", cost.cost_amount)),
            ]);
        }
    }

    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ClientError;
    use crate::status::{RunError, ServiceCost};
    use std::collections::BTreeMap;

    fn create_test_status() -> RunStatus {
        let mut costs = BTreeMap::new();
        costs.insert(
            "firecrawl".to_string(),
            ServiceCost {
                request_count: 12,
                cost_amount: 0.06,
            },
        );
        RunStatus {
            id: "run-42".to_string(),
            status: RunState::InProgress,
            progress_percentage: 37.5,
            successful_count: 3,
            failed_count: 1,
            total_count: 8,
            errors: vec![RunError {
                subject: "https://example.com/broken".to_string(),
                message: "timeout".to_string(),
                timestamp: "2026-03-01T10:15:00Z".parse().unwrap(),
            }],
            cost_breakdown: Some(costs),
        }
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(Duration::from_millis(250)), "250ms");
        assert_eq!(format_duration(Duration::from_secs(2)), "2s");
        assert_eq!(format_duration(Duration::from_secs(90)), "1m 30s");
    }

    #[test]
    fn test_progress_line_with_status() {
        let snapshot = PollSnapshot {
            run_id: Some("run-42".to_string()),
            status: Some(create_test_status()),
            poll_count: 3,
            next_delay: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        let line = format_progress(&snapshot);
        assert!(line.contains("in_progress"));
        assert!(line.contains("37.5%"));
        assert!(line.contains("next poll in 2s"));
    }

    #[test]
    fn test_progress_line_loading_and_error() {
        let snapshot = PollSnapshot {
            run_id: Some("run-42".to_string()),
            is_loading: true,
            ..Default::default()
        };
        assert!(format_progress(&snapshot).contains("[loading]"));

        let snapshot = PollSnapshot {
            run_id: Some("run-42".to_string()),
            error: Some(ClientError::Timeout(10)),
            next_delay: Some(Duration::from_secs(2)),
            ..Default::default()
        };
        let line = format_progress(&snapshot);
        assert!(line.contains("[no status]"));
        assert!(line.contains("request timeout after 10s"));
    }

    #[test]
    fn test_status_report_sections() {
        let report = format_status_report(&create_test_status());
        assert!(report.contains("Run: run-42"));
        assert!(report.contains("Errors (1):"));
        assert!(report.contains("https://example.com/broken"));
        assert!(report.contains("firecrawl"));
        assert!(report.contains("Total cost: $0.0600"));
    }

    #[test]
    fn test_status_report_omits_empty_sections() {
        let mut status = create_test_status();
        status.errors.clear();
        status.cost_breakdown = None;
        let report = format_status_report(&status);
        assert!(!report.contains("Errors"));
        assert!(!report.contains("Cost breakdown"));
    }

    #[test]
    fn test_costs_table_header() {
        let table = format_costs_table(&create_test_status());
        assert!(table.contains("Service"));
        assert!(table.contains("Requests"));
    }
}
