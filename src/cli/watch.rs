//! Watch command implementation

use crate::cli::output::{format_progress, format_status_report};
use crate::cli::CliResult;
use crate::poller::{PollSnapshot, PollerConfig, StatusPoller, StatusSource, StopReason};
use crate::status::RunState;
use std::sync::Arc;

/// Exit code for a finished watch.
///
/// `0` completed, `2` failed, `3` partial, `4` stopped on an unrecognised
/// state.
pub fn exit_code(snapshot: &PollSnapshot) -> i32 {
    match &snapshot.stopped {
        Some(StopReason::Terminal(RunState::Completed)) => 0,
        Some(StopReason::Terminal(RunState::Failed)) => 2,
        Some(StopReason::Terminal(_)) => 3,
        Some(StopReason::Inactive(_)) => 4,
        None => 1,
    }
}

/// Poll `run_id` until it finishes, printing each poll.
///
/// Returns the final snapshot. Ctrl-C stops polling and returns an error.
pub async fn watch_run(
    source: Arc<dyn StatusSource>,
    config: &PollerConfig,
    run_id: &str,
    json: bool,
) -> CliResult<PollSnapshot> {
    let mut poller = StatusPoller::new(source, config);
    let mut rx = poller.subscribe();
    poller.observe(Some(run_id.to_string()), true);
    tracing::info!(run_id = %run_id, "Watching run");

    let finished = loop {
        let snapshot = rx.borrow_and_update().clone();
        if !json && !snapshot.is_loading {
            println!("{}", format_progress(&snapshot));
        }
        if snapshot.is_finished() {
            break snapshot;
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    return Err("status poller stopped unexpectedly".into());
                }
            }
            _ = tokio::signal::ctrl_c() => {
                poller.pause();
                return Err(format!("interrupted while watching run {}", run_id).into());
            }
        }
    };

    if let Some(status) = &finished.status {
        if json {
            println!("{}", serde_json::to_string_pretty(status)?);
        } else {
            println!();
            print!("{}", format_status_report(status));
        }
    }

    Ok(finished)
}
