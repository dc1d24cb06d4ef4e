//! Adaptive status polling for long-running runs.
//!
//! [`StatusPoller`] fetches the status of one run at a time on a schedule
//! that slows down the longer the run has been observed, and stops on its
//! own once the run reaches a terminal state. Consumers drive it with
//! [`StatusPoller::observe`] and follow its state through a
//! [`tokio::sync::watch`] channel.
//!
//! Each observed `(run_id, enabled)` pair gets a fresh session task guarded
//! by a [`CancellationToken`] and a generation number, so a response for a
//! run that is no longer observed is never applied.

mod config;
mod policy;
mod session;


pub use config::*;
pub use policy::*;
pub use session::*;

use crate::client::ClientError;
use crate::status::RunStatus;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Anything that can report the current status of a run.
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch_status(&self, run_id: &str) -> Result<RunStatus, ClientError>;
}

/// Observable poller state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollSnapshot {
    /// Run being observed
    pub run_id: Option<String>,
    /// Last successfully fetched status; kept across failed polls
    pub status: Option<RunStatus>,
    /// No status yet and a fetch is pending
    pub is_loading: bool,
    /// Error from the most recent poll, cleared by the next success
    pub error: Option<ClientError>,
    pub poll_count: u32,
    /// Delay before the next scheduled poll, if any
    pub next_delay: Option<Duration>,
    /// Set once the session stopped scheduling polls on its own
    pub stopped: Option<StopReason>,
}

impl PollSnapshot {
    pub fn is_finished(&self) -> bool {
        self.stopped.is_some()
    }
}

struct ActiveSession {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

/// Polls one run at a time with step-function backoff.
///
/// Must be used from within a tokio runtime. Dropping the poller cancels
/// its active session.
pub struct StatusPoller {
    source: Arc<dyn StatusSource>,
    policy: Arc<BackoffPolicy>,
    snapshot: Arc<watch::Sender<PollSnapshot>>,
    generation: Arc<AtomicU64>,
    session: PollSession,
    active: Option<ActiveSession>,
}

impl StatusPoller {
    pub fn new(source: Arc<dyn StatusSource>, config: &PollerConfig) -> Self {
        let (tx, _rx) = watch::channel(PollSnapshot::default());
        Self {
            source,
            policy: Arc::new(BackoffPolicy::new(config)),
            snapshot: Arc::new(tx),
            generation: Arc::new(AtomicU64::new(0)),
            session: PollSession::new(None, false),
            active: None,
        }
    }

    /// Start, switch, pause or resume observation.
    ///
    /// Repeating the current `(run_id, enabled)` pair is a no-op. Any other
    /// call cancels the active session and starts over at `poll_count == 0`;
    /// when a run is selected and polling is enabled the first fetch is
    /// issued immediately.
    pub fn observe(&mut self, run_id: Option<String>, enabled: bool) -> PollSnapshot {
        if self.session.matches(run_id.as_deref(), enabled) {
            return self.snapshot();
        }

        self.cancel_active();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let same_run = self.session.run_id == run_id;
        self.session = PollSession::new(run_id.clone(), enabled);
        let should_poll = self.session.should_poll();

        self.snapshot.send_modify(|snap| {
            let status = if same_run { snap.status.take() } else { None };
            *snap = PollSnapshot {
                run_id: run_id.clone(),
                is_loading: should_poll && status.is_none(),
                status,
                ..Default::default()
            };
        });

        if should_poll {
            let cancel = CancellationToken::new();
            let task = SessionTask {
                source: Arc::clone(&self.source),
                policy: Arc::clone(&self.policy),
                snapshot: Arc::clone(&self.snapshot),
                generation: Arc::clone(&self.generation),
                own_generation: generation,
                session: self.session.clone(),
                cancel: cancel.clone(),
            };
            let handle = tokio::spawn(task.run());
            self.active = Some(ActiveSession { cancel, handle });
        } else {
            tracing::debug!(run_id = ?run_id, enabled, "Polling idle");
        }

        self.snapshot()
    }

    /// Stop polling the current run, keeping its last status.
    pub fn pause(&mut self) -> PollSnapshot {
        let run_id = self.session.run_id.clone();
        self.observe(run_id, false)
    }

    /// Current poller state.
    pub fn snapshot(&self) -> PollSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Receive every state change from now on.
    pub fn subscribe(&self) -> watch::Receiver<PollSnapshot> {
        self.snapshot.subscribe()
    }

    /// Whether a session task is currently scheduling polls.
    pub fn is_polling(&self) -> bool {
        self.active
            .as_ref()
            .is_some_and(|active| !active.handle.is_finished())
    }

    fn cancel_active(&mut self) {
        if let Some(active) = self.active.take() {
            active.cancel.cancel();
        }
    }
}

impl Drop for StatusPoller {
    fn drop(&mut self) {
        self.cancel_active();
    }
}

/// The polling loop for one session.
struct SessionTask {
    source: Arc<dyn StatusSource>,
    policy: Arc<BackoffPolicy>,
    snapshot: Arc<watch::Sender<PollSnapshot>>,
    generation: Arc<AtomicU64>,
    own_generation: u64,
    session: PollSession,
    cancel: CancellationToken,
}

impl SessionTask {
    async fn run(mut self) {
        let Some(run_id) = self.session.run_id.clone() else {
            return;
        };
        tracing::debug!(run_id = %run_id, "Poll session started");

        loop {
            let result = tokio::select! {
                biased;
                _ = self.cancel.cancelled() => break,
                result = self.source.fetch_status(&run_id) => result,
            };

            match &result {
                Ok(status) => self.session.record_success(status),
                Err(e) => tracing::warn!(
                    run_id = %run_id,
                    poll_count = self.session.poll_count,
                    error = %e,
                    "Status poll failed, keeping schedule"
                ),
            }

            let decision = self
                .policy
                .next(self.session.poll_count, self.session.last_state.as_ref());

            if !self.apply(result, &decision) {
                tracing::debug!(run_id = %run_id, "Discarding response for superseded session");
                break;
            }

            match decision {
                PollDecision::Stop(reason) => {
                    tracing::info!(
                        run_id = %run_id,
                        poll_count = self.session.poll_count,
                        reason = ?reason,
                        "Polling stopped"
                    );
                    break;
                }
                PollDecision::Continue(delay) => {
                    tracing::debug!(
                        run_id = %run_id,
                        poll_count = self.session.poll_count,
                        delay_ms = delay.as_millis() as u64,
                        "Next poll scheduled"
                    );
                    tokio::select! {
                        biased;
                        _ = self.cancel.cancelled() => break,
                        _ = tokio::time::sleep(delay) => {}
                    }
                }
            }
        }

        tracing::debug!(run_id = %run_id, "Poll session ended");
    }

    /// Publish a poll result. Returns false if this session was superseded.
    fn apply(&self, result: Result<RunStatus, ClientError>, decision: &PollDecision) -> bool {
        let poll_count = self.session.poll_count;
        let mut applied = false;

        self.snapshot.send_if_modified(|snap| {
            // Checked under the channel lock; `observe` bumps the generation
            // before it resets the snapshot.
            if self.cancel.is_cancelled()
                || self.generation.load(Ordering::SeqCst) != self.own_generation
            {
                return false;
            }

            match result {
                Ok(status) => {
                    snap.status = Some(status);
                    snap.error = None;
                }
                Err(e) => snap.error = Some(e),
            }
            snap.is_loading = false;
            snap.poll_count = poll_count;
            match decision {
                PollDecision::Continue(delay) => {
                    snap.next_delay = Some(*delay);
                    snap.stopped = None;
                }
                PollDecision::Stop(reason) => {
                    snap.next_delay = None;
                    snap.stopped = Some(reason.clone());
                }
            }

            applied = true;
            true
        });

        applied
    }
}
