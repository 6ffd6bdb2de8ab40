use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::CounterKind;
use crate::ports::MetricsSink;

use super::backoff::Backoff;
use super::reconciler::Reconciler;
use super::status::PollStatus;

/// Poll loop states.
///
/// `Idle -> Polling -> Succeeded|Failed -> Waiting -> Polling ...`.
/// Cancellation is only observed while `Waiting`; a cycle in flight always
/// runs to completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Polling,
    Succeeded,
    Failed,
    Waiting(Duration),
    Stopped,
}

/// Drives the reconciler on a fixed cadence, backing off after failures
pub struct PollScheduler {
    reconciler: Reconciler,
    sink: Arc<dyn MetricsSink>,
    status: Arc<PollStatus>,
    check_interval: Duration,
    backoff: Backoff,
}

impl PollScheduler {
    pub fn new(
        reconciler: Reconciler,
        sink: Arc<dyn MetricsSink>,
        status: Arc<PollStatus>,
        check_interval: Duration,
        backoff: Backoff,
    ) -> Self {
        Self {
            reconciler,
            sink,
            status,
            check_interval,
            backoff,
        }
    }

    /// Run until `shutdown` flips to `true` (or its sender is dropped)
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) {
        info!(interval = ?self.check_interval, "Poll scheduler started");

        let mut state = PollState::Idle;
        loop {
            state = match state {
                PollState::Idle => PollState::Polling,
                PollState::Polling => {
                    if self.reconciler.reconcile_cycle().await {
                        PollState::Succeeded
                    } else {
                        PollState::Failed
                    }
                }
                PollState::Succeeded => PollState::Waiting(self.after_cycle(true)),
                PollState::Failed => PollState::Waiting(self.after_cycle(false)),
                PollState::Waiting(delay) => {
                    tokio::select! {
                        _ = tokio::time::sleep(delay) => PollState::Polling,
                        _ = shutdown.wait_for(|stop| *stop) => PollState::Stopped,
                    }
                }
                PollState::Stopped => {
                    info!("Poll scheduler stopped");
                    return;
                }
            };
        }
    }

    /// Book-keeping after a cycle; returns how long to wait before the next one
    fn after_cycle(&mut self, succeeded: bool) -> Duration {
        if succeeded {
            self.backoff.reset();
            self.sink.increment_counter(CounterKind::LoopRuns);
            self.status.record_success(Utc::now());
            debug!(next_in = ?self.check_interval, "Cycle succeeded");
            self.check_interval
        } else {
            self.status.record_failure();
            let delay = self.backoff.next_delay();
            warn!(retry_in = ?delay, "Cycle failed, backing off");
            delay
        }
    }
}
