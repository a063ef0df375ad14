//! Drives a submission to a terminal status by repeated status checks.
//!
//! The service never pushes progress, so the only way to learn about a job is
//! to ask again after a pause. Each loop iteration issues exactly one request
//! and waits for its answer; cancellation is only honoured before a request or
//! during the pause that follows it.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::domain::{JobStatus, SubmissionId};
use crate::ports::{UnpacMeClientPort, UnpacMePortResult};

/// Default pause between two status checks.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(20);

/// Polling schedule. Bounds are optional; by default polling continues until
/// the job is terminal or the caller cancels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollingConfig {
    pub interval: Duration,
    pub max_attempts: Option<u32>,
    pub deadline: Option<Duration>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_attempts: None,
            deadline: None,
        }
    }
}

impl PollingConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Stop after this many status checks without reaching a terminal status.
    #[must_use]
    pub const fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = Some(attempts);
        self
    }

    /// Stop once this much wall-clock time has passed.
    #[must_use]
    pub const fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// How a polling run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// A terminal status was observed: `Complete` or `Fail`.
    Terminal(JobStatus),
    /// The caller cancelled before a terminal status was observed.
    Cancelled { last_observed: JobStatus },
    /// A caller-supplied attempt or time bound was reached.
    Exhausted {
        last_observed: JobStatus,
        attempts: u32,
    },
}

impl PollOutcome {
    /// Results fetched after this outcome are guaranteed to be complete.
    #[must_use]
    pub fn is_complete(self) -> bool {
        self == Self::Terminal(JobStatus::Complete)
    }

    /// The job ended with errors; results are best-effort.
    #[must_use]
    pub fn is_failed(self) -> bool {
        self == Self::Terminal(JobStatus::Fail)
    }

    /// The terminal status, if one was reached.
    #[must_use]
    pub const fn terminal_status(self) -> Option<JobStatus> {
        match self {
            Self::Terminal(status) => Some(status),
            Self::Cancelled { .. } | Self::Exhausted { .. } => None,
        }
    }
}

/// Polls one submission at a time; cheap to clone and share across tasks.
#[derive(Clone)]
pub struct PollingController {
    client: Arc<dyn UnpacMeClientPort>,
    config: PollingConfig,
}

impl PollingController {
    pub fn new(client: Arc<dyn UnpacMeClientPort>, config: PollingConfig) -> Self {
        Self { client, config }
    }

    #[must_use]
    pub const fn config(&self) -> &PollingConfig {
        &self.config
    }

    /// Poll `id` until it reaches a terminal status, the caller cancels, or a
    /// configured bound is hit.
    ///
    /// A status that moves backwards in the nominal order is tolerated. A
    /// failed status request ends the run with that error; whether to try
    /// again is up to the caller.
    pub async fn run(
        &self,
        id: &SubmissionId,
        cancel: &CancellationToken,
    ) -> UnpacMePortResult<PollOutcome> {
        let started = Instant::now();
        let mut attempts: u32 = 0;
        let mut last_observed = JobStatus::Unknown;

        loop {
            if cancel.is_cancelled() {
                debug!(submission_id = %id, "Polling cancelled");
                return Ok(PollOutcome::Cancelled { last_observed });
            }

            attempts += 1;
            debug!(submission_id = %id, attempt = attempts, "Polling submission status");
            let status = self.client.poll_status(id).await?;

            if let (Some(previous), Some(current)) = (last_observed.rank(), status.rank()) {
                if current < previous {
                    debug!(
                        submission_id = %id,
                        from = %last_observed,
                        to = %status,
                        "Observed status moved backwards"
                    );
                }
            }
            last_observed = status;

            if status.is_terminal() {
                info!(submission_id = %id, %status, attempts, "Submission reached terminal status");
                return Ok(PollOutcome::Terminal(status));
            }

            if self.config.max_attempts.is_some_and(|max| attempts >= max) {
                debug!(submission_id = %id, attempts, "Polling attempts exhausted");
                return Ok(PollOutcome::Exhausted {
                    last_observed,
                    attempts,
                });
            }

            let pause = match self.config.deadline {
                Some(deadline) => {
                    let elapsed = started.elapsed();
                    if elapsed >= deadline {
                        debug!(submission_id = %id, attempts, "Polling deadline reached");
                        return Ok(PollOutcome::Exhausted {
                            last_observed,
                            attempts,
                        });
                    }
                    self.config.interval.min(deadline - elapsed)
                }
                None => self.config.interval,
            };

            tokio::select! {
                biased;

                () = cancel.cancelled() => {
                    debug!(submission_id = %id, %last_observed, "Polling cancelled");
                    return Ok(PollOutcome::Cancelled { last_observed });
                }

                () = tokio::time::sleep(pause) => {}
            }
        }
    }
}
