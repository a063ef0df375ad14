//! Batch submission: deduplicate, check quota, submit and follow each job.
//!
//! # Flow
//!
//! 1. [`BatchSubmitter::screen`] hashes every artifact, drops repeats within
//!    the batch, and asks the [`Deduplicator`] about the rest.
//! 2. [`BatchSubmitter::admit`] fetches one quota snapshot and runs the
//!    [`QuotaGuard`] over the accepted count.
//! 3. [`BatchSubmitter::dispatch`] runs one task per accepted artifact:
//!    submit, poll to a terminal status, fetch results.
//!
//! Failures are reported per artifact and never abort sibling work.

use std::collections::HashMap;
use std::sync::Arc;

use futures_util::StreamExt;
use futures_util::stream::{self, BoxStream};
use tokio::task::{self, JoinSet};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::deduplicator::Deduplicator;
use super::polling::{PollOutcome, PollingConfig, PollingController};
use super::quota_guard::{QuotaDecision, QuotaGuard};
use crate::domain::{ContentHash, JobStatus, QuotaSnapshot, ResultSet, Submission};
use crate::ports::{UnpacMeClientPort, UnpacMePortError, UnpacMePortResult};

/// Bytes to submit together with a caller-chosen label (usually a file name).
#[derive(Debug, Clone)]
pub struct Artifact {
    pub label: String,
    pub data: Vec<u8>,
}

impl Artifact {
    pub fn new(label: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            label: label.into(),
            data,
        }
    }
}

/// An artifact that passed screening, with its content hash.
#[derive(Debug, Clone)]
pub struct AcceptedArtifact {
    pub label: String,
    pub hash: ContentHash,
    pub data: Vec<u8>,
}

/// Why an artifact was not accepted for submission.
#[derive(Debug)]
pub enum ScreenRejection {
    /// The same content appeared earlier in this batch.
    DuplicateInBatch { first_label: String },
    /// The service already has an analysis for this content.
    AlreadyAnalyzed,
    /// The deduplication check could not be completed.
    CheckFailed(UnpacMePortError),
}

/// An artifact that was screened out.
#[derive(Debug)]
pub struct ScreenedOut {
    pub label: String,
    pub hash: ContentHash,
    pub reason: ScreenRejection,
}

/// Result of screening a batch.
#[derive(Debug, Default)]
pub struct BatchPlan {
    pub accepted: Vec<AcceptedArtifact>,
    pub screened_out: Vec<ScreenedOut>,
}

/// Admission decision along with the snapshot it was based on.
#[derive(Debug, Clone)]
pub struct Admission {
    pub decision: QuotaDecision,
    pub snapshot: QuotaSnapshot,
}

/// What happened to one accepted artifact.
#[derive(Debug)]
pub enum SubmissionOutcome {
    /// Uploaded; polling was not requested.
    Submitted(Submission),
    /// A terminal status was reached and results fetched. `submission.status`
    /// holds the polled terminal state; a `Fail` job's results are best-effort.
    Finished {
        submission: Submission,
        results: ResultSet,
    },
    /// Polling was cancelled before the job finished.
    Cancelled { submission: Submission },
    /// A caller-supplied polling bound was reached.
    Exhausted { submission: Submission },
    /// A request failed. `submission` is set when the upload itself succeeded.
    Failed {
        submission: Option<Submission>,
        error: UnpacMePortError,
    },
}

/// Per-artifact report produced by [`BatchSubmitter::dispatch_stream`].
#[derive(Debug)]
pub struct SubmissionReport {
    pub label: String,
    pub hash: ContentHash,
    pub outcome: SubmissionOutcome,
}

/// Orchestrates a batch upload against a shared client.
#[derive(Clone)]
pub struct BatchSubmitter {
    client: Arc<dyn UnpacMeClientPort>,
    dedup: Deduplicator,
    polling: Option<PollingController>,
}

impl BatchSubmitter {
    /// Build a submitter. With `polling` set to `None` jobs are only uploaded.
    pub fn new(client: Arc<dyn UnpacMeClientPort>, polling: Option<PollingConfig>) -> Self {
        Self {
            dedup: Deduplicator::new(client.clone()),
            polling: polling.map(|config| PollingController::new(client.clone(), config)),
            client,
        }
    }

    /// Hash every artifact, drop in-batch repeats and already-analysed content.
    ///
    /// A failed deduplication check keeps the artifact out of the batch; it is
    /// reported with the error instead.
    pub async fn screen(&self, artifacts: Vec<Artifact>) -> BatchPlan {
        let mut plan = BatchPlan::default();
        let mut first_seen: HashMap<ContentHash, String> = HashMap::new();

        for artifact in artifacts {
            let hash = ContentHash::from_data(&artifact.data);

            if let Some(first_label) = first_seen.get(&hash) {
                debug!(label = %artifact.label, sha256 = %hash, "Duplicate content in batch");
                plan.screened_out.push(ScreenedOut {
                    label: artifact.label,
                    hash,
                    reason: ScreenRejection::DuplicateInBatch {
                        first_label: first_label.clone(),
                    },
                });
                continue;
            }
            first_seen.insert(hash.clone(), artifact.label.clone());

            let reason = match self.dedup.should_skip(&hash).await {
                Ok(false) => None,
                Ok(true) => Some(ScreenRejection::AlreadyAnalyzed),
                Err(e) => {
                    warn!(label = %artifact.label, sha256 = %hash, error = %e, "Deduplication check failed");
                    Some(ScreenRejection::CheckFailed(e))
                }
            };

            match reason {
                None => plan.accepted.push(AcceptedArtifact {
                    label: artifact.label,
                    hash,
                    data: artifact.data,
                }),
                Some(reason) => plan.screened_out.push(ScreenedOut {
                    label: artifact.label,
                    hash,
                    reason,
                }),
            }
        }

        plan
    }

    /// Fetch a single quota snapshot and decide on `batch_size` submissions.
    pub async fn admit(&self, batch_size: usize, guard: &QuotaGuard) -> UnpacMePortResult<Admission> {
        let snapshot = self.client.fetch_quota().await?;
        let decision = guard.can_submit(batch_size, &snapshot);
        debug!(batch_size, remaining = snapshot.remaining(), ?decision, "Quota admission");
        Ok(Admission { decision, snapshot })
    }

    /// Submit every accepted artifact concurrently and follow each job.
    ///
    /// Each task gets a child of `cancel`, so cancelling the parent stops all
    /// polling while tasks stay independent of each other. Reports are yielded
    /// as each job finishes, paired with the artifact's index in `accepted`.
    /// A task that panics is reported as `Failed` for its artifact.
    pub fn dispatch_stream(
        &self,
        accepted: Vec<AcceptedArtifact>,
        cancel: &CancellationToken,
    ) -> BoxStream<'static, (usize, SubmissionReport)> {
        let mut tasks = JoinSet::new();
        let mut in_flight: HashMap<task::Id, (usize, String, ContentHash)> = HashMap::new();

        for (index, artifact) in accepted.into_iter().enumerate() {
            let this = self.clone();
            let token = cancel.child_token();
            let key = (index, artifact.label.clone(), artifact.hash.clone());
            let handle = tasks.spawn(async move { (index, this.run_one(artifact, &token).await) });
            in_flight.insert(handle.id(), key);
        }

        stream::unfold((tasks, in_flight), |(mut tasks, mut in_flight)| async move {
            loop {
                match tasks.join_next_with_id().await? {
                    Ok((id, finished)) => {
                        in_flight.remove(&id);
                        return Some((finished, (tasks, in_flight)));
                    }
                    Err(e) => {
                        let Some((index, label, hash)) = in_flight.remove(&e.id()) else {
                            warn!(error = %e, "Untracked submission task failed");
                            continue;
                        };
                        warn!(label = %label, error = %e, "Submission task panicked");
                        let report = SubmissionReport {
                            label,
                            hash,
                            outcome: SubmissionOutcome::Failed {
                                submission: None,
                                error: UnpacMePortError::transport(format!(
                                    "submission task aborted: {e}"
                                )),
                            },
                        };
                        return Some(((index, report), (tasks, in_flight)));
                    }
                }
            }
        })
        .boxed()
    }

    /// Like [`dispatch_stream`](Self::dispatch_stream), but waits for every
    /// job and returns the reports in the order of `accepted`.
    pub async fn dispatch(
        &self,
        accepted: Vec<AcceptedArtifact>,
        cancel: &CancellationToken,
    ) -> Vec<SubmissionReport> {
        let mut reports: Vec<Option<SubmissionReport>> = accepted.iter().map(|_| None).collect();
        let mut finished = self.dispatch_stream(accepted, cancel);
        while let Some((index, report)) = finished.next().await {
            reports[index] = Some(report);
        }
        reports.into_iter().flatten().collect()
    }

    async fn run_one(&self, artifact: AcceptedArtifact, cancel: &CancellationToken) -> SubmissionReport {
        let AcceptedArtifact { label, hash, data } = artifact;
        let outcome = self.submit_and_follow(&label, &data, cancel).await;
        SubmissionReport {
            label,
            hash,
            outcome,
        }
    }

    async fn submit_and_follow(
        &self,
        label: &str,
        data: &[u8],
        cancel: &CancellationToken,
    ) -> SubmissionOutcome {
        let submission = match self.client.submit(data).await {
            Ok(submission) => submission,
            Err(error) => {
                warn!(label, error = %error, "Upload rejected");
                return SubmissionOutcome::Failed {
                    submission: None,
                    error,
                };
            }
        };
        info!(label, submission_id = %submission.id, sha256 = %submission.source_hash, "Uploaded");

        let Some(polling) = &self.polling else {
            return SubmissionOutcome::Submitted(submission);
        };

        let status = match polling.run(&submission.id, cancel).await {
            Ok(PollOutcome::Terminal(status)) => status,
            Ok(PollOutcome::Cancelled { last_observed }) => {
                return SubmissionOutcome::Cancelled {
                    submission: submission.with_status(last_observed),
                };
            }
            Ok(PollOutcome::Exhausted { last_observed, .. }) => {
                return SubmissionOutcome::Exhausted {
                    submission: submission.with_status(last_observed),
                };
            }
            Err(error) => {
                return SubmissionOutcome::Failed {
                    submission: Some(submission),
                    error,
                };
            }
        };

        let submission = submission.with_status(status);
        if status == JobStatus::Fail {
            warn!(label, submission_id = %submission.id, "Job failed; results are best-effort");
        }

        match self.client.fetch_results(&submission.id).await {
            Ok(results) => SubmissionOutcome::Finished {
                submission,
                results,
            },
            Err(error) => SubmissionOutcome::Failed {
                submission: Some(submission),
                error,
            },
        }
    }
}
