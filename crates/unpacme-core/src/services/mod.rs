//! Submission services built on top of the client port.
//!
//! - `deduplicator` - skip artifacts the service has already analysed
//! - `quota_guard` - pure admission decision over a quota snapshot
//! - `polling` - drive one submission to a terminal status
//! - `history` - lazy cursor-driven enumeration of past submissions
//! - `batch` - the end-to-end batch upload flow

mod batch;
mod deduplicator;
mod history;
mod polling;
mod quota_guard;

#[cfg(test)]
pub(crate) mod testing;

pub use batch::{
    AcceptedArtifact, Admission, Artifact, BatchPlan, BatchSubmitter, ScreenRejection,
    ScreenedOut, SubmissionOutcome, SubmissionReport,
};
pub use deduplicator::Deduplicator;
pub use history::HistoryPaginator;
pub use polling::{DEFAULT_POLL_INTERVAL, PollOutcome, PollingConfig, PollingController};
pub use quota_guard::{DEFAULT_WARN_THRESHOLD, InvalidThreshold, QuotaDecision, QuotaGuard};
