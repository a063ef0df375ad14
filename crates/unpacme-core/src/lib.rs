#![doc = include_str!("../README.md")]
#![deny(unused_crate_dependencies)]

pub mod domain;
pub mod ports;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::{
    CONTENT_HASH_LEN, ContentHash, FeedEntry, HashMatch, HistoryPage, JobStatus, MalformedHash,
    QuotaSnapshot, ResultSet, ResultShapeError, Submission, SubmissionId, UnpackedArtifact,
};
pub use ports::{UnpacMeClientPort, UnpacMePortError, UnpacMePortResult};
pub use services::{
    AcceptedArtifact, Admission, Artifact, BatchPlan, BatchSubmitter, DEFAULT_POLL_INTERVAL,
    DEFAULT_WARN_THRESHOLD, Deduplicator, HistoryPaginator, InvalidThreshold, PollOutcome,
    PollingConfig, PollingController, QuotaDecision, QuotaGuard, ScreenRejection, ScreenedOut,
    SubmissionOutcome, SubmissionReport,
};

// Silence unused dev-dependency warnings
#[cfg(test)]
use tokio_test as _;
