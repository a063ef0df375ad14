//! UnpacMe client port trait.

use super::error::UnpacMePortResult;
use crate::domain::{
    ContentHash, FeedEntry, HashMatch, HistoryPage, JobStatus, QuotaSnapshot, ResultSet,
    Submission, SubmissionId,
};
use async_trait::async_trait;

/// Port trait for the remote unpacking service.
///
/// # Design
///
/// - Each call is a single request/response; nothing is retried or cached
/// - Returns `UnpacMePortError` for all failures, already classified into
///   transport, domain and not-found conditions
/// - Implementations hold no per-call mutable state and are shared across
///   concurrent tasks behind an `Arc`
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UnpacMeClientPort: Send + Sync {
    /// Upload an artifact for unpacking.
    ///
    /// The returned submission has status `Unknown` and a source hash computed
    /// locally from `data`.
    async fn submit(&self, data: &[u8]) -> UnpacMePortResult<Submission>;

    /// Observe the current status of a submission once.
    async fn poll_status(&self, id: &SubmissionId) -> UnpacMePortResult<JobStatus>;

    /// Fetch the results of a submission as of now.
    ///
    /// Callers should only do this after observing a status worth fetching;
    /// see `PollingController`.
    async fn fetch_results(&self, id: &SubmissionId) -> UnpacMePortResult<ResultSet>;

    /// Download the bytes of an artifact.
    async fn download_artifact(&self, hash: &ContentHash) -> UnpacMePortResult<Vec<u8>>;

    /// Fetch the account's current quota usage.
    async fn fetch_quota(&self) -> UnpacMePortResult<QuotaSnapshot>;

    /// Look up previous analyses of an artifact.
    ///
    /// Fails with `UnpacMePortError::NotFound` when the hash is unknown.
    async fn search_by_hash(&self, hash: &ContentHash) -> UnpacMePortResult<Vec<HashMatch>>;

    /// Fetch one page of submission history.
    ///
    /// `cursor` is `None` for the first page and the previous page's
    /// `next_cursor` afterwards. Fails with `UnpacMePortError::NotFound` once
    /// the server has no more pages for the cursor.
    async fn fetch_history_page(&self, cursor: Option<String>) -> UnpacMePortResult<HistoryPage>;

    /// Fetch the public feed of recent analyses.
    async fn fetch_public_feed(&self) -> UnpacMePortResult<Vec<FeedEntry>>;
}
