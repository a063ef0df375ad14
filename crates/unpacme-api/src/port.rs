//! Port trait implementation for `UnpacMeClient`.
//!
//! This module implements the core-owned `UnpacMeClientPort` trait, mapping
//! every internal `ApiError` onto one of the port's error classes.

use async_trait::async_trait;
use unpacme_core::{
    ContentHash, FeedEntry, HashMatch, HistoryPage, JobStatus, QuotaSnapshot, ResultSet,
    Submission, SubmissionId, UnpacMeClientPort, UnpacMePortError, UnpacMePortResult,
};

use crate::client::UnpacMeClient;
use crate::error::ApiError;
use crate::http::HttpBackend;

// ============================================================================
// Error Mapping
// ============================================================================

/// Convert internal `ApiError` to core `UnpacMePortError`.
fn map_error(err: ApiError) -> UnpacMePortError {
    match err {
        ApiError::Domain { error, description } => UnpacMePortError::Domain { error, description },
        ApiError::NotFound { description } => UnpacMePortError::NotFound { description },
        ApiError::ApiRequestFailed { status, url } => UnpacMePortError::Transport {
            status: Some(status),
            message: format!("unexpected response from {url}"),
        },
        ApiError::InvalidResponse { message } => UnpacMePortError::transport(message),
        ApiError::Network(e) => UnpacMePortError::Transport {
            status: e.status().map(|s| s.as_u16()),
            message: e.to_string(),
        },
        ApiError::InvalidUrl(e) => UnpacMePortError::transport(e.to_string()),
        ApiError::JsonParse(e) => {
            UnpacMePortError::transport(format!("undecodable response body: {e}"))
        }
    }
}

// ============================================================================
// Port Implementation
// ============================================================================

#[async_trait]
impl<B: HttpBackend + Send + Sync> UnpacMeClientPort for UnpacMeClient<B> {
    async fn submit(&self, data: &[u8]) -> UnpacMePortResult<Submission> {
        self.submit_file(data).await.map_err(map_error)
    }

    async fn poll_status(&self, id: &SubmissionId) -> UnpacMePortResult<JobStatus> {
        self.job_status(id).await.map_err(map_error)
    }

    async fn fetch_results(&self, id: &SubmissionId) -> UnpacMePortResult<ResultSet> {
        self.job_results(id).await.map_err(map_error)
    }

    async fn download_artifact(&self, hash: &ContentHash) -> UnpacMePortResult<Vec<u8>> {
        self.download(hash).await.map_err(map_error)
    }

    async fn fetch_quota(&self) -> UnpacMePortResult<QuotaSnapshot> {
        self.quota().await.map_err(map_error)
    }

    async fn search_by_hash(&self, hash: &ContentHash) -> UnpacMePortResult<Vec<HashMatch>> {
        self.search_hash(hash).await.map_err(map_error)
    }

    async fn fetch_history_page(&self, cursor: Option<String>) -> UnpacMePortResult<HistoryPage> {
        self.history_page(cursor.as_deref()).await.map_err(map_error)
    }

    async fn fetch_public_feed(&self) -> UnpacMePortResult<Vec<FeedEntry>> {
        self.public_feed().await.map_err(map_error)
    }
}
