//! Upload, status, results and download endpoints.

use chrono::Utc;
use tracing::{debug, info};
use unpacme_core::{ContentHash, JobStatus, ResultSet, Submission, SubmissionId};

use crate::error::ApiResult;
use crate::http::HttpBackend;
use crate::models::{StatusResponse, UploadResponse};
use crate::parsing::parse_results;
use crate::url::{build_download_url, build_results_url, build_status_url, build_upload_url};

use super::{UnpacMeClient, classify, decode_json};

impl<B: HttpBackend> UnpacMeClient<B> {
    /// Upload a file for unpacking.
    ///
    /// The returned submission carries status `Unknown` until the first
    /// status query.
    pub(crate) async fn submit_file(&self, data: &[u8]) -> ApiResult<Submission> {
        let source_hash = ContentHash::from_data(data);
        let url = build_upload_url(&self.config);

        let response = self.backend.post_file(&url, data.to_vec()).await?;
        let body = classify(&url, response)?;
        let upload: UploadResponse = decode_json(&body)?;

        info!(submission_id = %upload.id, sha256 = %source_hash, "Submitted file");
        Ok(Submission {
            id: SubmissionId::new(upload.id),
            status: JobStatus::Unknown,
            submitted_at: Utc::now(),
            source_hash,
        })
    }

    pub(crate) async fn job_status(&self, id: &SubmissionId) -> ApiResult<JobStatus> {
        let url = build_status_url(&self.config, id);
        let response: StatusResponse = self.get_json(&url).await?;
        let status = JobStatus::from_token(&response.status);
        debug!(submission_id = %id, %status, "Fetched status");
        Ok(status)
    }

    pub(crate) async fn job_results(&self, id: &SubmissionId) -> ApiResult<ResultSet> {
        let url = build_results_url(&self.config, id);
        let json: serde_json::Value = self.get_json(&url).await?;
        let results = parse_results(json)?;
        debug!(
            submission_id = %id,
            sha256 = %results.source_hash,
            artifacts = results.artifacts.len(),
            "Fetched results"
        );
        Ok(results)
    }

    /// Download the raw bytes of a stored artifact.
    pub(crate) async fn download(&self, hash: &ContentHash) -> ApiResult<Vec<u8>> {
        let url = build_download_url(&self.config, hash);
        let bytes = self.get_bytes(&url).await?;
        debug!(sha256 = %hash, bytes = bytes.len(), "Downloaded artifact");
        Ok(bytes)
    }
}
