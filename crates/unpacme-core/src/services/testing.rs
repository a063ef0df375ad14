//! Scripted port implementation for service tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::{
    ContentHash, FeedEntry, HashMatch, HistoryPage, JobStatus, QuotaSnapshot, ResultSet,
    Submission, SubmissionId,
};
use crate::ports::{UnpacMeClientPort, UnpacMePortError, UnpacMePortResult};

/// A fake client that replays scripted answers.
///
/// Status answers are scripted per submission id and consumed in order; once a
/// script runs dry the last answer is repeated. Every call is counted.
#[derive(Default)]
pub struct ScriptedClient {
    statuses: Mutex<HashMap<String, VecDeque<UnpacMePortResult<JobStatus>>>>,
    pages: Mutex<VecDeque<(Option<String>, UnpacMePortResult<HistoryPage>)>>,
    known_hashes: Mutex<Vec<ContentHash>>,
    failing_searches: Mutex<Vec<ContentHash>>,
    rejected_uploads: Mutex<Vec<ContentHash>>,
    panicking_uploads: Mutex<Vec<ContentHash>>,
    quota: Mutex<Option<QuotaSnapshot>>,
    pub status_calls: AtomicUsize,
    pub history_calls: AtomicUsize,
    pub quota_calls: AtomicUsize,
    pub submit_calls: AtomicUsize,
}

impl ScriptedClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_statuses(self, id: &str, statuses: Vec<UnpacMePortResult<JobStatus>>) -> Self {
        self.statuses
            .lock()
            .unwrap()
            .insert(id.to_string(), statuses.into());
        self
    }

    /// Queue a history answer, asserting the cursor it is requested with.
    pub fn with_page(
        self,
        expected_cursor: Option<&str>,
        page: UnpacMePortResult<HistoryPage>,
    ) -> Self {
        self.pages
            .lock()
            .unwrap()
            .push_back((expected_cursor.map(String::from), page));
        self
    }

    pub fn with_known_hash(self, hash: ContentHash) -> Self {
        self.known_hashes.lock().unwrap().push(hash);
        self
    }

    pub fn with_failing_search(self, hash: ContentHash) -> Self {
        self.failing_searches.lock().unwrap().push(hash);
        self
    }

    pub fn with_rejected_upload(self, hash: ContentHash) -> Self {
        self.rejected_uploads.lock().unwrap().push(hash);
        self
    }

    /// Make the upload of `hash` panic inside the client.
    pub fn with_panicking_upload(self, hash: ContentHash) -> Self {
        self.panicking_uploads.lock().unwrap().push(hash);
        self
    }

    pub fn with_quota(self, used: u64, limit: u64) -> Self {
        *self.quota.lock().unwrap() = Some(QuotaSnapshot {
            total_submissions_ever: used,
            submissions_this_period: used,
            period_limit: limit,
            roles: std::collections::BTreeSet::new(),
        });
        self
    }
}

/// Submission ids handed out by the fake are the first 8 hex chars of the hash.
pub fn id_for(hash: &ContentHash) -> String {
    hash.as_str()[..8].to_string()
}

pub fn submission(id: &str, hash: &ContentHash) -> Submission {
    Submission {
        id: SubmissionId::new(id),
        status: JobStatus::Unknown,
        submitted_at: Utc::now(),
        source_hash: hash.clone(),
    }
}

fn clone_result<T: Clone>(result: &UnpacMePortResult<T>) -> UnpacMePortResult<T> {
    match result {
        Ok(value) => Ok(value.clone()),
        Err(UnpacMePortError::Transport { status, message }) => Err(UnpacMePortError::Transport {
            status: *status,
            message: message.clone(),
        }),
        Err(UnpacMePortError::Domain { error, description }) => Err(UnpacMePortError::Domain {
            error: error.clone(),
            description: description.clone(),
        }),
        Err(UnpacMePortError::NotFound { description }) => Err(UnpacMePortError::NotFound {
            description: description.clone(),
        }),
        Err(UnpacMePortError::MalformedHash(e)) => Err(UnpacMePortError::MalformedHash(e.clone())),
    }
}

#[async_trait]
impl UnpacMeClientPort for ScriptedClient {
    async fn submit(&self, data: &[u8]) -> UnpacMePortResult<Submission> {
        self.submit_calls.fetch_add(1, Ordering::SeqCst);
        let hash = ContentHash::from_data(data);
        let panics = self.panicking_uploads.lock().unwrap().contains(&hash);
        assert!(!panics, "scripted upload panic");
        if self.rejected_uploads.lock().unwrap().contains(&hash) {
            return Err(UnpacMePortError::Domain {
                error: "quota_exceeded".to_string(),
                description: "Monthly submission limit reached".to_string(),
            });
        }
        Ok(submission(&id_for(&hash), &hash))
    }

    async fn poll_status(&self, id: &SubmissionId) -> UnpacMePortResult<JobStatus> {
        self.status_calls.fetch_add(1, Ordering::SeqCst);
        let mut statuses = self.statuses.lock().unwrap();
        let script = statuses
            .get_mut(id.as_str())
            .ok_or_else(|| UnpacMePortError::transport(format!("no script for {id}")))?;
        if script.len() > 1 {
            script.pop_front().unwrap_or(Ok(JobStatus::Unknown))
        } else {
            script
                .front()
                .map_or(Ok(JobStatus::Unknown), clone_result)
        }
    }

    async fn fetch_results(&self, id: &SubmissionId) -> UnpacMePortResult<ResultSet> {
        let hash = ContentHash::new(format!("{}{}", id, "0".repeat(56)))?;
        Ok(ResultSet {
            source_hash: hash.clone(),
            status: JobStatus::Complete,
            artifacts: vec![crate::domain::UnpackedArtifact {
                hash,
                malware_tags: vec![],
            }],
            raw: serde_json::Value::Null,
        })
    }

    async fn download_artifact(&self, _hash: &ContentHash) -> UnpacMePortResult<Vec<u8>> {
        Ok(Vec::new())
    }

    async fn fetch_quota(&self) -> UnpacMePortResult<QuotaSnapshot> {
        self.quota_calls.fetch_add(1, Ordering::SeqCst);
        self.quota
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| UnpacMePortError::transport("no quota scripted"))
    }

    async fn search_by_hash(&self, hash: &ContentHash) -> UnpacMePortResult<Vec<HashMatch>> {
        if self.failing_searches.lock().unwrap().contains(hash) {
            return Err(UnpacMePortError::Transport {
                status: Some(503),
                message: "unavailable".to_string(),
            });
        }
        if self.known_hashes.lock().unwrap().contains(hash) {
            return Ok(vec![HashMatch {
                submission_id: Some(id_for(hash)),
                status: JobStatus::Complete,
                source_hash: hash.clone(),
                malware_tags: vec![],
                created_at: None,
                children: vec![],
            }]);
        }
        Err(UnpacMePortError::NotFound {
            description: "Hash not found".to_string(),
        })
    }

    async fn fetch_history_page(&self, cursor: Option<String>) -> UnpacMePortResult<HistoryPage> {
        self.history_calls.fetch_add(1, Ordering::SeqCst);
        let (expected, page) = self
            .pages
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| UnpacMePortError::transport("history fetched past script"))?;
        assert_eq!(cursor, expected, "history cursor was not round-tripped verbatim");
        page
    }

    async fn fetch_public_feed(&self) -> UnpacMePortResult<Vec<FeedEntry>> {
        Ok(Vec::new())
    }
}
