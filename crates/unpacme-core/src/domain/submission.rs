//! Submissions and submission history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::{ContentHash, JobStatus};

/// Opaque server-assigned identifier of a submission.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionId(String);

impl SubmissionId {
    /// Wrap a server-assigned identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubmissionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A job accepted by the service.
///
/// `status` is whatever the server last reported; it is never advanced
/// locally. A freshly uploaded submission starts as `Unknown`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub id: SubmissionId,
    pub status: JobStatus,
    pub submitted_at: DateTime<Utc>,
    pub source_hash: ContentHash,
}

impl Submission {
    /// Copy of this submission carrying a newly observed status.
    #[must_use]
    pub fn with_status(&self, status: JobStatus) -> Self {
        Self {
            status,
            ..self.clone()
        }
    }
}

/// One page of submission history.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HistoryPage {
    /// Submissions in server order.
    pub items: Vec<Submission>,
    /// Continuation token; `None` means this is the last page.
    pub next_cursor: Option<String>,
}

impl HistoryPage {
    /// Whether another page may follow this one.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.next_cursor.is_some()
    }
}
