//! Read-only records curated by the service: public feed and hash search.

use chrono::{DateTime, Utc};

use super::{ContentHash, JobStatus, Submission};

/// An entry of the public analysis feed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub submission: Submission,
    pub source_hash: ContentHash,
    pub malware_tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub child_count: u64,
}

impl FeedEntry {
    #[must_use]
    pub const fn has_children(&self) -> bool {
        self.child_count > 0
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.submission.status == JobStatus::Complete
    }

    #[must_use]
    pub fn has_malware(&self) -> bool {
        !self.malware_tags.is_empty()
    }
}

/// A previous analysis matching a searched hash.
///
/// The search endpoint returns a looser shape than the feed, so every field
/// other than the source hash is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashMatch {
    pub submission_id: Option<String>,
    pub status: JobStatus,
    pub source_hash: ContentHash,
    pub malware_tags: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub children: Vec<ContentHash>,
}
