//! Analysis results and their normalisation.
//!
//! The service is inconsistent about field shapes across endpoints: a record's
//! hash may sit under `hashes.sha256` or directly under `sha256`, and malware
//! classifications appear as `malware_id` or `malwareid` entries keyed by
//! `name` or `match`. All of that is absorbed here so callers only ever see
//! [`ResultSet`] and [`UnpackedArtifact`].

use serde_json::Value;
use thiserror::Error;

use super::{ContentHash, JobStatus, MalformedHash};

/// A result payload that could not be normalised.
#[derive(Debug, Error)]
pub enum ResultShapeError {
    /// A required field was absent or had the wrong JSON type.
    #[error("Result payload is missing field '{0}'")]
    MissingField(&'static str),

    /// A hash field did not hold a valid digest.
    #[error(transparent)]
    MalformedHash(#[from] MalformedHash),
}

/// One artifact listed in a result payload: the submitted file itself or
/// something unpacked from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnpackedArtifact {
    pub hash: ContentHash,
    /// Malware family names in server order; empty when not classified yet.
    pub malware_tags: Vec<String>,
}

/// Results of one submission as of a single fetch.
///
/// Each fetch is authoritative for its instant; result sets are never merged.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub source_hash: ContentHash,
    pub status: JobStatus,
    /// Every listed artifact, including the submitted file.
    pub artifacts: Vec<UnpackedArtifact>,
    /// The payload as received, for detailed display.
    pub raw: Value,
}

impl ResultSet {
    /// Artifacts other than the submitted file.
    pub fn unpacked_children(&self) -> impl Iterator<Item = &UnpackedArtifact> {
        self.artifacts
            .iter()
            .filter(|artifact| artifact.hash != self.source_hash)
    }

    /// Whether the full child set is guaranteed to be present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status == JobStatus::Complete
    }
}

/// Normalise a raw result payload into a [`ResultSet`].
///
/// The source hash comes from the payload's top-level `sha256`; when that is
/// absent the first listed artifact (the submitted file) is used instead. A
/// missing `results` list is treated as empty and a missing `status` as
/// `Unknown`.
pub fn aggregate(raw: Value) -> Result<ResultSet, ResultShapeError> {
    let status = raw
        .get("status")
        .and_then(Value::as_str)
        .map_or(JobStatus::Unknown, JobStatus::from_token);

    let artifacts = match raw.get("results") {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(artifact_from_record)
            .collect::<Result<Vec<_>, _>>()?,
        Some(_) => return Err(ResultShapeError::MissingField("results")),
    };

    let source_hash = match raw.get("sha256").and_then(Value::as_str) {
        Some(hash) => ContentHash::new(hash)?,
        None => artifacts
            .first()
            .map(|artifact| artifact.hash.clone())
            .ok_or(ResultShapeError::MissingField("sha256"))?,
    };

    Ok(ResultSet {
        source_hash,
        status,
        artifacts,
        raw,
    })
}

fn artifact_from_record(record: &Value) -> Result<UnpackedArtifact, ResultShapeError> {
    Ok(UnpackedArtifact {
        hash: record_hash(record)?,
        malware_tags: malware_tags(record),
    })
}

/// Hash of a result or feed record, preferring `hashes.sha256` over `sha256`.
pub fn record_hash(record: &Value) -> Result<ContentHash, ResultShapeError> {
    let hash = record
        .get("hashes")
        .and_then(|hashes| hashes.get("sha256"))
        .and_then(Value::as_str)
        .or_else(|| record.get("sha256").and_then(Value::as_str))
        .ok_or(ResultShapeError::MissingField("sha256"))?;
    Ok(ContentHash::new(hash)?)
}

/// Malware family names of a record, in order. Absent fields yield an empty list.
pub fn malware_tags(record: &Value) -> Vec<String> {
    record
        .get("malware_id")
        .or_else(|| record.get("malwareid"))
        .and_then(Value::as_array)
        .map(|entries| {
            entries
                .iter()
                .filter_map(|entry| match entry {
                    Value::String(name) => Some(name.clone()),
                    _ => entry
                        .get("name")
                        .or_else(|| entry.get("match"))
                        .and_then(Value::as_str)
                        .map(String::from),
                })
                .collect()
        })
        .unwrap_or_default()
}
