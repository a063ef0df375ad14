//! JSON parsing functions for UnpacMe API responses.
//!
//! The service is inconsistent about field names across endpoints. Every
//! fallback lives here or in `unpacme_core::domain::results`; callers only
//! ever see domain types.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;
use unpacme_core::domain::results::{aggregate, malware_tags, record_hash};
use unpacme_core::{
    ContentHash, FeedEntry, HashMatch, HistoryPage, JobStatus, QuotaSnapshot, ResultSet,
    ResultShapeError, Submission, SubmissionId,
};

use crate::error::{ApiError, ApiResult};
use crate::models::AccessResponse;

// ============================================================================
// Field helpers
// ============================================================================

fn status_of(record: &Value) -> JobStatus {
    record
        .get("status")
        .and_then(Value::as_str)
        .map_or(JobStatus::Unknown, JobStatus::from_token)
}

fn id_of(record: &Value) -> Option<String> {
    match record.get("id").or_else(|| record.get("submission_id"))? {
        Value::String(id) => Some(id.clone()),
        Value::Number(id) => Some(id.to_string()),
        _ => None,
    }
}

/// Parse a unix timestamp in seconds, integer or fractional.
fn timestamp_of(record: &Value, field: &str) -> Option<DateTime<Utc>> {
    let value = record.get(field)?;
    if let Some(secs) = value.as_i64() {
        return DateTime::from_timestamp(secs, 0);
    }
    let secs = value.as_f64()?;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let (whole, nanos) = (secs.floor() as i64, (secs.fract() * 1e9) as u32);
    DateTime::from_timestamp(whole, nanos)
}

fn require_timestamp(record: &Value, field: &'static str) -> ApiResult<DateTime<Utc>> {
    timestamp_of(record, field)
        .ok_or_else(|| ApiError::invalid(format!("missing or invalid '{field}' timestamp")))
}

fn require_id(record: &Value) -> ApiResult<SubmissionId> {
    id_of(record)
        .map(SubmissionId::new)
        .ok_or_else(|| ApiError::invalid("missing submission 'id'"))
}

/// The `results` array of a list response.
fn results_array<'a>(json: &'a Value, what: &str) -> ApiResult<&'a [Value]> {
    json.get("results")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .ok_or_else(|| ApiError::invalid(format!("{what} response has no 'results' list")))
}

// ============================================================================
// Results
// ============================================================================

/// Normalise a results payload.
pub fn parse_results(json: Value) -> ApiResult<ResultSet> {
    Ok(aggregate(json)?)
}

// ============================================================================
// History
// ============================================================================

fn parse_history_item(record: &Value) -> ApiResult<Submission> {
    Ok(Submission {
        id: require_id(record)?,
        status: status_of(record),
        submitted_at: require_timestamp(record, "created")?,
        source_hash: record_hash(record)?,
    })
}

/// Parse one history page. A null or absent `cursor` marks the last page.
pub fn parse_history_page(json: &Value) -> ApiResult<HistoryPage> {
    let items = results_array(json, "history")?
        .iter()
        .map(parse_history_item)
        .collect::<ApiResult<Vec<_>>>()?;

    let next_cursor = match json.get("cursor") {
        Some(Value::String(cursor)) if !cursor.is_empty() => Some(cursor.clone()),
        Some(Value::Number(cursor)) => Some(cursor.to_string()),
        _ => None,
    };

    Ok(HistoryPage { items, next_cursor })
}

// ============================================================================
// Public feed
// ============================================================================

/// Children are reported as a count on the feed and as a list elsewhere.
fn child_count(record: &Value) -> u64 {
    match record.get("children") {
        Some(Value::Number(count)) => count.as_u64().unwrap_or(0),
        Some(Value::Array(children)) => children.len() as u64,
        _ => 0,
    }
}

fn parse_feed_entry(record: &Value) -> ApiResult<FeedEntry> {
    let source_hash = record_hash(record)?;
    let created_at = require_timestamp(record, "created")?;
    Ok(FeedEntry {
        submission: Submission {
            id: require_id(record)?,
            status: status_of(record),
            submitted_at: created_at,
            source_hash: source_hash.clone(),
        },
        source_hash,
        malware_tags: malware_tags(record),
        created_at,
        child_count: child_count(record),
    })
}

pub fn parse_feed(json: &Value) -> ApiResult<Vec<FeedEntry>> {
    results_array(json, "feed")?
        .iter()
        .map(parse_feed_entry)
        .collect()
}

// ============================================================================
// Hash search
// ============================================================================

fn child_hashes(record: &Value) -> ApiResult<Vec<ContentHash>> {
    let Some(children) = record.get("children").and_then(Value::as_array) else {
        return Ok(Vec::new());
    };
    children
        .iter()
        .map(|child| -> ApiResult<ContentHash> {
            match child {
                Value::String(hash) => {
                    Ok(ContentHash::new(hash.as_str()).map_err(ResultShapeError::from)?)
                }
                other => Ok(record_hash(other)?),
            }
        })
        .collect()
}

fn parse_hash_match(record: &Value) -> ApiResult<HashMatch> {
    Ok(HashMatch {
        submission_id: id_of(record),
        status: status_of(record),
        source_hash: record_hash(record)?,
        malware_tags: malware_tags(record),
        created_at: timestamp_of(record, "created"),
        children: child_hashes(record)?,
    })
}

/// Parse search matches, given either as a bare array or under `results`.
pub fn parse_hash_matches(json: &Value) -> ApiResult<Vec<HashMatch>> {
    let records = match json {
        Value::Array(records) => records.as_slice(),
        _ => results_array(json, "search")?,
    };
    records.iter().map(parse_hash_match).collect()
}

// ============================================================================
// Quota
// ============================================================================

pub fn quota_from_access(access: AccessResponse) -> QuotaSnapshot {
    QuotaSnapshot {
        total_submissions_ever: access.total_submissions,
        submissions_this_period: access.month_submissions,
        period_limit: access.month_limit,
        roles: access.roles.into_iter().collect::<BTreeSet<_>>(),
    }
}
