//! Text rendering of service records.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use unpacme_core::{
    FeedEntry, HashMatch, QuotaSnapshot, ScreenRejection, ScreenedOut, Submission,
    SubmissionOutcome, SubmissionReport, UnpackedArtifact,
};

/// Render a timestamp as `YYYY-MM-DD HH:MM:SS` (UTC).
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Render a fraction as a whole percentage.
fn percent(fraction: f64) -> String {
    format!("{:.0}%", fraction * 100.0)
}

pub fn format_quota(quota: &QuotaSnapshot) -> String {
    match quota.usage_fraction() {
        Some(fraction) => format!(
            "You already used {} ({} / {}) of your quota this month.",
            percent(fraction),
            quota.submissions_this_period,
            quota.period_limit
        ),
        None => format!(
            "No monthly limit reported; {} submissions this month.",
            quota.submissions_this_period
        ),
    }
}

/// `created id sha256 (status)`
pub fn format_history_line(submission: &Submission) -> String {
    format!(
        "{} {} {} ({})",
        format_timestamp(&submission.submitted_at),
        submission.id,
        submission.source_hash,
        submission.status
    )
}

pub fn format_feed_entry(entry: &FeedEntry, sha256_only: bool) -> String {
    if sha256_only {
        return entry.source_hash.to_string();
    }
    format!(
        "{}: {} ({}) {}",
        format_timestamp(&entry.created_at),
        entry.submission.id,
        entry.source_hash,
        entry.malware_tags.join(", ")
    )
    .trim_end()
    .to_string()
}

/// Multi-line description of a search match, ending with its unpacked files.
pub fn format_hash_match(found: &HashMatch) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "SHA256: {}", found.source_hash);
    let _ = writeln!(
        out,
        "Submission-ID: {}",
        found.submission_id.as_deref().unwrap_or("-")
    );
    if let Some(created) = found.created_at {
        let _ = writeln!(out, "Created at: {}", format_timestamp(&created));
    }
    let _ = writeln!(out, "Status: {}", found.status);
    if !found.malware_tags.is_empty() {
        let _ = writeln!(out, "Malware: {}", found.malware_tags.join(", "));
    }
    let _ = writeln!(out);
    let _ = writeln!(out, "Unpacked Files");
    for child in &found.children {
        let _ = writeln!(out, "{child}");
    }
    out
}

/// `hash (family, family)`, or just the hash when nothing was identified.
pub fn format_artifact(artifact: &UnpackedArtifact) -> String {
    if artifact.malware_tags.is_empty() {
        artifact.hash.to_string()
    } else {
        format!("{} ({})", artifact.hash, artifact.malware_tags.join(", "))
    }
}

pub fn format_screened_out(skipped: &ScreenedOut) -> String {
    match &skipped.reason {
        ScreenRejection::DuplicateInBatch { first_label } => format!(
            "\"{}\" has the same content as \"{first_label}\", skipping.",
            skipped.label
        ),
        ScreenRejection::AlreadyAnalyzed => {
            format!("Hash of \"{}\" already exists, skipping.", skipped.label)
        }
        ScreenRejection::CheckFailed(err) => format!(
            "Could not check whether \"{}\" was already analyzed ({err}), skipping.",
            skipped.label
        ),
    }
}

pub fn format_report(report: &SubmissionReport) -> String {
    let label = &report.label;
    match &report.outcome {
        SubmissionOutcome::Submitted(submission) => {
            format!("{label}: your upload ID: {}", submission.id)
        }
        SubmissionOutcome::Finished {
            submission,
            results,
        } => {
            let mut out = format!(
                "{label}: unpacking finished with status {} (upload ID {})",
                results.status, submission.id
            );
            for artifact in results.unpacked_children() {
                let _ = write!(out, "\n  {}", format_artifact(artifact));
            }
            out
        }
        SubmissionOutcome::Cancelled { submission } => format!(
            "{label}: stopped waiting for upload ID {} ({})",
            submission.id, submission.status
        ),
        SubmissionOutcome::Exhausted { submission } => format!(
            "{label}: upload ID {} is still {}; check later with `unpacme status {}`",
            submission.id, submission.status, submission.id
        ),
        SubmissionOutcome::Failed {
            submission: Some(submission),
            error,
        } => format!("{label}: upload ID {} failed: {error}", submission.id),
        SubmissionOutcome::Failed {
            submission: None,
            error,
        } => format!("{label}: upload failed: {error}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::collections::BTreeSet;
    use unpacme_core::{ContentHash, JobStatus, ResultSet, SubmissionId, UnpacMePortError};

    fn hash(c: char) -> ContentHash {
        ContentHash::new(c.to_string().repeat(64)).unwrap()
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
    }

    fn submission(status: JobStatus) -> Submission {
        Submission {
            id: SubmissionId::new("Fk2xQ"),
            status,
            submitted_at: at(),
            source_hash: hash('a'),
        }
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(&at()), "2021-03-04 05:06:07");
    }

    #[test]
    fn test_format_quota() {
        let quota = QuotaSnapshot {
            total_submissions_ever: 100,
            submissions_this_period: 40,
            period_limit: 100,
            roles: BTreeSet::new(),
        };
        assert_eq!(
            format_quota(&quota),
            "You already used 40% (40 / 100) of your quota this month."
        );

        let unlimited = QuotaSnapshot {
            period_limit: 0,
            ..quota
        };
        assert!(format_quota(&unlimited).starts_with("No monthly limit"));
    }

    #[test]
    fn test_format_history_line() {
        let line = format_history_line(&submission(JobStatus::Complete));
        assert_eq!(
            line,
            format!("2021-03-04 05:06:07 Fk2xQ {} (complete)", "a".repeat(64))
        );
    }

    #[test]
    fn test_format_feed_entry() {
        let entry = FeedEntry {
            submission: submission(JobStatus::Complete),
            source_hash: hash('b'),
            malware_tags: vec!["Emotet".into(), "IcedID".into()],
            created_at: at(),
            child_count: 2,
        };
        assert_eq!(format_feed_entry(&entry, true), "b".repeat(64));
        assert_eq!(
            format_feed_entry(&entry, false),
            format!("2021-03-04 05:06:07: Fk2xQ ({}) Emotet, IcedID", "b".repeat(64))
        );

        let untagged = FeedEntry {
            malware_tags: vec![],
            ..entry
        };
        assert!(format_feed_entry(&untagged, false).ends_with(')'));
    }

    #[test]
    fn test_format_hash_match() {
        let found = HashMatch {
            submission_id: None,
            status: JobStatus::Complete,
            source_hash: hash('c'),
            malware_tags: vec![],
            created_at: None,
            children: vec![hash('d')],
        };
        let text = format_hash_match(&found);
        assert!(text.contains("Submission-ID: -"));
        assert!(!text.contains("Created at"));
        assert!(text.ends_with(&format!("Unpacked Files\n{}\n", "d".repeat(64))));
    }

    #[test]
    fn test_format_artifact() {
        let plain = UnpackedArtifact {
            hash: hash('e'),
            malware_tags: vec![],
        };
        assert_eq!(format_artifact(&plain), "e".repeat(64));

        let tagged = UnpackedArtifact {
            hash: hash('e'),
            malware_tags: vec!["Emotet".into()],
        };
        assert_eq!(format_artifact(&tagged), format!("{} (Emotet)", "e".repeat(64)));
    }

    #[test]
    fn test_format_screened_out() {
        let skipped = ScreenedOut {
            label: "b.exe".into(),
            hash: hash('a'),
            reason: ScreenRejection::DuplicateInBatch {
                first_label: "a.exe".into(),
            },
        };
        assert!(format_screened_out(&skipped).contains("\"a.exe\""));

        let known = ScreenedOut {
            label: "c.exe".into(),
            hash: hash('a'),
            reason: ScreenRejection::AlreadyAnalyzed,
        };
        assert_eq!(
            format_screened_out(&known),
            "Hash of \"c.exe\" already exists, skipping."
        );
    }

    #[test]
    fn test_format_report_outcomes() {
        let submitted = SubmissionReport {
            label: "a.exe".into(),
            hash: hash('a'),
            outcome: SubmissionOutcome::Submitted(submission(JobStatus::Unknown)),
        };
        assert_eq!(format_report(&submitted), "a.exe: your upload ID: Fk2xQ");

        let finished = SubmissionReport {
            label: "a.exe".into(),
            hash: hash('a'),
            outcome: SubmissionOutcome::Finished {
                submission: submission(JobStatus::Complete),
                results: ResultSet {
                    source_hash: hash('a'),
                    status: JobStatus::Complete,
                    artifacts: vec![
                        UnpackedArtifact {
                            hash: hash('a'),
                            malware_tags: vec![],
                        },
                        UnpackedArtifact {
                            hash: hash('b'),
                            malware_tags: vec!["Emotet".into()],
                        },
                    ],
                    raw: serde_json::Value::Null,
                },
            },
        };
        let text = format_report(&finished);
        assert_eq!(text.lines().count(), 2);
        assert!(text.ends_with("(Emotet)"));

        let failed = SubmissionReport {
            label: "a.exe".into(),
            hash: hash('a'),
            outcome: SubmissionOutcome::Failed {
                submission: None,
                error: UnpacMePortError::Domain {
                    error: "quota_exceeded".into(),
                    description: "limit reached".into(),
                },
            },
        };
        assert!(format_report(&failed).contains("quota_exceeded"));
    }
}
