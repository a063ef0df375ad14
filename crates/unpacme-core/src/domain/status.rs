//! Remote job lifecycle.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of a submission as reported by the service.
///
/// The nominal progression is `Validating` → `Queued` → `Analyzing` →
/// `UnpackPending` → `Unpacking` → `Unpacked` → `PostAnalysis` → `Complete`.
/// `Fail` is terminal and out of band; `Unknown` covers a status that has not
/// been observed yet or a token this client does not recognise.
///
/// Observed status is not guaranteed to be monotonic: the service may retry
/// internally and report an earlier state again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case", from = "String")]
pub enum JobStatus {
    /// The status has not been observed or was not recognised.
    #[default]
    Unknown,
    /// The upload is being validated. No results yet.
    Validating,
    /// Queued for analysis. No results yet.
    Queued,
    /// Being analysed before an unpacker is selected. No results yet.
    Analyzing,
    /// Unpacker selected, waiting to unpack. Only the submitted file's own
    /// analysis is present.
    UnpackPending,
    /// Being unpacked. Only the submitted file's own analysis is present.
    Unpacking,
    /// Unpacked. Only the submitted file's own analysis is present.
    Unpacked,
    /// Unpacked children are being analysed and may start to appear.
    PostAnalysis,
    /// Finished; the full child set is present.
    Complete,
    /// Finished with errors; results may be partial or empty.
    Fail,
}

impl JobStatus {
    /// Every known status, in nominal order followed by the out-of-band ones.
    pub const ALL: [Self; 10] = [
        Self::Validating,
        Self::Queued,
        Self::Analyzing,
        Self::UnpackPending,
        Self::Unpacking,
        Self::Unpacked,
        Self::PostAnalysis,
        Self::Complete,
        Self::Fail,
        Self::Unknown,
    ];

    /// Map a wire token to a status. Unrecognised tokens map to `Unknown`.
    #[must_use]
    pub fn from_token(token: &str) -> Self {
        match token {
            "validating" => Self::Validating,
            "queued" => Self::Queued,
            "analyzing" => Self::Analyzing,
            "unpack_pending" => Self::UnpackPending,
            "unpacking" => Self::Unpacking,
            "unpacked" => Self::Unpacked,
            "post_analysis" => Self::PostAnalysis,
            "complete" => Self::Complete,
            "fail" => Self::Fail,
            _ => Self::Unknown,
        }
    }

    /// The wire token for this status.
    #[must_use]
    pub const fn as_token(self) -> &'static str {
        match self {
            Self::Unknown => "unknown",
            Self::Validating => "validating",
            Self::Queued => "queued",
            Self::Analyzing => "analyzing",
            Self::UnpackPending => "unpack_pending",
            Self::Unpacking => "unpacking",
            Self::Unpacked => "unpacked",
            Self::PostAnalysis => "post_analysis",
            Self::Complete => "complete",
            Self::Fail => "fail",
        }
    }

    /// Whether no further server-side progress will occur.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Complete | Self::Fail)
    }

    /// Position in the nominal progress sequence.
    ///
    /// `Fail` and `Unknown` are outside the sequence and return `None`.
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Validating => Some(0),
            Self::Queued => Some(1),
            Self::Analyzing => Some(2),
            Self::UnpackPending => Some(3),
            Self::Unpacking => Some(4),
            Self::Unpacked => Some(5),
            Self::PostAnalysis => Some(6),
            Self::Complete => Some(7),
            Self::Fail | Self::Unknown => None,
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl From<String> for JobStatus {
    fn from(token: String) -> Self {
        Self::from_token(&token)
    }
}

impl FromStr for JobStatus {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from_token(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_token_known_tokens() {
        let cases = [
            ("validating", JobStatus::Validating),
            ("queued", JobStatus::Queued),
            ("analyzing", JobStatus::Analyzing),
            ("unpack_pending", JobStatus::UnpackPending),
            ("unpacking", JobStatus::Unpacking),
            ("unpacked", JobStatus::Unpacked),
            ("post_analysis", JobStatus::PostAnalysis),
            ("complete", JobStatus::Complete),
            ("fail", JobStatus::Fail),
        ];
        for (token, expected) in cases {
            assert_eq!(JobStatus::from_token(token), expected);
            assert_eq!(expected.as_token(), token);
        }
    }

    #[test]
    fn from_token_unknown_tokens() {
        for token in ["", "COMPLETE", "done", "unknown", "post-analysis"] {
            assert_eq!(JobStatus::from_token(token), JobStatus::Unknown);
        }
        assert_eq!("whatever".parse::<JobStatus>(), Ok(JobStatus::Unknown));
    }

    #[test]
    fn terminal_set() {
        let terminal: Vec<_> = JobStatus::ALL.into_iter().filter(|s| s.is_terminal()).collect();
        assert_eq!(terminal, vec![JobStatus::Complete, JobStatus::Fail]);
    }

    #[test]
    fn rank_follows_nominal_order() {
        let ranks: Vec<_> = JobStatus::ALL.iter().filter_map(|s| s.rank()).collect();
        assert_eq!(ranks, (0..8).collect::<Vec<u8>>());
        assert_eq!(JobStatus::Fail.rank(), None);
        assert_eq!(JobStatus::Unknown.rank(), None);
    }

    #[test]
    fn deserialize_never_fails_on_a_token() {
        let status: JobStatus = serde_json::from_str("\"sleeping\"").unwrap();
        assert_eq!(status, JobStatus::Unknown);

        let status: JobStatus = serde_json::from_str("\"post_analysis\"").unwrap();
        assert_eq!(status, JobStatus::PostAnalysis);
        assert_eq!(
            serde_json::to_string(&JobStatus::UnpackPending).unwrap(),
            "\"unpack_pending\""
        );
    }
}
