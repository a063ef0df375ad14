//! Quota-aware admission control for batches of submissions.
//!
//! Pure decision logic over a snapshot the caller fetched; no I/O happens here.

use thiserror::Error;

use crate::domain::QuotaSnapshot;

/// Share of the remaining quota above which a batch triggers a warning.
pub const DEFAULT_WARN_THRESHOLD: f64 = 0.2;

/// A warn threshold outside `(0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("Quota warn threshold must be in (0, 1], got {0}")]
pub struct InvalidThreshold(pub f64);

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuotaDecision {
    /// The batch is a small share of what is left.
    Allow,
    /// The batch would use this fraction of the remaining quota, which is
    /// above the threshold. Whether that blocks is the caller's call.
    Warn(f64),
    /// Nothing is left in the current period.
    Deny,
}

impl QuotaDecision {
    #[must_use]
    pub const fn is_allow(self) -> bool {
        matches!(self, Self::Allow)
    }
}

/// Admission policy parameterised by a warn threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuotaGuard {
    warn_threshold: f64,
}

impl Default for QuotaGuard {
    fn default() -> Self {
        Self {
            warn_threshold: DEFAULT_WARN_THRESHOLD,
        }
    }
}

impl QuotaGuard {
    pub fn new(warn_threshold: f64) -> Result<Self, InvalidThreshold> {
        if warn_threshold > 0.0 && warn_threshold <= 1.0 {
            Ok(Self { warn_threshold })
        } else {
            Err(InvalidThreshold(warn_threshold))
        }
    }

    #[must_use]
    pub const fn warn_threshold(&self) -> f64 {
        self.warn_threshold
    }

    /// Decide whether `batch_size` more submissions are safe given `snapshot`.
    ///
    /// An exhausted (or overdrawn) period is denied before any division.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn can_submit(&self, batch_size: usize, snapshot: &QuotaSnapshot) -> QuotaDecision {
        let remaining = snapshot.remaining();
        if remaining <= 0 {
            return QuotaDecision::Deny;
        }

        let fraction = batch_size as f64 / remaining as f64;
        if fraction > self.warn_threshold {
            QuotaDecision::Warn(fraction)
        } else {
            QuotaDecision::Allow
        }
    }
}
