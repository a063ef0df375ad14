//! Account quota snapshot.

use std::collections::BTreeSet;

/// Point-in-time view of the account's submission quota.
///
/// The counter behind it is shared and mutated server-side, so a snapshot can
/// be stale as soon as it is fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuotaSnapshot {
    pub total_submissions_ever: u64,
    pub submissions_this_period: u64,
    pub period_limit: u64,
    pub roles: BTreeSet<String>,
}

impl QuotaSnapshot {
    /// Submissions left in the current period. Negative when over the limit.
    ///
    /// Saturates at the `i64` bounds.
    #[must_use]
    pub fn remaining(&self) -> i64 {
        let remaining =
            i128::from(self.period_limit) - i128::from(self.submissions_this_period);
        i64::try_from(remaining).unwrap_or(if remaining < 0 { i64::MIN } else { i64::MAX })
    }

    /// Fraction of the period limit already used, or `None` for a zero limit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn usage_fraction(&self) -> Option<f64> {
        if self.period_limit == 0 {
            return None;
        }
        Some(self.submissions_this_period as f64 / self.period_limit as f64)
    }
}
