//! Shared CLI presentation utilities.
//!
//! Keep this module format-only: functions take domain values and return the
//! text to print, so output can be tested without capturing stdout.

pub mod records;

pub use records::{
    format_artifact, format_feed_entry, format_hash_match, format_history_line, format_quota,
    format_report, format_screened_out, format_timestamp,
};
