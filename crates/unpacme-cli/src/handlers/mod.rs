//! Command handlers.
//!
//! Handlers follow the canonical pattern:
//! - Signature: `pub async fn execute(ctx: &CliContext, ...) -> Result<()>`
//! - Thin wrappers that:
//!   1. Parse/validate CLI-specific input
//!   2. Call the client port or a core service
//!   3. Format output for the terminal
//!
//! Handlers should NOT contain lifecycle, deduplication or quota rules; those
//! live in `unpacme-core`.

pub mod download;
pub mod feed;
pub mod history;
pub mod quota;
pub mod search;
pub mod status;
pub mod upload;

use anyhow::{Context, Result};
use unpacme_core::ContentHash;

/// Parse a hash given on the command line, tolerating surrounding whitespace.
pub(crate) fn parse_hash(input: &str) -> Result<ContentHash> {
    input
        .trim()
        .parse::<ContentHash>()
        .with_context(|| format!("\"{}\" is not a SHA256 hash", input.trim()))
}
