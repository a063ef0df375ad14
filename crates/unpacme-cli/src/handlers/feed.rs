//! Feed command handler.

use anyhow::Result;
use unpacme_core::FeedEntry;

use crate::bootstrap::CliContext;
use crate::presentation::format_feed_entry;

/// Which public feed entries to show.
#[derive(Debug, Clone, Copy, Default)]
pub struct FeedFilter {
    pub children_only: bool,
    pub completed_only: bool,
    pub malware_only: bool,
}

impl FeedFilter {
    pub fn accepts(&self, entry: &FeedEntry) -> bool {
        (!self.children_only || entry.has_children())
            && (!self.completed_only || entry.is_complete())
            && (!self.malware_only || entry.has_malware())
    }
}

/// Print recent public analyses.
pub async fn execute(ctx: &CliContext, filter: FeedFilter, sha256_only: bool) -> Result<()> {
    let entries = ctx.client().fetch_public_feed().await?;
    for entry in entries.iter().filter(|entry| filter.accepts(entry)) {
        println!("{}", format_feed_entry(entry, sha256_only));
    }
    Ok(())
}
