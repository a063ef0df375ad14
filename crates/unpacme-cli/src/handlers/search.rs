//! Search command handler.

use anyhow::Result;

use super::parse_hash;
use crate::bootstrap::CliContext;
use crate::presentation::format_hash_match;

/// Look up previous analyses of a hash.
///
/// An unknown hash is reported, not treated as a failure.
pub async fn execute(ctx: &CliContext, sha256: &str) -> Result<()> {
    let hash = parse_hash(sha256)?;

    let matches = match ctx.client().search_by_hash(&hash).await {
        Ok(matches) => matches,
        Err(e) if e.is_not_found() => {
            println!("No analysis found for {hash}.");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    for (index, found) in matches.iter().enumerate() {
        if index > 0 {
            println!();
        }
        print!("{}", format_hash_match(found));
    }
    Ok(())
}
