//! Download command handler.

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use super::parse_hash;
use crate::bootstrap::CliContext;
use crate::utils::files::{WriteOutcome, exists, write_new_file};

/// Download a stored file by hash. Existing files are never overwritten.
pub async fn execute(ctx: &CliContext, sha256: &str, file_name: Option<PathBuf>) -> Result<()> {
    let hash = parse_hash(sha256)?;
    let path = file_name.unwrap_or_else(|| PathBuf::from(hash.as_str()));

    if exists(&path).await? {
        warn!(path = %path.display(), "Skipping because it already exists");
        return Ok(());
    }

    debug!(path = %path.display(), sha256 = %hash, "Downloading");
    let data = ctx.client().download_artifact(&hash).await?;

    match write_new_file(&path, &data)
        .await
        .with_context(|| format!("Failed to write {}", path.display()))?
    {
        WriteOutcome::Written(path) => info!(path = %path.display(), bytes = data.len(), "Downloaded"),
        WriteOutcome::AlreadyExists(path) => {
            warn!(path = %path.display(), "Skipping because it already exists");
        }
    }
    Ok(())
}
