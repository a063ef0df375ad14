//! Status command handler.

use anyhow::{Context, Result};
use tracing::{debug, info, warn};
use unpacme_core::{ContentHash, JobStatus, ResultSet, SubmissionId};

use crate::bootstrap::CliContext;
use crate::presentation::format_artifact;
use crate::utils::files::{WriteOutcome, exists, write_new_file};

/// What to do with a completed job.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusArgs {
    pub list: bool,
    pub details: bool,
    pub download_unpacked_files: bool,
}

impl StatusArgs {
    const fn wants_results(self) -> bool {
        self.list || self.details || self.download_unpacked_files
    }
}

/// Local file name of an unpacked child: `<source sha256>.<child sha256>`.
pub fn unpacked_file_name(results: &ResultSet, child: &ContentHash) -> String {
    format!("{}.{child}", results.source_hash)
}

/// Check a submission once and act on its results if it has completed.
pub async fn execute(ctx: &CliContext, upload_id: &str, args: StatusArgs) -> Result<()> {
    let id = SubmissionId::new(upload_id.trim());
    let status = ctx.client().poll_status(&id).await?;

    if status != JobStatus::Complete {
        info!(submission_id = %id, %status, "Task not completed");
        return Ok(());
    }
    info!(submission_id = %id, "Task completed");

    if !args.wants_results() {
        return Ok(());
    }
    let results = ctx.client().fetch_results(&id).await?;

    if args.details {
        println!("{}", serde_json::to_string_pretty(&results.raw)?);
    }

    if args.list {
        println!("SHA256: {}", results.source_hash);
        println!();
        println!("Unpacked Files");
        println!("---");
        for artifact in &results.artifacts {
            println!("{}", format_artifact(artifact));
        }
    }

    if args.download_unpacked_files {
        download_children(ctx, &results).await?;
    }
    Ok(())
}

async fn download_children(ctx: &CliContext, results: &ResultSet) -> Result<()> {
    for child in results.unpacked_children() {
        let file_name = unpacked_file_name(results, &child.hash);
        let path = std::path::Path::new(&file_name);
        if exists(path).await? {
            warn!(path = %file_name, "Skipping because file already exists");
            continue;
        }

        debug!(path = %file_name, "Downloading");
        let data = ctx.client().download_artifact(&child.hash).await?;
        match write_new_file(path, &data)
            .await
            .with_context(|| format!("Failed to write {file_name}"))?
        {
            WriteOutcome::Written(_) => info!(path = %file_name, "Downloaded unpacked file"),
            WriteOutcome::AlreadyExists(_) => {
                warn!(path = %file_name, "Skipping because file already exists");
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use unpacme_core::UnpackedArtifact;

    #[test]
    fn test_wants_results() {
        assert!(!StatusArgs::default().wants_results());
        assert!(
            StatusArgs {
                details: true,
                ..StatusArgs::default()
            }
            .wants_results()
        );
    }

    #[test]
    fn test_unpacked_file_name() {
        let source = ContentHash::new("a".repeat(64)).unwrap();
        let child = ContentHash::new("b".repeat(64)).unwrap();
        let results = ResultSet {
            source_hash: source,
            status: JobStatus::Complete,
            artifacts: vec![UnpackedArtifact {
                hash: child.clone(),
                malware_tags: vec![],
            }],
            raw: serde_json::Value::Null,
        };
        assert_eq!(
            unpacked_file_name(&results, &child),
            format!("{}.{}", "a".repeat(64), "b".repeat(64))
        );
    }
}
