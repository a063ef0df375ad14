//! Upload command handler.
//!
//! Screens the files, checks the quota once for the whole batch, then uploads
//! and follows every job concurrently. Each result is printed as its job ends.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use unpacme_core::{
    Admission, BatchSubmitter, PollingConfig, QuotaDecision, QuotaGuard, SubmissionOutcome,
};

use crate::bootstrap::CliContext;
use crate::presentation::{format_report, format_screened_out};
use crate::utils::files::read_artifacts;

/// Arguments for the upload command.
#[derive(Debug, Clone)]
pub struct UploadArgs {
    pub file_names: Vec<PathBuf>,
    pub force: bool,
    pub print_id: bool,
    pub poll_interval: Duration,
    pub max_polls: Option<u32>,
}

impl UploadArgs {
    /// Polling schedule, or `None` when only the upload IDs are wanted.
    pub fn polling(&self) -> Option<PollingConfig> {
        if self.print_id {
            return None;
        }
        let config = PollingConfig::new().with_interval(self.poll_interval);
        Some(match self.max_polls {
            Some(attempts) => config.with_max_attempts(attempts),
            None => config,
        })
    }
}

/// Message explaining why an admission decision stops the upload, if it does.
pub fn refusal(admission: &Admission) -> Option<String> {
    match admission.decision {
        QuotaDecision::Allow => None,
        QuotaDecision::Warn(fraction) => Some(format!(
            "This operation would use up {:.0}% of your remaining quota, pass -f to execute it anyway",
            fraction * 100.0
        )),
        QuotaDecision::Deny => Some(format!(
            "Your quota is used up ({} / {}), pass -f to try anyway",
            admission.snapshot.submissions_this_period, admission.snapshot.period_limit
        )),
    }
}

/// Upload files and report each outcome.
pub async fn execute(ctx: &CliContext, args: UploadArgs, cancel: &CancellationToken) -> Result<()> {
    let artifacts = read_artifacts(&args.file_names).await;
    if artifacts.is_empty() {
        bail!("No readable files to upload");
    }

    let submitter = BatchSubmitter::new(ctx.client().clone(), args.polling());
    let plan = submitter.screen(artifacts).await;
    for skipped in &plan.screened_out {
        warn!("{}", format_screened_out(skipped));
    }
    if plan.accepted.is_empty() {
        info!("Nothing left to upload");
        return Ok(());
    }

    if args.force || ctx.ignore_quota {
        info!("Skipping quota check");
    } else {
        let admission = submitter
            .admit(plan.accepted.len(), &QuotaGuard::default())
            .await?;
        if let Some(message) = refusal(&admission) {
            bail!(message);
        }
    }

    let total = plan.accepted.len();
    info!(files = total, "Uploading");
    let mut reports = submitter.dispatch_stream(plan.accepted, cancel);

    let mut failed = 0;
    while let Some((_, report)) = reports.next().await {
        if matches!(report.outcome, SubmissionOutcome::Failed { .. }) {
            failed += 1;
        }
        println!("{}", format_report(&report));
    }

    if failed > 0 {
        bail!("{failed} of {total} uploads failed");
    }
    Ok(())
}
