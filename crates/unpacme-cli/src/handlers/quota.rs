//! Quota command handler.

use anyhow::Result;
use tracing::debug;

use crate::bootstrap::CliContext;
use crate::presentation::format_quota;

/// Print how much of this month's quota has been used.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let quota = ctx.client().fetch_quota().await?;
    debug!(?quota, "Quota");
    println!("{}", format_quota(&quota));
    Ok(())
}
