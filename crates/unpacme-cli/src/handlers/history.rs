//! History command handler.

use std::pin::pin;

use anyhow::Result;
use futures_util::StreamExt;
use unpacme_core::HistoryPaginator;

use crate::bootstrap::CliContext;
use crate::presentation::format_history_line;

/// Print every past submission, fetching pages as the output advances.
pub async fn execute(ctx: &CliContext) -> Result<()> {
    let mut submissions = pin!(HistoryPaginator::new(ctx.client().clone()).into_stream());

    while let Some(submission) = submissions.next().await {
        println!("{}", format_history_line(&submission?));
    }
    Ok(())
}
