//! Lazy, cursor-driven enumeration of past submissions.

use std::collections::VecDeque;
use std::sync::Arc;

use futures_util::Stream;
use futures_util::stream;
use tracing::debug;

use crate::domain::Submission;
use crate::ports::{UnpacMeClientPort, UnpacMePortResult};

/// Forward-only iterator over the account's submission history.
///
/// Pages are fetched on demand and their items yielded in server order. The
/// sequence ends cleanly when a page carries no cursor or the server reports
/// that the cursor has no more pages. Any other failure is yielded once and
/// ends the sequence. Restarting means building a new paginator.
pub struct HistoryPaginator {
    client: Arc<dyn UnpacMeClientPort>,
    cursor: Option<String>,
    buffer: VecDeque<Submission>,
    pages_fetched: usize,
    finished: bool,
}

impl HistoryPaginator {
    pub fn new(client: Arc<dyn UnpacMeClientPort>) -> Self {
        Self {
            client,
            cursor: None,
            buffer: VecDeque::new(),
            pages_fetched: 0,
            finished: false,
        }
    }

    /// Number of pages requested so far.
    #[must_use]
    pub const fn pages_fetched(&self) -> usize {
        self.pages_fetched
    }

    /// The next submission, or `None` once history is exhausted.
    pub async fn next(&mut self) -> Option<UnpacMePortResult<Submission>> {
        loop {
            if let Some(item) = self.buffer.pop_front() {
                return Some(Ok(item));
            }
            if self.finished {
                return None;
            }

            let cursor = self.cursor.take();
            let first_page = self.pages_fetched == 0;
            debug!(cursor = ?cursor, "Fetching history page");
            self.pages_fetched += 1;

            match self.client.fetch_history_page(cursor).await {
                Ok(page) => {
                    debug!(items = page.items.len(), has_more = page.has_more(), "History page received");
                    self.buffer.extend(page.items);
                    match page.next_cursor {
                        Some(next) => self.cursor = Some(next),
                        None => self.finished = true,
                    }
                }
                Err(e) if e.is_not_found() => {
                    debug!(first_page, "End of history");
                    self.finished = true;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }
    }

    /// Drain the remaining history into memory, stopping at the first error.
    pub async fn collect_all(mut self) -> UnpacMePortResult<Vec<Submission>> {
        let mut items = Vec::new();
        while let Some(item) = self.next().await {
            items.push(item?);
        }
        Ok(items)
    }

    /// Adapt the paginator into a `Stream`.
    pub fn into_stream(self) -> impl Stream<Item = UnpacMePortResult<Submission>> + Send {
        stream::unfold(self, |mut paginator| async move {
            paginator.next().await.map(|item| (item, paginator))
        })
    }
}
