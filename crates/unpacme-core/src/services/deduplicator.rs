//! Content-addressed deduplication against the service's existing analyses.

use std::sync::Arc;

use tracing::debug;

use crate::domain::ContentHash;
use crate::ports::{UnpacMeClientPort, UnpacMePortResult};

/// Decides whether an artifact has already been analysed remotely.
#[derive(Clone)]
pub struct Deduplicator {
    client: Arc<dyn UnpacMeClientPort>,
}

impl Deduplicator {
    pub fn new(client: Arc<dyn UnpacMeClientPort>) -> Self {
        Self { client }
    }

    /// Whether submitting an artifact with this hash would duplicate an
    /// existing analysis.
    ///
    /// A not-found answer means the artifact is new. Any other failure is
    /// returned as-is: the check could not be completed and the caller must
    /// decide, rather than this method guessing either way.
    pub async fn should_skip(&self, hash: &ContentHash) -> UnpacMePortResult<bool> {
        match self.client.search_by_hash(hash).await {
            Ok(matches) => {
                debug!(sha256 = %hash, matches = matches.len(), "Hash already analyzed");
                Ok(true)
            }
            Err(e) if e.is_not_found() => {
                debug!(sha256 = %hash, "Hash not known to the service");
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }
}
