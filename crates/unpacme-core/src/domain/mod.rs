//! Core domain types.
//!
//! These types are plain values with no back-references to the client or to
//! each other.
//!
//! # Structure
//!
//! - `hash` - Content identity (`ContentHash`)
//! - `status` - Remote job lifecycle (`JobStatus`)
//! - `submission` - Submissions and history pages
//! - `results` - Result sets and payload normalisation
//! - `quota` - Quota snapshots
//! - `feed` - Public feed entries and hash search matches

mod feed;
mod hash;
mod quota;
pub mod results;
mod status;
mod submission;

pub use feed::{FeedEntry, HashMatch};
pub use hash::{CONTENT_HASH_LEN, ContentHash, MalformedHash};
pub use quota::QuotaSnapshot;
pub use results::{ResultSet, ResultShapeError, UnpackedArtifact};
pub use status::JobStatus;
pub use submission::{HistoryPage, Submission, SubmissionId};
