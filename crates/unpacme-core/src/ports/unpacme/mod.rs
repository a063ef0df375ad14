//! UnpacMe service port definitions.
//!
//! This module defines the port trait and error type for the remote
//! unpacking service. The actual implementation lives in `unpacme-api`.

mod client;
mod error;

#[cfg(test)]
pub use client::MockUnpacMeClientPort;
pub use client::UnpacMeClientPort;
pub use error::{UnpacMePortError, UnpacMePortResult};
