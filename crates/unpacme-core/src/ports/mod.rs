//! Port definitions (trait abstractions) for external systems.
//!
//! Ports define the interfaces that the core domain expects from infrastructure.
//! They contain no implementation details and use only domain types.
//!
//! # Design Rules
//!
//! - No `reqwest` or `url` types in any signature
//! - Every failure is classified into the port error before it reaches a service
//! - Operations never retry

pub mod unpacme;

pub use unpacme::{UnpacMeClientPort, UnpacMePortError, UnpacMePortResult};
