//! Content identity for artifacts.
//!
//! Every artifact submitted to or produced by the service is identified by the
//! SHA-256 digest of its bytes, rendered as 64 hexadecimal characters.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of hex characters in a SHA-256 digest.
pub const CONTENT_HASH_LEN: usize = 64;

/// A value that could not be turned into a [`ContentHash`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid SHA256 hash: {value:?} (expected {CONTENT_HASH_LEN} hex characters)")]
pub struct MalformedHash {
    /// The rejected input
    pub value: String,
}

/// Canonical content identity of an artifact.
///
/// Equality is byte-for-byte on the digest string; no case folding is applied,
/// so a hash received from the server compares equal only to the exact same
/// rendering.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ContentHash(String);

impl ContentHash {
    /// Build a hash from a trusted digest string.
    pub fn new(value: impl Into<String>) -> Result<Self, MalformedHash> {
        let value = value.into();
        if value.len() != CONTENT_HASH_LEN || !value.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(MalformedHash { value });
        }
        Ok(Self(value))
    }

    /// Compute the hash of raw artifact bytes.
    #[must_use]
    pub fn from_data(data: &[u8]) -> Self {
        Self(format!("{:x}", Sha256::digest(data)))
    }

    /// The digest as lowercase-or-server-provided hex.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = MalformedHash;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ContentHash {
    type Error = MalformedHash;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ContentHash> for String {
    fn from(hash: ContentHash) -> Self {
        hash.0
    }
}
