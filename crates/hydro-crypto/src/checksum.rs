//! Content digests using SHA-256
//!
//! A checksum is the base64-rendered SHA-256 of a byte buffer. The same
//! primitive backs three distinct uses that must not be conflated:
//! - per-chunk content checksums, fixed once at split time
//! - the whole-file hash, streamed incrementally during splitting
//! - transport checksums, recomputed over the current (possibly
//!   compressed or encrypted) bytes after each transform stage

use base64::Engine;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Size of a SHA-256 digest in bytes (256 bits)
pub const DIGEST_BYTE_SIZE: usize = 32;

/// A base64-rendered SHA-256 digest
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Checksum(String);

impl Checksum {
    /// Wrap an already-rendered digest string
    pub fn from_base64(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the rendered digest
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Check whether this checksum matches the digest of `data`
    pub fn matches(&self, data: &[u8]) -> bool {
        digest(data) == *self
    }
}

impl fmt::Debug for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Checksum({})", self.0)
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Compute the content digest of a byte buffer
pub fn digest(data: &[u8]) -> Checksum {
    let hash = Sha256::digest(data);
    Checksum(base64::engine::general_purpose::STANDARD.encode(hash))
}

/// Check a byte buffer against an expected checksum
pub fn is_valid(data: &[u8], checksum: &Checksum) -> bool {
    checksum.matches(data)
}

/// An incremental digest for streaming data
///
/// Lets the splitter hash a whole file while walking it chunk by chunk,
/// without buffering the input twice.
pub struct IncrementalDigest {
    hasher: Sha256,
    bytes_processed: u64,
}

impl IncrementalDigest {
    /// Create a new incremental digest
    pub fn new() -> Self {
        Self {
            hasher: Sha256::new(),
            bytes_processed: 0,
        }
    }

    /// Update the digest with more data
    pub fn update(&mut self, data: &[u8]) {
        self.hasher.update(data);
        self.bytes_processed += data.len() as u64;
    }

    /// Finalize and return the checksum
    pub fn finalize(self) -> Checksum {
        let hash = self.hasher.finalize();
        Checksum(base64::engine::general_purpose::STANDARD.encode(hash))
    }

    /// Get the number of bytes processed
    pub fn bytes_processed(&self) -> u64 {
        self.bytes_processed
    }
}

impl Default for IncrementalDigest {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_consistency() {
        let data = b"test data";
        assert_eq!(digest(data), digest(data));
    }

    #[test]
    fn test_digest_is_base64_sha256() {
        // SHA-256 is 32 bytes, so the base64 rendering is 44 chars
        let checksum = digest(b"Hello, World!");
        assert_eq!(checksum.as_str().len(), 44);
    }

    #[test]
    fn test_is_valid_after_mutation() {
        let mut data = b"some chunk payload".to_vec();
        let checksum = digest(&data);
        assert!(is_valid(&data, &checksum));

        data[0] ^= 0x01;
        assert!(!is_valid(&data, &checksum));
    }

    #[test]
    fn test_empty_input() {
        let checksum = digest(b"");
        assert!(checksum.matches(b""));
        assert!(!checksum.matches(b"x"));
    }

    #[test]
    fn test_incremental_matches_oneshot() {
        let data = b"Hello, World!";
        let full = digest(data);

        let mut incremental = IncrementalDigest::new();
        incremental.update(b"Hello, ");
        incremental.update(b"World!");
        assert_eq!(incremental.bytes_processed(), data.len() as u64);
        assert_eq!(incremental.finalize(), full);
    }
}
