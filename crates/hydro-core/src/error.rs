//! Error types for the hydro-core crate

use crate::storage::StorageError;
use thiserror::Error;

/// Result type alias using `CoreError`
pub type Result<T> = std::result::Result<T, CoreError>;

/// Errors that can occur in the chunked-file pipeline
///
/// The taxonomy follows three families that are handled differently by
/// callers: validation errors (invalid state transitions, never
/// retried), integrity errors (checksum or signature mismatches, never
/// auto-corrected), and storage errors (propagated untouched from the
/// storage contract, retry policy is the caller's).
#[derive(Error, Debug)]
pub enum CoreError {
    /// Invalid state transition or precondition violation
    #[error("validation error: {0}")]
    Validation(String),

    /// Transport checksum does not match the current chunk bytes
    #[error("transport checksum mismatch for chunk {index}: expected {expected}, got {actual}")]
    TransportChecksumMismatch {
        index: u32,
        expected: String,
        actual: String,
    },

    /// Merged output length does not match the recorded file size
    #[error("merged size mismatch: expected {expected} bytes, got {actual}")]
    MergedSizeMismatch { expected: u64, actual: u64 },

    /// No key registered for the given signer
    #[error("unknown signer: {0}")]
    UnknownSigner(uuid::Uuid),

    /// Invalid configuration value
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Error from the storage contract, propagated untouched
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    /// Cryptographic operation failed
    #[error("crypto error: {0}")]
    Crypto(#[from] hydro_crypto::CryptoError),

    /// Compression or decompression failed
    #[error("compression error: {0}")]
    Compression(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Serialization(err.to_string())
    }
}
