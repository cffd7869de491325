//! Chunk encryption
//!
//! Encrypts the current payload bytes with AES-256-GCM under a
//! caller-supplied key. A fresh random IV is generated per call and
//! recorded in the encryption details together with a cypher checksum
//! over the cipher bytes, so wire corruption is caught before the
//! cipher ever sees the data on the way back.
//!
//! Encryption is the outermost transform: it may wrap a signed and/or
//! compressed chunk, and must be undone first.

use crate::chunk::{CompletedChunk, EncryptionAlgorithm, EncryptionDetails, PeerId};
use crate::{CoreError, Result};
use bytes::Bytes;
use hydro_crypto::{aead, digest, CipherKey};

/// Encrypt a chunk's payload, returning a new record
///
/// Refuses a chunk that is already encrypted.
pub fn encrypt_chunk(
    chunk: &CompletedChunk,
    key: &CipherKey,
    peer_id: PeerId,
    algorithm: EncryptionAlgorithm,
) -> Result<CompletedChunk> {
    if chunk.is_encrypted() {
        return Err(CoreError::Validation(format!(
            "chunk {} is already encrypted",
            chunk.index
        )));
    }

    let (iv, cipher_bytes) = aead::encrypt(key, &chunk.payload.data)?;
    let cypher_checksum = digest(&cipher_bytes);

    tracing::debug!(chunk = chunk.index, %peer_id, "encrypted chunk payload");

    let mut next = chunk.clone();
    next.payload.data = Bytes::from(cipher_bytes);
    next.encryption_details = EncryptionDetails::Encrypted {
        algorithm,
        peer_id,
        cypher_checksum,
        iv,
    };
    next.timestamps = chunk.timestamps.touched();
    Ok(next)
}

/// Decrypt a chunk's payload, returning a new record
///
/// The stored cypher checksum is recomputed over the current bytes
/// first; a mismatch aborts with an integrity error. On success the
/// stored IV inverts the cipher and the details reset to unencrypted.
pub fn decrypt_chunk(chunk: &CompletedChunk, key: &CipherKey) -> Result<CompletedChunk> {
    let EncryptionDetails::Encrypted {
        algorithm: EncryptionAlgorithm::Aes256Gcm,
        ref cypher_checksum,
        ref iv,
        ..
    } = chunk.encryption_details
    else {
        return Err(CoreError::Validation(format!(
            "chunk {} is not encrypted",
            chunk.index
        )));
    };

    let actual = digest(&chunk.payload.data);
    if actual != *cypher_checksum {
        return Err(CoreError::TransportChecksumMismatch {
            index: chunk.index,
            expected: cypher_checksum.to_string(),
            actual: actual.to_string(),
        });
    }

    let plain = aead::decrypt(key, iv, &chunk.payload.data)?;

    let mut next = chunk.clone();
    next.payload.data = Bytes::from(plain);
    next.encryption_details = EncryptionDetails::Unencrypted;
    next.timestamps = chunk.timestamps.touched();
    Ok(next)
}
