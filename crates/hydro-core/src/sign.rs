//! Chunk signing and verification
//!
//! Signatures cover a canonical JSON serialization of
//! `{index, size, checksum, metadata}` rather than the raw payload
//! bytes. Signing the content-checksum proxy bounds signature cost and
//! keeps the signature stable while the payload moves through
//! compression and encryption; the checksum itself ties the signature
//! to the original bytes.
//!
//! Verification runs last in the undo order (decrypt -> decompress ->
//! verify) and additionally re-checks the content checksum against the
//! restored payload bytes.

use crate::chunk::{CompletedChunk, SignatureDetails, SignerId};
use crate::{CoreError, Result};
use chrono::Utc;
use hydro_crypto::{Checksum, Keyring, SigningKeyPair, VerifyingKey};
use serde::Serialize;

/// The canonical byte sequence a chunk signature covers
#[derive(Serialize)]
struct SigningPayload<'a> {
    index: u32,
    size: u64,
    checksum: &'a Checksum,
    metadata: &'a serde_json::Map<String, serde_json::Value>,
}

fn canonical_bytes(chunk: &CompletedChunk) -> Result<Vec<u8>> {
    // serde_json's default map is ordered, so this serialization is
    // canonical for a given chunk
    let empty = serde_json::Map::new();
    let payload = SigningPayload {
        index: chunk.index,
        size: chunk.size,
        checksum: &chunk.payload.checksum,
        metadata: chunk.metadata.as_ref().unwrap_or(&empty),
    };
    Ok(serde_json::to_vec(&payload)?)
}

/// Sign a chunk, returning a new record
///
/// Refuses a chunk that is already signed, and per the ordering
/// contract (sign -> compress -> encrypt) refuses one that has already
/// been compressed or encrypted.
pub fn sign_chunk(
    chunk: &CompletedChunk,
    keypair: &SigningKeyPair,
    signer_id: SignerId,
) -> Result<CompletedChunk> {
    if chunk.is_signed() {
        return Err(CoreError::Validation(format!(
            "chunk {} is already signed",
            chunk.index
        )));
    }
    if chunk.is_compressed() || chunk.is_encrypted() {
        return Err(CoreError::Validation(format!(
            "chunk {} has been transformed; signing must happen first",
            chunk.index
        )));
    }

    let signature = keypair.sign(&canonical_bytes(chunk)?);

    let mut next = chunk.clone();
    next.signature_details = SignatureDetails::Signed {
        signature,
        signer_id,
        signed_at: Utc::now(),
    };
    next.timestamps = chunk.timestamps.touched();
    Ok(next)
}

/// Verify a chunk signature against a known key
///
/// Returns `false` when the signature does not check out or when the
/// content checksum no longer matches the payload bytes; both are
/// integrity outcomes reported as a boolean, never auto-corrected.
/// A chunk that is unsigned, or still compressed or encrypted, is a
/// validation error rather than `false`.
pub fn verify_chunk(chunk: &CompletedChunk, key: &VerifyingKey) -> Result<bool> {
    let SignatureDetails::Signed { ref signature, .. } = chunk.signature_details else {
        return Err(CoreError::Validation(format!(
            "chunk {} is not signed",
            chunk.index
        )));
    };
    if chunk.is_compressed() || chunk.is_encrypted() {
        return Err(CoreError::Validation(format!(
            "chunk {} is still transformed; undo transforms before verifying",
            chunk.index
        )));
    }

    if !key.verify(&canonical_bytes(chunk)?, signature)? {
        return Ok(false);
    }
    Ok(chunk.payload_intact())
}

/// Verify a chunk signature, resolving the key through a keyring
///
/// Fails when no key is registered for the chunk's signer.
pub fn verify_chunk_with_keyring(chunk: &CompletedChunk, keyring: &Keyring) -> Result<bool> {
    let SignatureDetails::Signed { signer_id, .. } = chunk.signature_details else {
        return Err(CoreError::Validation(format!(
            "chunk {} is not signed",
            chunk.index
        )));
    };
    let key = keyring
        .get(&signer_id)
        .ok_or(CoreError::UnknownSigner(signer_id))?;
    verify_chunk(chunk, &key)
}
