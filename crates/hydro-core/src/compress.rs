//! Chunk compression
//!
//! Replaces the payload bytes with compressed bytes and records a
//! transport checksum over them, independent of the content checksum
//! fixed at split time, so an integrity failure can be localized to the
//! compression stage.
//!
//! Ordering contract: transforms apply as sign -> compress -> encrypt
//! and undo as decrypt -> decompress -> verify. Compressing an
//! encrypted chunk or decompressing a still-encrypted chunk is a
//! validation error.

use crate::chunk::{CompletedChunk, CompressionAlgorithm, CompressionDetails};
use crate::{CoreError, Result};
use bytes::Bytes;
use flate2::write::{GzEncoder, ZlibEncoder};
use flate2::Compression;
use hydro_crypto::digest;
use std::io::{Read, Write};

/// Compress a chunk's payload, returning a new record
///
/// Refuses a chunk that is already compressed or already encrypted.
/// `CompressionAlgorithm::None` is a recorded no-op: the bytes pass
/// through unchanged but the transport checksum is still set.
pub fn compress_chunk(
    chunk: &CompletedChunk,
    algorithm: CompressionAlgorithm,
) -> Result<CompletedChunk> {
    if chunk.is_compressed() {
        return Err(CoreError::Validation(format!(
            "chunk {} is already compressed",
            chunk.index
        )));
    }
    if chunk.is_encrypted() {
        return Err(CoreError::Validation(format!(
            "chunk {} is encrypted; compression must happen before encryption",
            chunk.index
        )));
    }

    let compressed = compress_bytes(&chunk.payload.data, algorithm)?;
    let transport_checksum = digest(&compressed);

    tracing::debug!(
        chunk = chunk.index,
        ?algorithm,
        before = chunk.payload.data.len(),
        after = compressed.len(),
        "compressed chunk payload"
    );

    let mut next = chunk.clone();
    next.payload.data = Bytes::from(compressed);
    next.compression_details = CompressionDetails::Compressed {
        algorithm,
        transport_checksum,
    };
    next.timestamps = chunk.timestamps.touched();
    Ok(next)
}

/// Restore a chunk's original payload bytes, returning a new record
///
/// The stored transport checksum is recomputed over the current bytes
/// first; a mismatch aborts with an integrity error before any
/// decompression is attempted.
pub fn decompress_chunk(chunk: &CompletedChunk) -> Result<CompletedChunk> {
    let CompressionDetails::Compressed {
        algorithm,
        ref transport_checksum,
    } = chunk.compression_details
    else {
        return Err(CoreError::Validation(format!(
            "chunk {} is not compressed",
            chunk.index
        )));
    };
    if chunk.is_encrypted() {
        return Err(CoreError::Validation(format!(
            "chunk {} is still encrypted; decrypt before decompressing",
            chunk.index
        )));
    }

    let actual = digest(&chunk.payload.data);
    if actual != *transport_checksum {
        return Err(CoreError::TransportChecksumMismatch {
            index: chunk.index,
            expected: transport_checksum.to_string(),
            actual: actual.to_string(),
        });
    }

    let restored = decompress_bytes(&chunk.payload.data, algorithm)?;

    let mut next = chunk.clone();
    next.payload.data = Bytes::from(restored);
    next.compression_details = CompressionDetails::Uncompressed;
    next.timestamps = chunk.timestamps.touched();
    Ok(next)
}

fn compress_bytes(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    match algorithm {
        CompressionAlgorithm::Gzip => {
            let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }
        CompressionAlgorithm::Deflate => {
            let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
            encoder.write_all(data)?;
            Ok(encoder.finish()?)
        }
        CompressionAlgorithm::None => Ok(data.to_vec()),
    }
}

fn decompress_bytes(data: &[u8], algorithm: CompressionAlgorithm) -> Result<Vec<u8>> {
    let mut restored = Vec::new();
    match algorithm {
        CompressionAlgorithm::Gzip => {
            flate2::read::GzDecoder::new(data).read_to_end(&mut restored)?;
        }
        CompressionAlgorithm::Deflate => {
            flate2::read::ZlibDecoder::new(data).read_to_end(&mut restored)?;
        }
        CompressionAlgorithm::None => restored.extend_from_slice(data),
    }
    Ok(restored)
}
