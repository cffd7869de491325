//! Chunk records and their transform metadata
//!
//! A chunk is either a dry reference (an opaque id, no payload) or a
//! completed chunk carrying payload bytes plus integrity and transform
//! metadata. Completed chunks are immutable values: transforms take a
//! chunk by reference and return a new record.

use bytes::Bytes;
use chrono::{DateTime, Utc};
use hydro_crypto::{Checksum, Iv, Signature};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Identifier of a chunk
pub type ChunkId = Uuid;

/// Identifier of a chunked file
pub type FileId = Uuid;

/// Identifier of a peer
pub type PeerId = Uuid;

/// Identifier of the peer that signed a chunk
pub type SignerId = Uuid;

/// Free-form metadata attached to chunks and files
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Creation and last-update times of a record
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Timestamps {
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Timestamps {
    /// Timestamps for a record created right now
    pub fn now() -> Self {
        let now = Utc::now();
        Self {
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy with `updated_at` refreshed
    pub fn touched(&self) -> Self {
        Self {
            created_at: self.created_at,
            updated_at: Utc::now(),
        }
    }
}

/// Supported compression codecs
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionAlgorithm {
    Gzip,
    Deflate,
    /// Recorded no-op; bytes pass through unchanged
    None,
}

/// Supported payload ciphers
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EncryptionAlgorithm {
    #[serde(rename = "aes-256-gcm")]
    Aes256Gcm,
}

impl Default for EncryptionAlgorithm {
    fn default() -> Self {
        Self::Aes256Gcm
    }
}

/// Compression state of a chunk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum CompressionDetails {
    Compressed {
        algorithm: CompressionAlgorithm,
        /// Digest of the compressed bytes, independent of the content
        /// checksum fixed at split time
        transport_checksum: Checksum,
    },
    Uncompressed,
}

impl Default for CompressionDetails {
    fn default() -> Self {
        Self::Uncompressed
    }
}

/// Encryption state of a chunk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum EncryptionDetails {
    Encrypted {
        algorithm: EncryptionAlgorithm,
        peer_id: PeerId,
        /// Digest of the cipher bytes
        cypher_checksum: Checksum,
        iv: Iv,
    },
    Unencrypted,
}

impl Default for EncryptionDetails {
    fn default() -> Self {
        Self::Unencrypted
    }
}

/// Signature state of a chunk
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase", rename_all_fields = "camelCase")]
pub enum SignatureDetails {
    Signed {
        signature: Signature,
        signer_id: SignerId,
        signed_at: DateTime<Utc>,
    },
    Unsigned,
    /// A signature that failed verification and was flagged by the caller
    Invalid,
}

impl Default for SignatureDetails {
    fn default() -> Self {
        Self::Unsigned
    }
}

/// Payload bytes plus the content checksum fixed at split time
///
/// The checksum is the digest of the original, untransformed bytes; it
/// never changes once set, even while `data` holds compressed or
/// encrypted bytes.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkPayload {
    pub data: Bytes,
    pub checksum: Checksum,
}

/// A chunk with its payload resolved
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletedChunk {
    pub id: ChunkId,
    /// Zero-based position within the file
    pub index: u32,
    /// Size in bytes of the original, untransformed payload
    pub size: u64,
    pub file_id: FileId,
    pub timestamps: Timestamps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
    pub payload: ChunkPayload,
    #[serde(default)]
    pub signature_details: SignatureDetails,
    #[serde(default)]
    pub compression_details: CompressionDetails,
    #[serde(default)]
    pub encryption_details: EncryptionDetails,
}

impl CompletedChunk {
    /// Check the content checksum against the current payload bytes
    ///
    /// Only meaningful on an untransformed payload; compressed or
    /// encrypted bytes will not match the split-time digest.
    pub fn payload_intact(&self) -> bool {
        self.payload.checksum.matches(&self.payload.data)
    }

    pub fn is_signed(&self) -> bool {
        matches!(self.signature_details, SignatureDetails::Signed { .. })
    }

    pub fn is_compressed(&self) -> bool {
        matches!(self.compression_details, CompressionDetails::Compressed { .. })
    }

    pub fn is_encrypted(&self) -> bool {
        matches!(self.encryption_details, EncryptionDetails::Encrypted { .. })
    }
}

/// A chunk record: either a dry reference or a completed chunk
///
/// A dry reference serializes as a bare id string, matching the wire
/// shape of a file that has been stripped down for persistence.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Chunk {
    Completed(Box<CompletedChunk>),
    Dry(ChunkId),
}

impl Chunk {
    /// The chunk's identifier, resolved or not
    pub fn id(&self) -> ChunkId {
        match self {
            Chunk::Completed(chunk) => chunk.id,
            Chunk::Dry(id) => *id,
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, Chunk::Completed(_))
    }

    pub fn is_dry(&self) -> bool {
        matches!(self, Chunk::Dry(_))
    }

    /// Borrow the completed record, if resolved
    pub fn as_completed(&self) -> Option<&CompletedChunk> {
        match self {
            Chunk::Completed(chunk) => Some(chunk),
            Chunk::Dry(_) => None,
        }
    }

    /// The dry reference for this chunk
    pub fn dehydrated(&self) -> Chunk {
        Chunk::Dry(self.id())
    }
}

impl From<CompletedChunk> for Chunk {
    fn from(chunk: CompletedChunk) -> Self {
        Chunk::Completed(Box::new(chunk))
    }
}

/// Build a standalone completed chunk for tests
#[cfg(test)]
pub(crate) fn sample_chunk(index: u32, data: &[u8]) -> CompletedChunk {
    CompletedChunk {
        id: Uuid::new_v4(),
        index,
        size: data.len() as u64,
        file_id: Uuid::new_v4(),
        timestamps: Timestamps::now(),
        version: None,
        metadata: None,
        payload: ChunkPayload {
            data: Bytes::copy_from_slice(data),
            checksum: hydro_crypto::digest(data),
        },
        signature_details: SignatureDetails::default(),
        compression_details: CompressionDetails::default(),
        encryption_details: EncryptionDetails::default(),
    }
}
