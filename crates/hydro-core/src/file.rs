//! Chunked files and their dry/partial/hydrated lifecycle
//!
//! A file is `Hydrated` iff every chunk is a completed chunk. Stripping
//! payloads down to dry references (`dehydrate`) produces the shape that
//! is cheap to persist; the hydration coordinator restores it.

use crate::chunk::{Chunk, FileId, Metadata, Timestamps};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a chunked file
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    /// Every chunk is a reference only
    Dry,
    /// A mix of resolved and unresolved chunks
    Partial,
    /// Every chunk is completed
    Hydrated,
}

/// A file split into ordered, checksummed chunks
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkedFile {
    pub id: FileId,
    pub filename: String,
    /// Size in bytes of the original byte sequence
    pub size: u64,
    /// Resolved fraction as a percentage, 0 to 100
    pub progress: f32,
    /// Digest of the full original byte sequence, established at split time
    pub hash: Option<hydro_crypto::Checksum>,
    pub status: FileStatus,
    pub chunks: Vec<Chunk>,
    pub timestamps: Timestamps,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,
}

impl ChunkedFile {
    /// Number of chunks with a resolved payload
    pub fn resolved_count(&self) -> usize {
        self.chunks.iter().filter(|c| c.is_completed()).count()
    }

    /// Derive the lifecycle state from the chunks themselves
    ///
    /// The stored `status` field is never trusted for decisions; a file
    /// with zero chunks is trivially hydrated.
    pub fn classify(&self) -> FileStatus {
        let resolved = self.resolved_count();
        if resolved == self.chunks.len() {
            FileStatus::Hydrated
        } else if resolved == 0 {
            FileStatus::Dry
        } else {
            FileStatus::Partial
        }
    }

    /// Recompute `status` and `progress` from the chunk list
    pub fn recompute_status(&mut self) {
        self.status = self.classify();
        self.progress = if self.chunks.is_empty() {
            100.0
        } else {
            self.resolved_count() as f32 / self.chunks.len() as f32 * 100.0
        };
    }

    /// Indices of chunks that are still dry references
    pub fn missing_indices(&self) -> Vec<usize> {
        self.chunks
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_dry())
            .map(|(i, _)| i)
            .collect()
    }

    /// Copy of this file with every chunk replaced by its dry reference
    pub fn dehydrate(&self) -> ChunkedFile {
        let mut file = ChunkedFile {
            chunks: self.chunks.iter().map(Chunk::dehydrated).collect(),
            timestamps: self.timestamps.touched(),
            ..self.clone()
        };
        file.recompute_status();
        file
    }

    /// Copy of this file with completed chunks re-sorted by index
    ///
    /// Dry references carry no index and keep their relative position
    /// after the completed chunks are ordered among themselves.
    pub fn sort_chunks(&self) -> ChunkedFile {
        let mut chunks = self.chunks.clone();
        chunks.sort_by_key(|c| match c {
            Chunk::Completed(chunk) => chunk.index,
            Chunk::Dry(_) => u32::MAX,
        });
        ChunkedFile {
            chunks,
            ..self.clone()
        }
    }
}
