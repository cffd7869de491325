//! Deterministic file splitting
//!
//! Partitions a byte buffer into ordered, checksummed chunk records.
//! Every chunk except possibly the last is exactly `chunk_size` bytes;
//! the whole-file digest is streamed through the same hashing primitive
//! used per chunk, so the input is never buffered twice.

use crate::chunk::{Chunk, ChunkPayload, CompletedChunk, Timestamps};
use crate::file::{ChunkedFile, FileStatus};
use crate::{CoreError, Result};
use bytes::Bytes;
use hydro_crypto::{digest, IncrementalDigest};
use uuid::Uuid;

/// Default chunk size (64 KiB)
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024;

/// Configuration for the splitter
#[derive(Clone, Copy, Debug)]
pub struct SplitterConfig {
    /// Size of each chunk in bytes
    pub chunk_size: usize,
}

impl Default for SplitterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl SplitterConfig {
    /// Create with a custom chunk size
    pub fn with_chunk_size(chunk_size: usize) -> Result<Self> {
        if chunk_size == 0 {
            return Err(CoreError::Configuration(
                "chunk size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { chunk_size })
    }
}

/// Splitter for turning byte buffers into hydrated chunked files
pub struct Splitter {
    config: SplitterConfig,
}

impl Splitter {
    /// Create a splitter with the default chunk size
    pub fn new() -> Self {
        Self {
            config: SplitterConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(config: SplitterConfig) -> Self {
        Self { config }
    }

    /// Get the configured chunk size
    pub fn chunk_size(&self) -> usize {
        self.config.chunk_size
    }

    /// Split a byte buffer into a hydrated chunked file
    pub fn split(&self, filename: &str, data: &[u8]) -> ChunkedFile {
        self.split_with_progress(filename, data, |_, _| {})
    }

    /// Split with a progress callback
    ///
    /// The callback fires once per chunk with the monotonically
    /// increasing `(processed_bytes, total_bytes)`.
    pub fn split_with_progress<F: FnMut(u64, u64)>(
        &self,
        filename: &str,
        data: &[u8],
        mut progress: F,
    ) -> ChunkedFile {
        let file_id = Uuid::new_v4();
        let total_bytes = data.len() as u64;
        let total_chunks = data.len().div_ceil(self.config.chunk_size);
        let mut hasher = IncrementalDigest::new();
        let mut chunks = Vec::with_capacity(total_chunks);
        let mut processed_bytes = 0u64;

        for (index, chunk_data) in data.chunks(self.config.chunk_size).enumerate() {
            hasher.update(chunk_data);
            processed_bytes += chunk_data.len() as u64;

            let chunk = CompletedChunk {
                id: Uuid::new_v4(),
                index: index as u32,
                size: chunk_data.len() as u64,
                file_id,
                timestamps: Timestamps::now(),
                version: None,
                metadata: None,
                payload: ChunkPayload {
                    data: Bytes::copy_from_slice(chunk_data),
                    checksum: digest(chunk_data),
                },
                signature_details: Default::default(),
                compression_details: Default::default(),
                encryption_details: Default::default(),
            };
            chunks.push(Chunk::from(chunk));

            progress(processed_bytes, total_bytes);
        }

        tracing::debug!(
            %file_id,
            filename,
            total_bytes,
            chunk_count = chunks.len(),
            "split file into chunks"
        );

        ChunkedFile {
            id: file_id,
            filename: filename.to_string(),
            size: total_bytes,
            progress: 100.0,
            hash: Some(hasher.finalize()),
            status: FileStatus::Hydrated,
            chunks,
            timestamps: Timestamps::now(),
            version: None,
            metadata: None,
        }
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::new()
    }
}

/// Number of chunks a buffer of `size` bytes will produce
pub fn chunk_count(size: u64, chunk_size: usize) -> usize {
    if size == 0 {
        return 0;
    }
    (size as usize).div_ceil(chunk_size)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn splitter(chunk_size: usize) -> Splitter {
        Splitter::with_config(SplitterConfig::with_chunk_size(chunk_size).unwrap())
    }

    #[test]
    fn test_split_exact_multiple() {
        let data = vec![7u8; 1024];
        let file = splitter(256).split("even.bin", &data);

        assert_eq!(file.chunks.len(), 4);
        assert_eq!(file.size, 1024);
        assert_eq!(file.status, FileStatus::Hydrated);
        for chunk in &file.chunks {
            assert_eq!(chunk.as_completed().unwrap().size, 256);
        }
    }

    #[test]
    fn test_split_with_remainder() {
        let data = vec![1u8; 300];
        let file = splitter(256).split("odd.bin", &data);

        assert_eq!(file.chunks.len(), 2);
        assert_eq!(file.chunks[0].as_completed().unwrap().size, 256);
        assert_eq!(file.chunks[1].as_completed().unwrap().size, 44);
    }

    #[test]
    fn test_split_smaller_than_chunk_size() {
        let data = vec![9u8; 128];
        let file = splitter(256).split("small.bin", &data);

        assert_eq!(file.chunks.len(), 1);
        assert_eq!(file.chunks[0].as_completed().unwrap().size, 128);
    }

    #[test]
    fn test_split_empty_input() {
        let file = splitter(256).split("empty.bin", &[]);

        assert_eq!(file.chunks.len(), 0);
        assert_eq!(file.size, 0);
        assert_eq!(file.status, FileStatus::Hydrated);
        assert!(file.hash.is_some());
    }

    #[test]
    fn test_chunk_indices_contiguous() {
        let data = vec![0u8; 1000];
        let file = splitter(100).split("seq.bin", &data);

        for (i, chunk) in file.chunks.iter().enumerate() {
            assert_eq!(chunk.as_completed().unwrap().index, i as u32);
        }
    }

    #[test]
    fn test_per_chunk_checksums_fixed_at_split() {
        let data = b"abcdefghij".to_vec();
        let file = splitter(4).split("sum.bin", &data);

        for chunk in &file.chunks {
            assert!(chunk.as_completed().unwrap().payload_intact());
        }
    }

    #[test]
    fn test_whole_file_hash_matches_oneshot() {
        let data = vec![42u8; 5000];
        let file = splitter(512).split("hash.bin", &data);
        assert_eq!(file.hash.unwrap(), digest(&data));
    }

    #[test]
    fn test_progress_monotonic_once_per_chunk() {
        let data = vec![0u8; 1000];
        let mut calls = Vec::new();
        splitter(256).split_with_progress("prog.bin", &data, |processed, total| {
            calls.push((processed, total));
        });

        assert_eq!(calls.len(), 4);
        assert_eq!(calls.last(), Some(&(1000, 1000)));
        assert!(calls.windows(2).all(|w| w[0].0 < w[1].0));
    }

    #[test]
    fn test_zero_chunk_size_rejected() {
        assert!(SplitterConfig::with_chunk_size(0).is_err());
    }

    #[test]
    fn test_chunk_count() {
        assert_eq!(chunk_count(0, 256), 0);
        assert_eq!(chunk_count(100, 256), 1);
        assert_eq!(chunk_count(256, 256), 1);
        assert_eq!(chunk_count(257, 256), 2);
        assert_eq!(chunk_count(1024, 256), 4);
    }
}
