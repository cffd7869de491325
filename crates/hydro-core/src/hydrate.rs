//! Hydration of dry chunk references
//!
//! Resolves a dry or partial file's chunk references against a chunk
//! store in bounded concurrent batches: resolutions within a batch fan
//! out concurrently, batches run strictly sequentially, so at most
//! `batch_size` storage reads are ever pending. A reference the backend
//! does not know stays dry and the file comes back `Partial` - a normal
//! outcome, not an error. Any storage failure other than `not_found`
//! propagates untouched; the coordinator never retries.

use crate::chunk::Chunk;
use crate::file::{ChunkedFile, FileStatus};
use crate::storage::ChunkStore;
use crate::{CoreError, Result};
use futures::future::join_all;

/// Default number of chunk resolutions in flight at once
pub const DEFAULT_BATCH_SIZE: usize = 100;

/// Configuration for the hydration coordinator
#[derive(Clone, Copy, Debug)]
pub struct HydrationConfig {
    /// Maximum concurrent storage reads
    pub batch_size: usize,
}

impl Default for HydrationConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl HydrationConfig {
    /// Create with a custom batch size
    pub fn with_batch_size(batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(CoreError::Configuration(
                "batch size must be greater than zero".to_string(),
            ));
        }
        Ok(Self { batch_size })
    }
}

/// Coordinator that resolves dry chunk references through a store handle
///
/// The handle is passed in explicitly; nothing here reaches for global
/// state, so tests can run several isolated instances side by side.
pub struct Hydrator<'a, S: ChunkStore + ?Sized> {
    store: &'a S,
    config: HydrationConfig,
}

impl<'a, S: ChunkStore + ?Sized> Hydrator<'a, S> {
    /// Create a hydrator with the default batch size
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            config: HydrationConfig::default(),
        }
    }

    /// Create with custom configuration
    pub fn with_config(store: &'a S, config: HydrationConfig) -> Self {
        Self { store, config }
    }

    /// Resolve a file's dry references, classifying the result
    pub async fn hydrate(&self, file: &ChunkedFile) -> Result<ChunkedFile> {
        self.hydrate_with_progress(file, |_, _| {}).await
    }

    /// Resolve with a progress callback
    ///
    /// The callback fires once per resolved chunk with
    /// `(resolved_count, total_chunks)`; already-completed chunks count
    /// as resolved and pass through untouched.
    pub async fn hydrate_with_progress<F: FnMut(u64, u64)>(
        &self,
        file: &ChunkedFile,
        mut progress: F,
    ) -> Result<ChunkedFile> {
        let total = file.chunks.len() as u64;
        let mut chunks = Vec::with_capacity(file.chunks.len());
        let mut resolved = 0u64;

        for batch in file.chunks.chunks(self.config.batch_size) {
            let lookups = batch.iter().map(|chunk| self.resolve(chunk));
            for outcome in join_all(lookups).await {
                let chunk = outcome?;
                if chunk.is_completed() {
                    resolved += 1;
                    progress(resolved, total);
                }
                chunks.push(chunk);
            }
        }

        let mut hydrated = ChunkedFile {
            chunks,
            timestamps: file.timestamps.touched(),
            ..file.clone()
        };
        hydrated.recompute_status();

        if hydrated.status != FileStatus::Hydrated {
            tracing::warn!(
                file = %file.id,
                missing = hydrated.missing_indices().len(),
                "file only partially hydrated"
            );
        }

        Ok(hydrated)
    }

    /// Resolve a single chunk reference
    ///
    /// `not_found` leaves the reference dry; every other storage error
    /// is propagated to the caller.
    async fn resolve(&self, chunk: &Chunk) -> Result<Chunk> {
        match chunk {
            Chunk::Completed(_) => Ok(chunk.clone()),
            Chunk::Dry(id) => match self.store.get_chunk(*id).await {
                Ok(found) => Ok(found),
                Err(err) if err.is_not_found() => Ok(chunk.clone()),
                Err(err) => Err(err.into()),
            },
        }
    }
}
