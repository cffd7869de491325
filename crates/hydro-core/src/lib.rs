//! # Hydro Core
//!
//! Chunked-file integrity and transform pipeline for the hydro storage
//! system.
//!
//! This crate provides:
//! - **Splitting**: deterministic partitioning into checksummed chunks
//! - **Transforms**: compression, encryption, and signing, each pure
//!   and independently toggleable
//! - **Hydration**: resolving dry chunk references against a storage
//!   backend in bounded concurrent batches
//! - **Merge**: reassembling a hydrated file into its original bytes
//! - **Storage contract**: the CRUD/pagination/notification surface the
//!   core consumes, so any backend can be plugged in
//!
//! ## Lifecycle
//!
//! ```text
//! bytes -> Splitter -> hydrated ChunkedFile
//!       -> sign -> compress -> encrypt      (per chunk, in this order)
//!       -> ChunkStore::save_chunk
//!
//! ChunkStore::get_chunk -> Hydrator -> hydrated ChunkedFile
//!       -> decrypt -> decompress -> verify  (reverse order)
//!       -> merge -> original bytes
//! ```
//!
//! Chunk and file records are immutable values; every transform returns
//! a new record. The only designed-in parallelism is the hydrator's
//! intra-batch fan-out.

pub mod chunk;
pub mod compress;
pub mod encrypt;
pub mod error;
pub mod file;
pub mod hydrate;
pub mod merge;
pub mod sign;
pub mod splitter;
pub mod storage;

pub use chunk::{
    Chunk, ChunkId, ChunkPayload, CompletedChunk, CompressionAlgorithm, CompressionDetails,
    EncryptionAlgorithm, EncryptionDetails, FileId, Metadata, PeerId, SignatureDetails, SignerId,
    Timestamps,
};
pub use compress::{compress_chunk, decompress_chunk};
pub use encrypt::{decrypt_chunk, encrypt_chunk};
pub use error::{CoreError, Result};
pub use file::{ChunkedFile, FileStatus};
pub use hydrate::{HydrationConfig, Hydrator, DEFAULT_BATCH_SIZE};
pub use merge::{merge_file, MergedFile};
pub use sign::{sign_chunk, verify_chunk, verify_chunk_with_keyring};
pub use splitter::{chunk_count, Splitter, SplitterConfig, DEFAULT_CHUNK_SIZE};
pub use storage::{
    ChangeEvent, ChunkListener, ChunkStore, FileListener, FileStore, Page, Pagination,
    StorageError, StorageErrorCode, StorageResult, Subscription,
};
