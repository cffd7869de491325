//! The consumed storage contract
//!
//! The core never talks to a backend directly; it persists and resolves
//! chunks and files exclusively through these traits, so any backend
//! (embedded, networked, in-memory) can be substituted without touching
//! the pipeline. Handles are plain values passed into the components
//! that need them; there is no process-wide accessor.
//!
//! Errors carry a coded category and are propagated to callers
//! untouched. The core performs zero retries; retry and backoff policy
//! belong to the caller.

use crate::chunk::{Chunk, ChunkId, FileId};
use crate::file::ChunkedFile;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Coded category of a storage failure
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageErrorCode {
    NotFound,
    Conflict,
    Network,
    Permission,
    Unknown,
}

/// A structured error returned by a storage backend
#[derive(Clone, Debug, Error, Serialize, Deserialize)]
#[error("{code:?}: {message}")]
pub struct StorageError {
    pub code: StorageErrorCode,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl StorageError {
    pub fn new(code: StorageErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(StorageErrorCode::NotFound, message)
    }

    pub fn is_not_found(&self) -> bool {
        self.code == StorageErrorCode::NotFound
    }
}

/// Result type for storage operations
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Window into a listing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
}

/// One page of a listing, with the totals needed to page further
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub offset: usize,
    pub limit: usize,
}

/// Kind of change a backend observed
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeEvent {
    Added,
    Updated,
    Deleted,
}

/// Callback invoked when a file record changes
pub type FileListener = Box<dyn Fn(FileId, ChangeEvent) + Send + Sync>;

/// Callback invoked when a chunk record changes
pub type ChunkListener = Box<dyn Fn(ChunkId, ChangeEvent) + Send + Sync>;

/// Handle to an active change subscription
///
/// Dropping the handle unsubscribes; `unsubscribe` does the same
/// explicitly.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap a backend-specific cancel action
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Stop receiving events
    pub fn unsubscribe(mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}

/// Persistence surface for chunked-file records
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Retrieve a file by id
    async fn get_file(&self, id: FileId) -> StorageResult<ChunkedFile>;

    /// Persist a file record, inserting or replacing
    async fn save_file(&self, file: &ChunkedFile) -> StorageResult<()>;

    /// Delete a file record
    async fn delete_file(&self, id: FileId) -> StorageResult<()>;

    /// List file records with pagination
    async fn list_files(&self, pagination: Pagination) -> StorageResult<Page<ChunkedFile>>;

    /// Subscribe to file change events
    fn on_file_changed(&self, listener: FileListener) -> Subscription;
}

/// Persistence surface for chunk records
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Retrieve a chunk by id
    async fn get_chunk(&self, id: ChunkId) -> StorageResult<Chunk>;

    /// Persist a chunk record, inserting or replacing
    async fn save_chunk(&self, chunk: &Chunk) -> StorageResult<()>;

    /// Delete a chunk record
    async fn delete_chunk(&self, id: ChunkId) -> StorageResult<()>;

    /// List chunk records with pagination
    async fn list_chunks(&self, pagination: Pagination) -> StorageResult<Page<Chunk>>;

    /// Subscribe to chunk change events
    fn on_chunk_changed(&self, listener: ChunkListener) -> Subscription;
}
