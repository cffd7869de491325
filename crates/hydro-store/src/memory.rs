//! In-memory storage backend
//!
//! Implements both halves of the storage contract over concurrent maps.
//! Intended for tests and single-process use; a durable backend plugs in
//! behind the same traits without the core noticing.

use crate::listeners::Listeners;
use async_trait::async_trait;
use dashmap::DashMap;
use hydro_core::storage::{
    ChangeEvent, ChunkListener, ChunkStore, FileListener, FileStore, Page, Pagination,
    StorageError, StorageResult, Subscription,
};
use hydro_core::{Chunk, ChunkId, ChunkedFile, FileId};
use std::sync::Arc;

/// An in-memory file and chunk store
#[derive(Clone, Default)]
pub struct MemoryStore {
    files: Arc<DashMap<FileId, ChunkedFile>>,
    chunks: Arc<DashMap<ChunkId, Chunk>>,
    file_listeners: Arc<Listeners<FileId>>,
    chunk_listeners: Arc<Listeners<ChunkId>>,
}

impl MemoryStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of file records stored
    pub fn file_count(&self) -> usize {
        self.files.len()
    }

    /// Number of chunk records stored
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Drop all records
    pub fn clear(&self) {
        tracing::debug!(
            files = self.files.len(),
            chunks = self.chunks.len(),
            "clearing in-memory store"
        );
        self.files.clear();
        self.chunks.clear();
    }
}

fn paginate<T: Clone>(items: Vec<T>, pagination: Pagination) -> Page<T> {
    let total = items.len();
    let offset = pagination.offset.unwrap_or(0);
    let limit = pagination.limit.unwrap_or(total);
    let items = items.into_iter().skip(offset).take(limit).collect();
    Page {
        items,
        total,
        offset,
        limit,
    }
}

#[async_trait]
impl FileStore for MemoryStore {
    async fn get_file(&self, id: FileId) -> StorageResult<ChunkedFile> {
        self.files
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(format!("file {id} not found")))
    }

    async fn save_file(&self, file: &ChunkedFile) -> StorageResult<()> {
        let event = if self.files.insert(file.id, file.clone()).is_some() {
            ChangeEvent::Updated
        } else {
            ChangeEvent::Added
        };
        self.file_listeners.notify(file.id, event);
        Ok(())
    }

    async fn delete_file(&self, id: FileId) -> StorageResult<()> {
        if self.files.remove(&id).is_none() {
            return Err(StorageError::not_found(format!("file {id} not found")));
        }
        self.file_listeners.notify(id, ChangeEvent::Deleted);
        Ok(())
    }

    async fn list_files(&self, pagination: Pagination) -> StorageResult<Page<ChunkedFile>> {
        let items: Vec<ChunkedFile> = self.files.iter().map(|e| e.value().clone()).collect();
        Ok(paginate(items, pagination))
    }

    fn on_file_changed(&self, listener: FileListener) -> Subscription {
        self.file_listeners.subscribe(listener)
    }
}

#[async_trait]
impl ChunkStore for MemoryStore {
    async fn get_chunk(&self, id: ChunkId) -> StorageResult<Chunk> {
        self.chunks
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StorageError::not_found(format!("chunk {id} not found")))
    }

    async fn save_chunk(&self, chunk: &Chunk) -> StorageResult<()> {
        let event = if self.chunks.insert(chunk.id(), chunk.clone()).is_some() {
            ChangeEvent::Updated
        } else {
            ChangeEvent::Added
        };
        self.chunk_listeners.notify(chunk.id(), event);
        Ok(())
    }

    async fn delete_chunk(&self, id: ChunkId) -> StorageResult<()> {
        if self.chunks.remove(&id).is_none() {
            return Err(StorageError::not_found(format!("chunk {id} not found")));
        }
        self.chunk_listeners.notify(id, ChangeEvent::Deleted);
        Ok(())
    }

    async fn list_chunks(&self, pagination: Pagination) -> StorageResult<Page<Chunk>> {
        let items: Vec<Chunk> = self.chunks.iter().map(|e| e.value().clone()).collect();
        Ok(paginate(items, pagination))
    }

    fn on_chunk_changed(&self, listener: ChunkListener) -> Subscription {
        self.chunk_listeners.subscribe(listener)
    }
}
