//! # Hydro Store
//!
//! In-memory reference implementation of the hydro storage contract.
//!
//! `MemoryStore` implements both `FileStore` and `ChunkStore` from
//! `hydro-core` over concurrent maps, with synchronous change
//! notification. It backs the pipeline tests and demonstrates what a
//! real backend (embedded database, networked service) has to provide;
//! the core itself never depends on any concrete backend.

mod listeners;
pub mod memory;

pub use memory::MemoryStore;
