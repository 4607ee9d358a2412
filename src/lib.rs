//! chunkwatch - Incremental change detection for chunked entity stores
//!
//! This crate re-exports all layers of the chunkwatch system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: chunkwatch_engine     - Set, entity, component and shared differs; event coalescing
//! Layer 1: chunkwatch_storage    - Versioned chunk store and the ChunkSource interface
//! Layer 0: chunkwatch_foundation - Core types (EntityId, Version, ChunkId, Error)
//! ```

pub use chunkwatch_engine as engine;
pub use chunkwatch_foundation as foundation;
pub use chunkwatch_storage as storage;
