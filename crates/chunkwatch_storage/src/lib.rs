//! Versioned chunked entity storage for chunkwatch.
//!
//! This crate provides:
//! - [`World`] - A mutable store of entities grouped into fixed-capacity chunks
//! - [`ComponentRegistry`] - Component type registration and metadata
//! - [`EntityStore`] - Generational entity allocation and locations
//! - [`Chunk`] - Structure-of-arrays rows with per-type change versions
//! - [`Query`] - Archetype filters selecting chunks
//! - [`ChunkSource`] - The read-only interface change observers consume

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod archetype;
pub mod builder;
pub mod chunk;
pub mod config;
pub mod entity;
pub mod query;
pub mod registry;
pub mod source;
pub mod world;

pub use archetype::Archetype;
pub use builder::EntityBuilder;
pub use chunk::{Chunk, ChunkKey, Column};
pub use config::WorldConfig;
pub use entity::{EntityStore, Location};
pub use query::Query;
pub use registry::{ComponentRegistry, ComponentType};
pub use source::{ChunkSource, ComponentColumn};
pub use world::World;
