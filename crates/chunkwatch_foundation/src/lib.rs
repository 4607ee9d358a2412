//! Core identifiers, versions, component metadata, and errors for chunkwatch.
//!
//! This crate provides:
//! - [`EntityId`] - Generational entity identifiers
//! - [`Version`] - Wrap-aware monotonic version counters
//! - [`ChunkId`] - Opaque per-tick chunk identity tokens
//! - [`ComponentInfo`] - Component type metadata and watchability predicates
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chunk;
pub mod component;
pub mod entity;
pub mod error;
pub mod version;

pub use chunk::ChunkId;
pub use component::{ComponentInfo, ComponentKind, ComponentTypeId};
pub use entity::EntityId;
pub use error::{Error, ErrorContext, ErrorKind, Result};
pub use version::Version;
