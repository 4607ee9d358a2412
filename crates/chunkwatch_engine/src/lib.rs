//! Incremental change detection over chunked, versioned entity stores.
//!
//! This crate provides:
//! - [`SetDiffer`] - Added/removed values between successive snapshots
//! - [`EntitySetDiffer`] - Created/destroyed entities under a query
//! - [`ComponentValueDiffer`] - Added/removed (entity, value) pairs for a component type
//! - [`SharedGroupingDiffer`] - Entities entering/leaving shared-value groups
//! - [`EventCoalescer`] - Folding change notifications into per-object flags
//! - [`ChangeTracker`] - All of the above run together once per tick
//!
//! Differs read the store only through [`ChunkSource`](chunkwatch_storage::ChunkSource)
//! and skip every chunk whose change version has not moved since the previous call.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod changes;
pub mod component_differ;
pub mod config;
pub mod entity_differ;
pub mod events;
mod scan;
pub mod set_differ;
pub mod shared_differ;
pub mod tracker;

pub use changes::{ChunkRun, ComponentChanges, SharedComponentChanges};
pub use component_differ::ComponentValueDiffer;
pub use config::DiffConfig;
pub use entity_differ::{EntityChanges, EntityDiffPass, EntitySetDiffer};
pub use events::{EventCoalescer, EventEntry, EventKind, merge_events};
pub use set_differ::{SetChanges, SetDiffPass, SetDiffer};
pub use shared_differ::SharedGroupingDiffer;
pub use tracker::{ChangeTracker, TickChanges};
