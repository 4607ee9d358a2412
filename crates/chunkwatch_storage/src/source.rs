//! The read-only interface change observers consume.
//!
//! Observers never hold references into the store between calls; they remember
//! chunk identities and versions and resolve them again through a [`ChunkSource`].

use chunkwatch_foundation::{ChunkId, ComponentInfo, ComponentTypeId, EntityId, Version};

use crate::query::Query;
use crate::world::World;

/// A borrowed column of fixed-size component values.
#[derive(Clone, Copy, Debug)]
pub struct ComponentColumn<'a> {
    bytes: &'a [u8],
    stride: usize,
}

impl<'a> ComponentColumn<'a> {
    /// Wraps contiguous bytes holding values of `stride` bytes each.
    #[must_use]
    pub fn new(bytes: &'a [u8], stride: usize) -> Self {
        debug_assert!(stride == 0 || bytes.len() % stride == 0);
        Self { bytes, stride }
    }

    /// Returns the size of one value.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        if self.stride == 0 {
            0
        } else {
            self.bytes.len() / self.stride
        }
    }

    /// Returns true if the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns one value's bytes.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&'a [u8]> {
        let start = index.checked_mul(self.stride)?;
        self.bytes.get(start..start + self.stride)
    }

    /// Returns all values' bytes, contiguous.
    #[must_use]
    pub fn as_bytes(&self) -> &'a [u8] {
        self.bytes
    }

    /// Iterates over the values.
    pub fn iter(&self) -> impl Iterator<Item = &'a [u8]> + 'a {
        let bytes = self.bytes;
        bytes.chunks_exact(self.stride.max(1)).take(self.len())
    }
}

/// Read access to a chunked store, keyed by chunk identity.
///
/// Every lookup returns `None` when the identity no longer resolves to a live chunk,
/// which observers treat as the chunk having been replaced.
pub trait ChunkSource: Sync {
    /// Returns the store's global version.
    fn current_global_version(&self) -> Version;

    /// Returns metadata for a component type.
    fn component_info(&self, component: ComponentTypeId) -> Option<&ComponentInfo>;

    /// Returns the identities of every chunk matching `query`, in the store's chunk order.
    fn matching_chunks(&self, query: &Query) -> Vec<ChunkId>;

    /// Returns the version at which `component` was last written in a chunk.
    fn chunk_change_version(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<Version>;

    /// Returns a chunk's entities in row order.
    fn chunk_entities(&self, chunk: ChunkId) -> Option<&[EntityId]>;

    /// Returns a chunk's values of a per-entity component, in row order.
    fn chunk_component_bytes(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<ComponentColumn<'_>>;

    /// Returns a chunk's value of a shared component.
    fn chunk_shared_value(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<&[u8]>;
}

impl ChunkSource for World {
    fn current_global_version(&self) -> Version {
        self.global_version()
    }

    fn component_info(&self, component: ComponentTypeId) -> Option<&ComponentInfo> {
        World::component_info(self, component)
    }

    fn matching_chunks(&self, query: &Query) -> Vec<ChunkId> {
        self.query_chunks(query).map(|c| c.id()).collect()
    }

    fn chunk_change_version(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<Version> {
        self.chunk(chunk)?.change_version(component)
    }

    fn chunk_entities(&self, chunk: ChunkId) -> Option<&[EntityId]> {
        self.chunk(chunk).map(|c| c.entities())
    }

    fn chunk_component_bytes(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<ComponentColumn<'_>> {
        let column = self.chunk(chunk)?.column(component)?;
        Some(ComponentColumn::new(column.bytes(), column.size()))
    }

    fn chunk_shared_value(&self, chunk: ChunkId, component: ComponentTypeId) -> Option<&[u8]> {
        self.chunk(chunk)?.shared_value(component)
    }
}
