//! Result buffers produced by the chunk differs.
//!
//! Both result types keep parallel "added" and "removed" lists. Index `i` of the
//! added list and index `i` of the removed list are unrelated; an entity whose value
//! changed appears once in each. Every chunk's contribution occupies one contiguous
//! span of each list, described by a [`ChunkRun`].
//!
//! Results may contain remove+add pairs that carry identical values: a chunk whose
//! change version moved is reported in full, whether or not any byte differs.

use std::collections::HashMap;
use std::ops::Range;

use bytemuck::Pod;
use chunkwatch_foundation::{ChunkId, EntityId};

/// The span one chunk contributed to an added or removed list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChunkRun {
    /// The chunk identity the entries were read from.
    pub chunk: ChunkId,
    /// Index range within the list.
    pub range: Range<usize>,
}

fn push_run(runs: &mut Vec<ChunkRun>, chunk: ChunkId, start: usize, end: usize) {
    if start < end {
        runs.push(ChunkRun {
            chunk,
            range: start..end,
        });
    }
}

fn decode<T: Pod>(bytes: &[u8]) -> T {
    bytemuck::pod_read_unaligned(bytes)
}

// =============================================================================
// Per-entity values
// =============================================================================

/// Added and removed (entity, value) pairs for one per-entity component type.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ComponentChanges {
    stride: usize,
    added_entities: Vec<EntityId>,
    added_data: Vec<u8>,
    added_runs: Vec<ChunkRun>,
    removed_entities: Vec<EntityId>,
    removed_data: Vec<u8>,
    removed_runs: Vec<ChunkRun>,
}

impl ComponentChanges {
    /// Creates an empty result for values of `stride` bytes.
    #[must_use]
    pub fn new(stride: usize) -> Self {
        Self {
            stride,
            ..Self::default()
        }
    }

    /// Returns the size of one value.
    #[must_use]
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the number of added entries.
    #[must_use]
    pub fn added_count(&self) -> usize {
        self.added_entities.len()
    }

    /// Returns the number of removed entries.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_entities.len()
    }

    /// Returns true if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_entities.is_empty() && self.removed_entities.is_empty()
    }

    /// Returns the `index`th added entity and its value.
    #[must_use]
    pub fn added(&self, index: usize) -> Option<(EntityId, &[u8])> {
        let entity = *self.added_entities.get(index)?;
        let start = index * self.stride;
        Some((entity, &self.added_data[start..start + self.stride]))
    }

    /// Returns the `index`th removed entity and its last known value.
    #[must_use]
    pub fn removed(&self, index: usize) -> Option<(EntityId, &[u8])> {
        let entity = *self.removed_entities.get(index)?;
        let start = index * self.stride;
        Some((entity, &self.removed_data[start..start + self.stride]))
    }

    /// Returns the added entities.
    #[must_use]
    pub fn added_entities(&self) -> &[EntityId] {
        &self.added_entities
    }

    /// Returns the removed entities.
    #[must_use]
    pub fn removed_entities(&self) -> &[EntityId] {
        &self.removed_entities
    }

    /// Returns the added values, contiguous and parallel to [`added_entities`](Self::added_entities).
    #[must_use]
    pub fn added_bytes(&self) -> &[u8] {
        &self.added_data
    }

    /// Returns the removed values, contiguous and parallel to [`removed_entities`](Self::removed_entities).
    #[must_use]
    pub fn removed_bytes(&self) -> &[u8] {
        &self.removed_data
    }

    /// Iterates over added entries with values decoded as `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not exactly [`stride`](Self::stride) bytes.
    pub fn added_as<T: Pod>(&self) -> impl Iterator<Item = (EntityId, T)> + '_ {
        self.typed(&self.added_entities, &self.added_data)
    }

    /// Iterates over removed entries with values decoded as `T`.
    ///
    /// # Panics
    ///
    /// Panics if `T` is not exactly [`stride`](Self::stride) bytes.
    pub fn removed_as<T: Pod>(&self) -> impl Iterator<Item = (EntityId, T)> + '_ {
        self.typed(&self.removed_entities, &self.removed_data)
    }

    /// Returns the per-chunk spans of the added list, in visitation order.
    #[must_use]
    pub fn added_runs(&self) -> &[ChunkRun] {
        &self.added_runs
    }

    /// Returns the per-chunk spans of the removed list.
    #[must_use]
    pub fn removed_runs(&self) -> &[ChunkRun] {
        &self.removed_runs
    }

    /// Empties the result, keeping allocations.
    pub fn clear(&mut self) {
        self.added_entities.clear();
        self.added_data.clear();
        self.added_runs.clear();
        self.removed_entities.clear();
        self.removed_data.clear();
        self.removed_runs.clear();
    }

    pub(crate) fn reset(&mut self, stride: usize) {
        self.clear();
        self.stride = stride;
    }

    pub(crate) fn push_added(&mut self, chunk: ChunkId, entities: &[EntityId], data: &[u8]) {
        debug_assert_eq!(entities.len() * self.stride, data.len());
        let start = self.added_entities.len();
        self.added_entities.extend_from_slice(entities);
        self.added_data.extend_from_slice(data);
        push_run(&mut self.added_runs, chunk, start, self.added_entities.len());
    }

    pub(crate) fn push_removed(&mut self, chunk: ChunkId, entities: &[EntityId], data: &[u8]) {
        debug_assert_eq!(entities.len() * self.stride, data.len());
        let start = self.removed_entities.len();
        self.removed_entities.extend_from_slice(entities);
        self.removed_data.extend_from_slice(data);
        push_run(&mut self.removed_runs, chunk, start, self.removed_entities.len());
    }

    fn typed<'a, T: Pod>(
        &'a self,
        entities: &'a [EntityId],
        data: &'a [u8],
    ) -> impl Iterator<Item = (EntityId, T)> + 'a {
        assert_eq!(
            std::mem::size_of::<T>(),
            self.stride,
            "value type {} does not match component size",
            std::any::type_name::<T>()
        );
        entities
            .iter()
            .zip(data.chunks_exact(self.stride.max(1)))
            .map(|(e, bytes)| (*e, decode(bytes)))
    }
}

// =============================================================================
// Shared values
// =============================================================================

/// Added and removed (entity, shared value) pairs for one shared component type.
///
/// Values are stored once in a table; entries refer to them by index.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SharedComponentChanges {
    values: Vec<Box<[u8]>>,
    lookup: HashMap<Box<[u8]>, u32>,
    added_entities: Vec<EntityId>,
    added_values: Vec<u32>,
    added_runs: Vec<ChunkRun>,
    removed_entities: Vec<EntityId>,
    removed_values: Vec<u32>,
    removed_runs: Vec<ChunkRun>,
}

impl SharedComponentChanges {
    /// Creates an empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of added entries.
    #[must_use]
    pub fn added_count(&self) -> usize {
        self.added_entities.len()
    }

    /// Returns the number of removed entries.
    #[must_use]
    pub fn removed_count(&self) -> usize {
        self.removed_entities.len()
    }

    /// Returns true if nothing was added or removed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added_entities.is_empty() && self.removed_entities.is_empty()
    }

    /// Returns the `index`th added entity and its shared value.
    #[must_use]
    pub fn added(&self, index: usize) -> Option<(EntityId, &[u8])> {
        let entity = *self.added_entities.get(index)?;
        Some((entity, &self.values[self.added_values[index] as usize]))
    }

    /// Returns the `index`th removed entity and the shared value it had.
    #[must_use]
    pub fn removed(&self, index: usize) -> Option<(EntityId, &[u8])> {
        let entity = *self.removed_entities.get(index)?;
        Some((entity, &self.values[self.removed_values[index] as usize]))
    }

    /// Returns the added entities.
    #[must_use]
    pub fn added_entities(&self) -> &[EntityId] {
        &self.added_entities
    }

    /// Returns the removed entities.
    #[must_use]
    pub fn removed_entities(&self) -> &[EntityId] {
        &self.removed_entities
    }

    /// Returns the distinct value table entries referenced by this result.
    #[must_use]
    pub fn values(&self) -> &[Box<[u8]>] {
        &self.values
    }

    /// Iterates over added entries with values decoded as `T`.
    ///
    /// # Panics
    ///
    /// Panics if a value's size does not match `T`.
    pub fn added_as<T: Pod>(&self) -> impl Iterator<Item = (EntityId, T)> + '_ {
        self.added_entities
            .iter()
            .zip(&self.added_values)
            .map(|(e, v)| (*e, decode(&self.values[*v as usize])))
    }

    /// Iterates over removed entries with values decoded as `T`.
    ///
    /// # Panics
    ///
    /// Panics if a value's size does not match `T`.
    pub fn removed_as<T: Pod>(&self) -> impl Iterator<Item = (EntityId, T)> + '_ {
        self.removed_entities
            .iter()
            .zip(&self.removed_values)
            .map(|(e, v)| (*e, decode(&self.values[*v as usize])))
    }

    /// Returns the per-chunk spans of the added list, in visitation order.
    #[must_use]
    pub fn added_runs(&self) -> &[ChunkRun] {
        &self.added_runs
    }

    /// Returns the per-chunk spans of the removed list.
    #[must_use]
    pub fn removed_runs(&self) -> &[ChunkRun] {
        &self.removed_runs
    }

    /// Empties the result, keeping allocations.
    pub fn clear(&mut self) {
        self.values.clear();
        self.lookup.clear();
        self.added_entities.clear();
        self.added_values.clear();
        self.added_runs.clear();
        self.removed_entities.clear();
        self.removed_values.clear();
        self.removed_runs.clear();
    }

    fn intern(&mut self, value: &[u8]) -> u32 {
        if let Some(&index) = self.lookup.get(value) {
            return index;
        }
        let index = u32::try_from(self.values.len()).unwrap_or(u32::MAX);
        self.values.push(value.into());
        self.lookup.insert(value.into(), index);
        index
    }

    pub(crate) fn push_added<I>(&mut self, chunk: ChunkId, entities: I, value: &[u8])
    where
        I: IntoIterator<Item = EntityId>,
    {
        let start = self.added_entities.len();
        self.added_entities.extend(entities);
        let end = self.added_entities.len();
        if start < end {
            let value = self.intern(value);
            self.added_values.resize(end, value);
            push_run(&mut self.added_runs, chunk, start, end);
        }
    }

    pub(crate) fn push_removed<I>(&mut self, chunk: ChunkId, entities: I, value: &[u8])
    where
        I: IntoIterator<Item = EntityId>,
    {
        let start = self.removed_entities.len();
        self.removed_entities.extend(entities);
        let end = self.removed_entities.len();
        if start < end {
            let value = self.intern(value);
            self.removed_values.resize(end, value);
            push_run(&mut self.removed_runs, chunk, start, end);
        }
    }
}
