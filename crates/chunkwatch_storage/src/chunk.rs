//! Fixed-capacity chunks of entities sharing one archetype and one set of shared values.
//!
//! Per-entity component data is kept in structure-of-arrays byte columns, one column
//! per stored component type. Each component type carries a change version that is
//! stamped with the world's global version whenever that type is written in the chunk.
//! Structural changes (entities entering or leaving, rows moving) stamp every type and
//! the chunk's order version.

use chunkwatch_foundation::{ChunkId, ComponentTypeId, EntityId, Error, ErrorKind, Result, Version};

use crate::archetype::Archetype;

/// Grouping key of a chunk: its archetype plus the value of every shared type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
pub struct ChunkKey {
    archetype: Archetype,
    /// Shared values, sorted by component type.
    shared: Vec<(ComponentTypeId, Box<[u8]>)>,
}

impl ChunkKey {
    /// Creates a key from an archetype and shared values.
    #[must_use]
    pub fn new(archetype: Archetype, mut shared: Vec<(ComponentTypeId, Box<[u8]>)>) -> Self {
        shared.sort_by_key(|(id, _)| *id);
        shared.dedup_by_key(|(id, _)| *id);
        Self { archetype, shared }
    }

    /// Returns the archetype.
    #[must_use]
    pub fn archetype(&self) -> &Archetype {
        &self.archetype
    }

    /// Returns the shared value of a component type, if the key has one.
    #[must_use]
    pub fn shared_value(&self, component: ComponentTypeId) -> Option<&[u8]> {
        self.shared
            .binary_search_by_key(&component, |(id, _)| *id)
            .ok()
            .map(|pos| &*self.shared[pos].1)
    }

    /// Returns a key with a shared value inserted or replaced.
    #[must_use]
    pub fn with_shared(&self, component: ComponentTypeId, value: &[u8]) -> Self {
        let mut shared = self.shared.clone();
        match shared.binary_search_by_key(&component, |(id, _)| *id) {
            Ok(pos) => shared[pos].1 = value.into(),
            Err(pos) => shared.insert(pos, (component, value.into())),
        }
        Self {
            archetype: self.archetype.with_component(component),
            shared,
        }
    }

    /// Returns a key with a component type removed along with any shared value.
    #[must_use]
    pub fn without(&self, component: ComponentTypeId) -> Self {
        let mut shared = self.shared.clone();
        shared.retain(|(id, _)| *id != component);
        Self {
            archetype: self.archetype.without_component(component),
            shared,
        }
    }

    /// Returns a key with a non-shared component type added.
    #[must_use]
    pub fn with_component(&self, component: ComponentTypeId) -> Self {
        Self {
            archetype: self.archetype.with_component(component),
            shared: self.shared.clone(),
        }
    }
}

/// One component type's values for every row of a chunk, stored as bytes.
#[derive(Clone, Debug)]
pub struct Column {
    id: ComponentTypeId,
    size: usize,
    data: Vec<u8>,
}

impl Column {
    fn new(id: ComponentTypeId, size: usize, capacity: usize) -> Self {
        Self {
            id,
            size,
            data: Vec::with_capacity(size * capacity),
        }
    }

    /// Returns the component type.
    #[must_use]
    pub fn id(&self) -> ComponentTypeId {
        self.id
    }

    /// Returns the size of one element in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns all rows' bytes, contiguous.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.data
    }

    /// Returns the bytes of one row.
    #[must_use]
    pub fn get(&self, row: usize) -> Option<&[u8]> {
        let start = row.checked_mul(self.size)?;
        self.data.get(start..start + self.size)
    }

    fn get_mut(&mut self, row: usize) -> Option<&mut [u8]> {
        let start = row.checked_mul(self.size)?;
        self.data.get_mut(start..start + self.size)
    }

    fn push(&mut self, value: &[u8]) {
        debug_assert_eq!(value.len(), self.size);
        self.data.extend_from_slice(value);
    }

    fn swap_remove(&mut self, row: usize) {
        if self.size == 0 {
            return;
        }
        let last = self.data.len() / self.size - 1;
        if row != last {
            let (head, tail) = self.data.split_at_mut(last * self.size);
            head[row * self.size..(row + 1) * self.size].copy_from_slice(&tail[..self.size]);
        }
        self.data.truncate(last * self.size);
    }
}

/// A fixed-capacity block of entities with identical archetype and shared values.
#[derive(Clone, Debug)]
pub struct Chunk {
    id: ChunkId,
    key: ChunkKey,
    entities: Vec<EntityId>,
    columns: Vec<Column>,
    /// Change version per archetype component, parallel to `key.archetype.components()`.
    change_versions: Vec<Version>,
    order_version: Version,
    capacity: usize,
}

impl Chunk {
    /// Creates an empty chunk.
    ///
    /// `layouts` lists the (type, size) of every component stored per entity.
    pub(crate) fn new(
        id: ChunkId,
        key: ChunkKey,
        layouts: &[(ComponentTypeId, usize)],
        capacity: usize,
        version: Version,
    ) -> Self {
        let mut columns: Vec<_> = layouts
            .iter()
            .map(|&(ty, size)| Column::new(ty, size, capacity))
            .collect();
        columns.sort_by_key(Column::id);
        let change_versions = vec![version; key.archetype.len()];
        Self {
            id,
            key,
            entities: Vec::with_capacity(capacity),
            columns,
            change_versions,
            order_version: version,
            capacity,
        }
    }

    /// Returns the chunk's identity.
    #[must_use]
    pub fn id(&self) -> ChunkId {
        self.id
    }

    /// Returns the chunk's grouping key.
    #[must_use]
    pub fn key(&self) -> &ChunkKey {
        &self.key
    }

    /// Returns the chunk's archetype.
    #[must_use]
    pub fn archetype(&self) -> &Archetype {
        &self.key.archetype
    }

    /// Returns the entities in row order.
    #[must_use]
    pub fn entities(&self) -> &[EntityId] {
        &self.entities
    }

    /// Returns the number of occupied rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if no rows are occupied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Returns the maximum number of rows.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Returns true if no more rows fit.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.entities.len() >= self.capacity
    }

    /// Returns the column storing a component type.
    #[must_use]
    pub fn column(&self, component: ComponentTypeId) -> Option<&Column> {
        self.column_index(component).map(|i| &self.columns[i])
    }

    /// Returns the chunk's shared value for a component type.
    #[must_use]
    pub fn shared_value(&self, component: ComponentTypeId) -> Option<&[u8]> {
        self.key.shared_value(component)
    }

    /// Returns the version at which a component type was last written in this chunk.
    #[must_use]
    pub fn change_version(&self, component: ComponentTypeId) -> Option<Version> {
        self.key
            .archetype
            .position(component)
            .map(|pos| self.change_versions[pos])
    }

    /// Returns the version of the last structural change.
    #[must_use]
    pub fn order_version(&self) -> Version {
        self.order_version
    }

    fn column_index(&self, component: ComponentTypeId) -> Option<usize> {
        self.columns.binary_search_by_key(&component, Column::id).ok()
    }

    fn stamp_all(&mut self, version: Version) {
        self.order_version = version;
        for v in &mut self.change_versions {
            *v = version;
        }
    }

    /// Appends a row and returns its index. Every stored column must have a value in `values`.
    pub(crate) fn push(
        &mut self,
        entity: EntityId,
        values: &[(ComponentTypeId, Vec<u8>)],
        version: Version,
    ) -> Result<u32> {
        debug_assert!(!self.is_full());
        for column in &mut self.columns {
            match values.iter().find(|(id, _)| *id == column.id) {
                Some((_, bytes)) => column.push(bytes),
                None => {
                    debug_assert!(false, "missing value for {:?}", column.id);
                    let zeros = vec![0; column.size];
                    column.push(&zeros);
                }
            }
        }
        self.entities.push(entity);
        self.stamp_all(version);
        u32::try_from(self.entities.len() - 1)
            .map_err(|_| Error::new(ErrorKind::Internal("chunk row index overflow".into())))
    }

    /// Removes a row by moving the last row into its place.
    ///
    /// Returns the entity that now occupies `row`, if one was moved.
    pub(crate) fn swap_remove(&mut self, row: u32, version: Version) -> Option<EntityId> {
        let row = row as usize;
        let last = self.entities.len() - 1;
        for column in &mut self.columns {
            column.swap_remove(row);
        }
        self.entities.swap_remove(row);
        self.stamp_all(version);
        (row != last).then(|| self.entities[row])
    }

    /// Overwrites one component of one row, stamping only that type.
    pub(crate) fn write(
        &mut self,
        row: u32,
        component: ComponentTypeId,
        value: &[u8],
        version: Version,
    ) -> bool {
        let Some(col) = self.column_index(component) else {
            return false;
        };
        let Some(slot) = self.columns[col].get_mut(row as usize) else {
            return false;
        };
        slot.copy_from_slice(value);
        if let Some(pos) = self.key.archetype.position(component) {
            self.change_versions[pos] = version;
        }
        true
    }

    /// Copies out every stored component of one row.
    pub(crate) fn row_values(&self, row: u32) -> Vec<(ComponentTypeId, Vec<u8>)> {
        self.columns
            .iter()
            .filter_map(|c| c.get(row as usize).map(|bytes| (c.id, bytes.to_vec())))
            .collect()
    }
}
