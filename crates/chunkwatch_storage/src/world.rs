//! The chunked, versioned entity store.
//!
//! The `World` owns component registration, entity allocation, and the chunk arena.
//! Every mutation first advances the global version and then stamps whatever it
//! touches with that version, which is what lets readers skip untouched chunks.

use std::collections::HashMap;

use bytemuck::Pod;
use chunkwatch_foundation::{
    ChunkId, ComponentInfo, ComponentKind, ComponentTypeId, EntityId, Error, ErrorContext,
    ErrorKind, Result, Version,
};

use crate::archetype::Archetype;
use crate::builder::EntityBuilder;
use crate::chunk::{Chunk, ChunkKey};
use crate::config::WorldConfig;
use crate::entity::{EntityStore, Location};
use crate::query::Query;
use crate::registry::{ComponentRegistry, ComponentType};

/// A mutable store of entities grouped into fixed-capacity chunks.
///
/// Chunks live in an arena. A freed arena index may be reused by a later chunk, which
/// receives a fresh [`ChunkId`] serial so that observers can tell the two apart.
#[derive(Clone, Debug)]
pub struct World {
    config: WorldConfig,
    registry: ComponentRegistry,
    entities: EntityStore,
    chunks: Vec<Option<Chunk>>,
    free_chunks: Vec<u32>,
    by_key: HashMap<ChunkKey, Vec<u32>>,
    next_serial: u32,
    version: Version,
}

impl World {
    /// Creates an empty world with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::build(WorldConfig::default())
    }

    /// Creates an empty world with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn with_config(config: WorldConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: WorldConfig) -> Self {
        Self {
            config,
            registry: ComponentRegistry::new(),
            entities: EntityStore::new(),
            chunks: Vec::new(),
            free_chunks: Vec::new(),
            by_key: HashMap::new(),
            next_serial: 0,
            version: Version::INITIAL,
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    /// Returns the component registry.
    #[must_use]
    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    /// Gets metadata for a component type.
    #[must_use]
    pub fn component_info(&self, component: ComponentTypeId) -> Option<&ComponentInfo> {
        self.registry.get(component)
    }

    // --- Registration ---

    /// Registers a per-entity plain data component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.registry.register(name)
    }

    /// Registers a per-entity component whose values embed entity IDs.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_entity_ref<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.registry.register_entity_ref(name)
    }

    /// Registers a shared component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_shared<T: Pod>(&mut self, name: &str) -> Result<ComponentType<T>> {
        self.registry.register_shared(name)
    }

    /// Registers a tag component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_tag(&mut self, name: &str) -> Result<ComponentTypeId> {
        self.registry.register_tag(name)
    }

    /// Registers a managed component.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is taken.
    pub fn register_managed(&mut self, name: &str, size: usize, shared: bool) -> Result<ComponentTypeId> {
        self.registry.register_managed(name, size, shared)
    }

    // --- Versions ---

    /// Returns the current global version.
    #[must_use]
    pub fn global_version(&self) -> Version {
        self.version
    }

    /// Advances the global version without touching any data.
    pub fn bump_version(&mut self) -> Version {
        self.version = self.version.next();
        self.version
    }

    // --- Inspection ---

    /// Returns the number of live entities.
    #[must_use]
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Returns the number of live chunks.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len() - self.free_chunks.len()
    }

    /// Checks if an entity exists.
    #[must_use]
    pub fn exists(&self, entity: EntityId) -> bool {
        self.entities.exists(entity)
    }

    /// Iterates over all live entities in index order.
    pub fn entities(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities.iter()
    }

    /// Iterates over all live chunks in arena order.
    pub fn chunks(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.iter().flatten()
    }

    /// Iterates over the chunks matching a query, in arena order.
    pub fn query_chunks<'a>(&'a self, query: &'a Query) -> impl Iterator<Item = &'a Chunk> + 'a {
        self.chunks().filter(move |c| query.matches(c.archetype()))
    }

    /// Resolves a chunk identity, if that chunk is still alive.
    #[must_use]
    pub fn chunk(&self, id: ChunkId) -> Option<&Chunk> {
        self.chunks
            .get(id.index() as usize)?
            .as_ref()
            .filter(|c| c.id() == id)
    }

    /// Returns the identity of the chunk holding an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live.
    pub fn chunk_of(&self, entity: EntityId) -> Result<ChunkId> {
        let loc = self.entities.location(entity)?;
        Ok(self.chunk_at(loc.chunk)?.id())
    }

    /// Checks if an entity has a component type.
    #[must_use]
    pub fn has(&self, entity: EntityId, component: impl Into<ComponentTypeId>) -> bool {
        let component = component.into();
        self.entities
            .location(entity)
            .ok()
            .and_then(|loc| self.chunk_at(loc.chunk).ok())
            .is_some_and(|c| c.archetype().contains(component))
    }

    /// Reads a per-entity component value.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or lacks the component.
    pub fn get<T: Pod>(&self, entity: EntityId, component: ComponentType<T>) -> Result<T> {
        self.get_raw(entity, component.id())
            .map(bytemuck::pod_read_unaligned)
    }

    /// Reads a per-entity component as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or lacks the component.
    pub fn get_raw(&self, entity: EntityId, component: ComponentTypeId) -> Result<&[u8]> {
        let loc = self.entities.location(entity)?;
        let chunk = self.chunk_at(loc.chunk)?;
        chunk
            .column(component)
            .and_then(|col| col.get(loc.row as usize))
            .ok_or_else(|| self.missing(entity, component))
    }

    /// Reads a shared component value.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or lacks the component.
    pub fn get_shared<T: Pod>(&self, entity: EntityId, component: ComponentType<T>) -> Result<T> {
        self.get_shared_raw(entity, component.id())
            .map(bytemuck::pod_read_unaligned)
    }

    /// Reads a shared component as bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or lacks the component.
    pub fn get_shared_raw(&self, entity: EntityId, component: ComponentTypeId) -> Result<&[u8]> {
        let loc = self.entities.location(entity)?;
        self.chunk_at(loc.chunk)?
            .shared_value(component)
            .ok_or_else(|| self.missing(entity, component))
    }

    // --- Structural mutation ---

    /// Spawns an entity with no components.
    ///
    /// # Errors
    ///
    /// Returns an error only if internal chunk bookkeeping is inconsistent.
    pub fn spawn(&mut self) -> Result<EntityId> {
        self.spawn_with(EntityBuilder::new())
    }

    /// Spawns an entity with the components collected in a builder.
    ///
    /// # Errors
    ///
    /// Returns an error if any component is unknown, has the wrong kind for how it
    /// was added, or has the wrong size.
    pub fn spawn_with(&mut self, builder: EntityBuilder) -> Result<EntityId> {
        for (id, bytes) in &builder.values {
            self.check_value(*id, bytes.len())?;
        }
        for (id, bytes) in &builder.shared {
            self.check_shared(*id, bytes.len())?;
        }
        for id in &builder.tags {
            self.check_kind(*id, &[ComponentKind::Tag])?;
        }

        let mut archetype_types: Vec<_> = builder.component_types().collect();
        archetype_types.sort_unstable();
        let shared = builder
            .shared
            .iter()
            .map(|(id, bytes)| (*id, bytes.clone().into_boxed_slice()))
            .collect();
        let key = ChunkKey::new(Archetype::from_components(archetype_types), shared);

        let version = self.advance();
        let entity = self.entities.spawn(Location { chunk: 0, row: 0 });
        let loc = self.insert_into(entity, &key, &builder.values, version)?;
        self.entities.relocate(entity, loc);
        Ok(entity)
    }

    /// Destroys an entity and all its components.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is stale or already destroyed.
    pub fn destroy(&mut self, entity: EntityId) -> Result<()> {
        self.entities.validate(entity).map_err(|e| {
            e.with_context(ErrorContext::new().with_operation("destroy").with_entity(entity))
        })?;
        let version = self.advance();
        let loc = self.entities.destroy(entity)?;
        self.detach(loc, version)
    }

    /// Writes a per-entity component, adding it if the entity lacks it.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or the component is not a data type.
    pub fn set<T: Pod>(&mut self, entity: EntityId, component: ComponentType<T>, value: T) -> Result<()> {
        self.set_raw(entity, component.id(), bytemuck::bytes_of(&value))
    }

    /// Writes a per-entity component from bytes, adding it if the entity lacks it.
    ///
    /// Overwriting stamps only this component type's change version in the entity's
    /// chunk. Adding moves the entity to another chunk.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live, the component is not a data type,
    /// or the value has the wrong size.
    pub fn set_raw(&mut self, entity: EntityId, component: ComponentTypeId, bytes: &[u8]) -> Result<()> {
        self.check_value(component, bytes.len())?;
        let loc = self.entities.location(entity)?;

        let version = self.advance();
        let chunk = self.chunk_at_mut(loc.chunk)?;
        if chunk.archetype().contains(component) {
            chunk.write(loc.row, component, bytes, version);
            return Ok(());
        }

        let key = chunk.key().with_component(component);
        let mut values = chunk.row_values(loc.row);
        values.push((component, bytes.to_vec()));
        self.move_entity(entity, loc, &key, &values, version)
    }

    /// Sets a shared component, moving the entity to the chunk group for that value.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or the component is not shared.
    pub fn set_shared<T: Pod>(&mut self, entity: EntityId, component: ComponentType<T>, value: T) -> Result<()> {
        self.set_shared_raw(entity, component.id(), bytemuck::bytes_of(&value))
    }

    /// Sets a shared component from bytes.
    ///
    /// Setting the value the entity already has is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live, the component is not shared, or
    /// the value has the wrong size.
    pub fn set_shared_raw(&mut self, entity: EntityId, component: ComponentTypeId, bytes: &[u8]) -> Result<()> {
        self.check_shared(component, bytes.len())?;
        let loc = self.entities.location(entity)?;
        let chunk = self.chunk_at(loc.chunk)?;
        if chunk.shared_value(component) == Some(bytes) {
            return Ok(());
        }

        let key = chunk.key().with_shared(component, bytes);
        let values = chunk.row_values(loc.row);
        let version = self.advance();
        self.move_entity(entity, loc, &key, &values, version)
    }

    /// Adds a tag component.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or the component is not a tag.
    pub fn add_tag(&mut self, entity: EntityId, component: ComponentTypeId) -> Result<()> {
        self.check_kind(component, &[ComponentKind::Tag])?;
        let loc = self.entities.location(entity)?;
        let chunk = self.chunk_at(loc.chunk)?;
        if chunk.archetype().contains(component) {
            return Ok(());
        }

        let key = chunk.key().with_component(component);
        let values = chunk.row_values(loc.row);
        let version = self.advance();
        self.move_entity(entity, loc, &key, &values, version)
    }

    /// Removes a component of any kind from an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live or lacks the component.
    pub fn remove(&mut self, entity: EntityId, component: impl Into<ComponentTypeId>) -> Result<()> {
        let component = component.into();
        let loc = self.entities.location(entity)?;
        let chunk = self.chunk_at(loc.chunk)?;
        if !chunk.archetype().contains(component) {
            return Err(self.missing(entity, component));
        }

        let key = chunk.key().without(component);
        let mut values = chunk.row_values(loc.row);
        values.retain(|(id, _)| *id != component);
        let version = self.advance();
        self.move_entity(entity, loc, &key, &values, version)
    }

    /// Packs partially filled chunks of each group into as few chunks as possible.
    ///
    /// Rows move from the highest-indexed chunks into the lowest-indexed ones with
    /// space; emptied chunks are freed. Returns the number of entities moved.
    ///
    /// # Errors
    ///
    /// Returns an error only if internal chunk bookkeeping is inconsistent.
    pub fn compact(&mut self) -> Result<usize> {
        let keys: Vec<ChunkKey> = self
            .by_key
            .iter()
            .filter(|(_, indices)| indices.len() > 1)
            .map(|(key, _)| key.clone())
            .collect();
        if keys.is_empty() {
            return Ok(0);
        }

        let version = self.advance();
        let mut moved = 0;
        for key in keys {
            let mut indices = self.by_key.get(&key).cloned().unwrap_or_default();
            indices.sort_unstable();
            let (mut lo, mut hi) = (0, indices.len() - 1);
            while lo < hi {
                if self.chunk_at(indices[lo])?.is_full() {
                    lo += 1;
                    continue;
                }
                let source = self.chunk_at(indices[hi])?;
                let last = u32::try_from(source.len() - 1)
                    .map_err(|_| Error::new(ErrorKind::Internal("chunk row index overflow".into())))?;
                let entity = source.entities()[last as usize];
                let values = source.row_values(last);

                self.chunk_at_mut(indices[hi])?.swap_remove(last, version);
                let row = self.chunk_at_mut(indices[lo])?.push(entity, &values, version)?;
                self.entities.relocate(entity, Location { chunk: indices[lo], row });
                moved += 1;

                if self.chunk_at(indices[hi])?.is_empty() {
                    self.free_chunk(indices[hi]);
                    hi -= 1;
                }
            }
        }

        log::debug!("compacted world: {moved} entities moved at {version:?}");
        Ok(moved)
    }

    // --- Private helpers ---

    fn advance(&mut self) -> Version {
        self.bump_version()
    }

    fn missing(&self, entity: EntityId, component: ComponentTypeId) -> Error {
        let name = self
            .registry
            .get(component)
            .map_or_else(|| format!("{component:?}"), |info| info.name.clone());
        Error::component_not_found(entity, name)
    }

    fn check_kind(&self, component: ComponentTypeId, allowed: &[ComponentKind]) -> Result<&ComponentInfo> {
        let info = self.registry.info(component)?;
        if allowed.contains(&info.kind) {
            Ok(info)
        } else {
            Err(Error::wrong_kind(info.name.clone(), allowed[0], info.kind))
        }
    }

    fn check_value(&self, component: ComponentTypeId, len: usize) -> Result<()> {
        let info = self.check_kind(component, &[ComponentKind::Data, ComponentKind::Managed])?;
        if info.size == len {
            Ok(())
        } else {
            Err(Error::size_mismatch(info.name.clone(), info.size, len))
        }
    }

    fn check_shared(&self, component: ComponentTypeId, len: usize) -> Result<()> {
        let info = self.check_kind(component, &[ComponentKind::Shared, ComponentKind::ManagedShared])?;
        if info.size == len {
            Ok(())
        } else {
            Err(Error::size_mismatch(info.name.clone(), info.size, len))
        }
    }

    fn chunk_at(&self, index: u32) -> Result<&Chunk> {
        self.chunks
            .get(index as usize)
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("no chunk at arena index {index}"))))
    }

    fn chunk_at_mut(&mut self, index: u32) -> Result<&mut Chunk> {
        self.chunks
            .get_mut(index as usize)
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::new(ErrorKind::Internal(format!("no chunk at arena index {index}"))))
    }

    fn layouts(&self, key: &ChunkKey) -> Vec<(ComponentTypeId, usize)> {
        key.archetype()
            .components()
            .iter()
            .filter_map(|id| self.registry.get(*id))
            .filter(|info| matches!(info.kind, ComponentKind::Data | ComponentKind::Managed))
            .map(|info| (info.id, info.size))
            .collect()
    }

    fn allocate_chunk(&mut self, key: &ChunkKey, version: Version) -> Result<u32> {
        let layouts = self.layouts(key);
        let serial = self.next_serial;
        self.next_serial = self.next_serial.wrapping_add(1);

        let index = match self.free_chunks.pop() {
            Some(index) => index,
            None => {
                self.chunks.push(None);
                u32::try_from(self.chunks.len() - 1)
                    .map_err(|_| Error::new(ErrorKind::Internal("chunk arena exhausted".into())))?
            }
        };

        let id = ChunkId::new(index, serial);
        self.chunks[index as usize] = Some(Chunk::new(
            id,
            key.clone(),
            &layouts,
            self.config.chunk_capacity,
            version,
        ));
        self.by_key.entry(key.clone()).or_default().push(index);
        log::trace!("allocated {id:?} for {} component types", key.archetype().len());
        Ok(index)
    }

    fn free_chunk(&mut self, index: u32) {
        let Some(chunk) = self.chunks.get_mut(index as usize).and_then(Option::take) else {
            return;
        };
        if let Some(indices) = self.by_key.get_mut(chunk.key()) {
            indices.retain(|&i| i != index);
            if indices.is_empty() {
                self.by_key.remove(chunk.key());
            }
        }
        self.free_chunks.push(index);
        log::trace!("freed {:?}", chunk.id());
    }

    fn insert_into(
        &mut self,
        entity: EntityId,
        key: &ChunkKey,
        values: &[(ComponentTypeId, Vec<u8>)],
        version: Version,
    ) -> Result<Location> {
        let existing = self.by_key.get(key).and_then(|indices| {
            indices
                .iter()
                .copied()
                .find(|&i| self.chunks[i as usize].as_ref().is_some_and(|c| !c.is_full()))
        });
        let index = match existing {
            Some(index) => index,
            None => self.allocate_chunk(key, version)?,
        };
        let row = self.chunk_at_mut(index)?.push(entity, values, version)?;
        Ok(Location { chunk: index, row })
    }

    fn detach(&mut self, loc: Location, version: Version) -> Result<()> {
        let chunk = self.chunk_at_mut(loc.chunk)?;
        if let Some(moved) = chunk.swap_remove(loc.row, version) {
            self.entities.relocate(moved, loc);
        }
        if self.chunk_at(loc.chunk)?.is_empty() {
            self.free_chunk(loc.chunk);
        }
        Ok(())
    }

    fn move_entity(
        &mut self,
        entity: EntityId,
        from: Location,
        key: &ChunkKey,
        values: &[(ComponentTypeId, Vec<u8>)],
        version: Version,
    ) -> Result<()> {
        self.detach(from, version)?;
        let to = self.insert_into(entity, key, values, version)?;
        self.entities.relocate(entity, to);
        Ok(())
    }
}

impl Default for World {
    fn default() -> Self {
        Self::new()
    }
}
