//! Value change detection for one per-entity component type.
//!
//! The differ keeps one slot per matching chunk position. Each call compares every
//! slot against the chunk now at that position:
//!
//! - no slot yet: the chunk's entities and values are all added
//! - different chunk identity: the slot's cached rows are removed, the chunk's rows added
//! - same identity and change version: nothing is reported
//! - same identity, newer change version: cached rows removed, current rows added
//!
//! Slots past the new chunk count are flushed as removed. Only chunks that changed
//! cost more than a version comparison.

use chunkwatch_foundation::{ChunkId, ComponentInfo, ComponentTypeId, EntityId, Error, Result, Version};
use chunkwatch_storage::{ChunkSource, Query};

use crate::changes::ComponentChanges;
use crate::config::DiffConfig;
use crate::scan::map_chunks;

#[derive(Clone, Debug)]
struct Slot {
    chunk: ChunkId,
    version: Version,
    entities: Vec<EntityId>,
    data: Vec<u8>,
}

enum Scan {
    Unchanged,
    Rebuilt(Slot),
}

/// Reports added and removed (entity, value) pairs for a component type under a query.
#[derive(Clone, Debug)]
pub struct ComponentValueDiffer {
    component: ComponentTypeId,
    stride: usize,
    query: Query,
    config: DiffConfig,
    slots: Vec<Slot>,
    last_global: Option<Version>,
}

impl ComponentValueDiffer {
    /// Returns true if values of this component type can be watched.
    ///
    /// Watchable types are unmanaged per-entity data with a non-zero size and no
    /// embedded entity references.
    #[must_use]
    pub fn can_watch(info: &ComponentInfo) -> bool {
        info.can_watch_value()
    }

    /// Creates a differ for `component` over the chunks matching `query`.
    ///
    /// # Panics
    ///
    /// Panics if the component is unknown, cannot be watched, or is not required by
    /// the query.
    #[must_use]
    pub fn new<S: ChunkSource + ?Sized>(source: &S, component: impl Into<ComponentTypeId>, query: Query) -> Self {
        match Self::try_new(source, component, query) {
            Ok(differ) => differ,
            Err(e) => panic!("invalid component value differ: {e}"),
        }
    }

    /// Creates a differ, reporting usage errors instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` for unregistered types and `CannotWatch` for types
    /// that cannot be watched or are not required by the query.
    pub fn try_new<S: ChunkSource + ?Sized>(
        source: &S,
        component: impl Into<ComponentTypeId>,
        query: Query,
    ) -> Result<Self> {
        let component = component.into();
        let info = source
            .component_info(component)
            .ok_or_else(|| Error::unknown_component(component))?;
        if !Self::can_watch(info) {
            let reason = if info.has_entity_refs {
                "values contain entity references"
            } else if info.size == 0 {
                "component has no data"
            } else {
                "component is not unmanaged per-entity data"
            };
            return Err(Error::cannot_watch(info.name.clone(), reason));
        }
        if !query.requires(component) {
            return Err(Error::cannot_watch(
                info.name.clone(),
                "query does not require the component",
            ));
        }
        Ok(Self {
            component,
            stride: info.size,
            query,
            config: DiffConfig::default(),
            slots: Vec::new(),
            last_global: None,
        })
    }

    /// Builder method to set the configuration.
    #[must_use]
    pub fn with_config(mut self, config: DiffConfig) -> Self {
        self.config = config;
        self
    }

    /// Returns the watched component type.
    #[must_use]
    pub fn component(&self) -> ComponentTypeId {
        self.component
    }

    /// Returns the query.
    #[must_use]
    pub fn query(&self) -> &Query {
        &self.query
    }

    /// Returns the number of chunk slots held from the previous call.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Forgets all cached chunks, so the next call reports everything as added.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.last_global = None;
    }

    /// Computes the changes since the previous call.
    pub fn diff<S: ChunkSource + ?Sized>(&mut self, source: &S) -> ComponentChanges {
        let mut changes = ComponentChanges::new(self.stride);
        self.diff_into(source, &mut changes);
        changes
    }

    /// Like [`diff`](Self::diff), writing into a caller-owned result.
    pub fn diff_into<S: ChunkSource + ?Sized>(&mut self, source: &S, changes: &mut ComponentChanges) {
        changes.reset(self.stride);

        let global = source.current_global_version();
        if self.config.skip_when_global_unchanged && self.last_global == Some(global) {
            log::trace!("component diff skipped: global version {global:?} unchanged");
            return;
        }

        let chunks = source.matching_chunks(&self.query);
        let scans = map_chunks(&self.config, &chunks, |i, chunk| self.scan(source, i, chunk));

        if self.slots.len() > chunks.len() {
            let flushed = self.slots.len() - chunks.len();
            for slot in self.slots.drain(chunks.len()..) {
                changes.push_removed(slot.chunk, &slot.entities, &slot.data);
            }
            log::debug!("component diff flushed {flushed} stale slots");
        }

        let mut skipped = 0;
        for (i, scan) in scans.into_iter().enumerate() {
            let Scan::Rebuilt(slot) = scan else {
                skipped += 1;
                continue;
            };
            if let Some(old) = self.slots.get_mut(i) {
                changes.push_removed(old.chunk, &old.entities, &old.data);
                changes.push_added(slot.chunk, &slot.entities, &slot.data);
                *old = slot;
            } else {
                changes.push_added(slot.chunk, &slot.entities, &slot.data);
                self.slots.push(slot);
            }
        }
        self.last_global = Some(global);

        log::trace!(
            "component diff over {} chunks ({} skipped): {} added, {} removed",
            chunks.len(),
            skipped,
            changes.added_count(),
            changes.removed_count()
        );
    }

    fn scan<S: ChunkSource + ?Sized>(&self, source: &S, position: usize, chunk: ChunkId) -> Scan {
        let version = source.chunk_change_version(chunk, self.component);
        if let (Some(slot), Some(version)) = (self.slots.get(position), version) {
            if slot.chunk == chunk && slot.version == version {
                return Scan::Unchanged;
            }
        }

        let (entities, data) = match (
            source.chunk_entities(chunk),
            source.chunk_component_bytes(chunk, self.component),
        ) {
            (Some(entities), Some(column)) => (entities.to_vec(), column.as_bytes().to_vec()),
            _ => (Vec::new(), Vec::new()),
        };
        Scan::Rebuilt(Slot {
            chunk,
            version: version.unwrap_or(Version::ZERO),
            entities,
            data,
        })
    }
}
