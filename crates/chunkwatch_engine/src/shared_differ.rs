//! Grouping change detection for one shared component type.
//!
//! Every chunk carries a single value of each shared type, so a shared value is a
//! grouping of entities rather than per-entity data. The differ reports entities
//! entering and leaving each (chunk, value) group.

use std::collections::HashSet;

use chunkwatch_foundation::{ChunkId, ComponentInfo, ComponentTypeId, EntityId, Error, Result, Version};
use chunkwatch_storage::{ChunkSource, Query};

use crate::changes::SharedComponentChanges;
use crate::config::DiffConfig;
use crate::scan::map_chunks;

#[derive(Clone, Debug)]
struct Slot {
    chunk: ChunkId,
    version: Version,
    value: Box<[u8]>,
    entities: Vec<EntityId>,
}

enum Scan {
    Unchanged,
    /// New position, new identity, or new value: everything moves.
    Replaced(Slot),
    /// Same identity and value; only membership moved.
    Membership {
        slot: Slot,
        added: Vec<EntityId>,
        removed: Vec<EntityId>,
    },
}

/// Reports entities entering and leaving shared-value groups under a query.
#[derive(Clone, Debug)]
pub struct SharedGroupingDiffer {
    component: ComponentTypeId,
    query: Query,
    config: DiffConfig,
    slots: Vec<Slot>,
    last_global: Option<Version>,
}

impl SharedGroupingDiffer {
    /// Returns true if this component type can be watched as a grouping.
    #[must_use]
    pub fn can_watch(info: &ComponentInfo) -> bool {
        info.can_watch_shared()
    }

    /// Creates a differ for the shared `component` over the chunks matching `query`.
    ///
    /// # Panics
    ///
    /// Panics if the component is unknown, is not an unmanaged shared type, or is
    /// not required by the query.
    #[must_use]
    pub fn new<S: ChunkSource + ?Sized>(source: &S, component: impl Into<ComponentTypeId>, query: Query) -> Self {
        match Self::try_new(source, component, query) {
            Ok(differ) => differ,
            Err(e) => panic!("invalid shared grouping differ: {e}"),
        }
    }

    /// Creates a differ, reporting usage errors instead of panicking.
    ///
    /// # Errors
    ///
    /// Returns `UnknownComponent` for unregistered types and `CannotWatch` for types
    /// that are not unmanaged shared components or are not required by the query.
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
            return Err(Error::cannot_watch(
                info.name.clone(),
                "component is not an unmanaged shared component",
            ));
        }
        if !query.requires(component) {
            return Err(Error::cannot_watch(
                info.name.clone(),
                "query does not require the component",
            ));
        }
        Ok(Self {
            component,
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

    /// Forgets all cached chunks.
    pub fn reset(&mut self) {
        self.slots.clear();
        self.last_global = None;
    }

    /// Computes the changes since the previous call.
    pub fn diff<S: ChunkSource + ?Sized>(&mut self, source: &S) -> SharedComponentChanges {
        let mut changes = SharedComponentChanges::new();
        self.diff_into(source, &mut changes);
        changes
    }

    /// Like [`diff`](Self::diff), writing into a caller-owned result.
    pub fn diff_into<S: ChunkSource + ?Sized>(&mut self, source: &S, changes: &mut SharedComponentChanges) {
        changes.clear();

        let global = source.current_global_version();
        if self.config.skip_when_global_unchanged && self.last_global == Some(global) {
            log::trace!("shared diff skipped: global version {global:?} unchanged");
            return;
        }

        let chunks = source.matching_chunks(&self.query);
        let scans = map_chunks(&self.config, &chunks, |i, chunk| self.scan(source, i, chunk));

        if self.slots.len() > chunks.len() {
            let flushed = self.slots.len() - chunks.len();
            for slot in self.slots.drain(chunks.len()..) {
                changes.push_removed(slot.chunk, slot.entities.iter().copied(), &slot.value);
            }
            log::debug!("shared diff flushed {flushed} stale slots");
        }

        let mut skipped = 0;
        for (i, scan) in scans.into_iter().enumerate() {
            match scan {
                Scan::Unchanged => skipped += 1,
                Scan::Replaced(slot) => {
                    if let Some(old) = self.slots.get(i) {
                        changes.push_removed(old.chunk, old.entities.iter().copied(), &old.value);
                    }
                    changes.push_added(slot.chunk, slot.entities.iter().copied(), &slot.value);
                    self.install(i, slot);
                }
                Scan::Membership {
                    slot,
                    added,
                    removed,
                } => {
                    changes.push_removed(slot.chunk, removed, &slot.value);
                    changes.push_added(slot.chunk, added, &slot.value);
                    self.install(i, slot);
                }
            }
        }
        self.last_global = Some(global);

        log::trace!(
            "shared diff over {} chunks ({} skipped): {} added, {} removed",
            chunks.len(),
            skipped,
            changes.added_count(),
            changes.removed_count()
        );
    }

    fn install(&mut self, position: usize, slot: Slot) {
        match self.slots.get_mut(position) {
            Some(old) => *old = slot,
            None => self.slots.push(slot),
        }
    }

    fn scan<S: ChunkSource + ?Sized>(&self, source: &S, position: usize, chunk: ChunkId) -> Scan {
        let version = source.chunk_change_version(chunk, self.component);
        let previous = self.slots.get(position);
        if let (Some(slot), Some(version)) = (previous, version) {
            if slot.chunk == chunk && slot.version == version {
                return Scan::Unchanged;
            }
        }

        let value: Box<[u8]> = source
            .chunk_shared_value(chunk, self.component)
            .unwrap_or_default()
            .into();
        let entities = source
            .chunk_entities(chunk)
            .map(<[EntityId]>::to_vec)
            .unwrap_or_default();
        let slot = Slot {
            chunk,
            version: version.unwrap_or(Version::ZERO),
            value,
            entities,
        };

        match previous {
            Some(old) if old.chunk == chunk && old.value == slot.value => {
                let before: HashSet<_> = old.entities.iter().copied().collect();
                let after: HashSet<_> = slot.entities.iter().copied().collect();
                let added = slot
                    .entities
                    .iter()
                    .copied()
                    .filter(|e| !before.contains(e))
                    .collect();
                let removed = old
                    .entities
                    .iter()
                    .copied()
                    .filter(|e| !after.contains(e))
                    .collect();
                Scan::Membership {
                    slot,
                    added,
                    removed,
                }
            }
            _ => Scan::Replaced(slot),
        }
    }
}
