//! Created/destroyed detection over the entities a query matches.

use chunkwatch_foundation::{EntityId, Version};
use chunkwatch_storage::{ChunkSource, Query};

use crate::config::DiffConfig;
use crate::set_differ::{SetChanges, SetDiffPass, SetDiffer};

/// Entities that started or stopped matching a query.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EntityChanges {
    /// Entities matched now but not at the previous call, in chunk visitation order.
    pub created: Vec<EntityId>,
    /// Entities matched at the previous call but not now, sorted by ID.
    pub destroyed: Vec<EntityId>,
}

impl EntityChanges {
    /// Returns true if nothing was created or destroyed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.created.is_empty() && self.destroyed.is_empty()
    }

    /// Empties both lists, keeping their allocations.
    pub fn clear(&mut self) {
        self.created.clear();
        self.destroyed.clear();
    }

    fn take_from(&mut self, changes: SetChanges<EntityId>) {
        self.created = changes.added;
        self.destroyed = changes.removed;
        self.destroyed.sort_unstable();
    }
}

/// Tracks which entities a query matches between calls.
///
/// Identity includes the generation, so a recycled index shows up as one destroyed
/// entity plus one created entity. Growth of the entity index space is not a change.
#[derive(Clone, Debug, Default)]
pub struct EntitySetDiffer {
    set: SetDiffer<EntityId>,
    config: DiffConfig,
    last: Option<(Version, Query)>,
}

impl EntitySetDiffer {
    /// Creates a differ with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a differ with the given configuration.
    #[must_use]
    pub fn with_config(config: DiffConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &DiffConfig {
        &self.config
    }

    /// Returns the number of entities matched at the previous call.
    #[must_use]
    pub fn tracked(&self) -> usize {
        self.set.len()
    }

    /// Diffs the entities currently matching `query` against the previous call.
    pub fn diff<S: ChunkSource + ?Sized>(&mut self, source: &S, query: &Query) -> EntityChanges {
        let mut changes = EntityChanges::default();
        self.diff_into(source, query, &mut changes);
        changes
    }

    /// Like [`diff`](Self::diff), writing into a caller-owned result.
    pub fn diff_into<S: ChunkSource + ?Sized>(
        &mut self,
        source: &S,
        query: &Query,
        changes: &mut EntityChanges,
    ) {
        changes.clear();
        let global = source.current_global_version();
        if self.config.skip_when_global_unchanged
            && self.last.as_ref().is_some_and(|(v, q)| *v == global && q == query)
        {
            log::trace!("entity diff skipped: global version {global:?} unchanged");
            return;
        }

        let batch_size = self.config.entity_batch_size.max(1);
        let chunks = source.matching_chunks(query);
        let mut pass = self.set.begin();
        for chunk in &chunks {
            if let Some(entities) = source.chunk_entities(*chunk) {
                for batch in entities.chunks(batch_size) {
                    pass.feed(batch.iter().copied());
                }
            }
        }
        changes.take_from(pass.finish());
        self.last = Some((global, query.clone()));

        log::trace!(
            "entity diff over {} chunks: {} created, {} destroyed",
            chunks.len(),
            changes.created.len(),
            changes.destroyed.len()
        );
    }

    /// Starts a diff whose match set is supplied by the caller in batches.
    ///
    /// The union of all fed batches is the new snapshot.
    pub fn begin(&mut self) -> EntityDiffPass<'_> {
        self.last = None;
        EntityDiffPass {
            pass: self.set.begin(),
        }
    }

    /// Forgets every tracked entity.
    pub fn reset(&mut self) {
        self.set.reset();
        self.last = None;
    }
}

/// A caller-fed entity snapshot in progress.
#[derive(Debug)]
pub struct EntityDiffPass<'a> {
    pass: SetDiffPass<'a, EntityId>,
}

impl EntityDiffPass<'_> {
    /// Adds a batch of matched entities.
    pub fn feed(&mut self, entities: &[EntityId]) {
        self.pass.feed(entities.iter().copied());
    }

    /// Completes the snapshot and returns the changes.
    #[must_use]
    pub fn finish(self) -> EntityChanges {
        let mut changes = EntityChanges::default();
        changes.take_from(self.pass.finish());
        changes
    }
}
