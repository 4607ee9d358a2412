//! Entity lifecycle management with generational indices.
//!
//! The `EntityStore` manages entity allocation, tracks generations to detect
//! stale references to destroyed entities, and records where each live entity's
//! row currently sits.

use chunkwatch_foundation::{EntityId, Error, Result};

/// Physical position of a live entity: arena index of its chunk and row within it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Location {
    /// Arena index of the chunk.
    pub chunk: u32,
    /// Row within the chunk.
    pub row: u32,
}

/// Manages entity lifecycle, generation tracking, and locations.
///
/// Entities are allocated from a free list when available, otherwise
/// new indices are allocated. When an entity is destroyed, its index
/// is added to the free list and its generation is incremented.
///
/// An index whose generation reaches `u32::MAX` is retired on destroy and never
/// handed out again, so no identity is ever issued twice.
#[derive(Debug, Clone, Default)]
pub struct EntityStore {
    /// Generation counter for each entity index.
    /// Even generations are free, odd generations are alive.
    generations: Vec<u32>,
    /// Location of each index; meaningful only while alive.
    locations: Vec<Location>,
    /// Free list of indices available for reuse.
    free_list: Vec<u32>,
    /// Count of live entities.
    live_count: usize,
}

impl EntityStore {
    /// Creates a new empty entity store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawns a new entity at the given location, returns its ID.
    ///
    /// Reuses indices from the free list when available.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX - 1` indices are ever allocated.
    pub fn spawn(&mut self, location: Location) -> EntityId {
        self.live_count += 1;

        if let Some(index) = self.free_list.pop() {
            let idx = index as usize;
            // Free-list generations are even and below u32::MAX.
            let generation = EntityId::next_generation(self.generations[idx]).unwrap_or(u32::MAX);
            self.generations[idx] = generation;
            self.locations[idx] = location;
            EntityId::new(index, generation)
        } else {
            let index = u32::try_from(self.generations.len())
                .ok()
                .filter(|&i| i != u32::MAX)
                .expect("entity index space exhausted");
            self.generations.push(EntityId::FIRST_GENERATION);
            self.locations.push(location);
            EntityId::new(index, EntityId::FIRST_GENERATION)
        }
    }

    /// Destroys an entity.
    ///
    /// Returns the location the entity occupied.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is stale or already destroyed.
    pub fn destroy(&mut self, id: EntityId) -> Result<Location> {
        self.validate(id)?;

        let idx = id.index as usize;
        match EntityId::next_generation(self.generations[idx]) {
            Some(next) => {
                self.generations[idx] = next;
                self.free_list.push(id.index);
            }
            None => {
                // Retired: even, so never alive, and off the free list.
                self.generations[idx] = 0;
                log::trace!("retired entity index {}", id.index);
            }
        }
        self.live_count -= 1;

        Ok(self.locations[idx])
    }

    /// Checks if an entity exists and is not stale.
    #[must_use]
    pub fn exists(&self, id: EntityId) -> bool {
        self.validate(id).is_ok()
    }

    /// Validates that an entity is live.
    ///
    /// # Errors
    ///
    /// Returns `StaleEntity` on generation mismatch and `EntityNotFound` for indices
    /// that were never allocated or are currently free.
    pub fn validate(&self, id: EntityId) -> Result<()> {
        let idx = id.index as usize;

        let Some(&current_gen) = self.generations.get(idx) else {
            return Err(Error::entity_not_found(id));
        };

        if current_gen != id.generation {
            // Entity was destroyed and possibly reused
            return Err(Error::stale_entity(id));
        }

        if !EntityId::is_live_generation(current_gen) {
            return Err(Error::entity_not_found(id));
        }

        Ok(())
    }

    /// Returns the location of a live entity.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not live.
    pub fn location(&self, id: EntityId) -> Result<Location> {
        self.validate(id)?;
        Ok(self.locations[id.index as usize])
    }

    /// Records a new location for a live entity.
    ///
    /// Callers must only pass live IDs; the store does not validate here.
    pub(crate) fn relocate(&mut self, id: EntityId, location: Location) {
        self.locations[id.index as usize] = location;
    }

    /// Returns the total number of live entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.live_count
    }

    /// Returns true if there are no live entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.live_count == 0
    }

    /// Returns the number of indices ever allocated, live or free.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.generations.len()
    }

    /// Iterates over all live entity IDs in index order.
    pub fn iter(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.generations
            .iter()
            .enumerate()
            .filter(|(_, generation)| EntityId::is_live_generation(**generation))
            .filter_map(|(idx, generation)| {
                u32::try_from(idx).ok().map(|idx| EntityId::new(idx, *generation))
            })
    }

    /// Returns the current generation for an index, if it exists.
    #[must_use]
    pub fn generation(&self, index: u32) -> Option<u32> {
        self.generations.get(index as usize).copied()
    }
}
