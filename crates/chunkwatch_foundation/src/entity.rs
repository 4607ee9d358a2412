//! Entity identity: an index plus the generation that index was on when issued.
//!
//! Generations encode liveness in their low bit. An index is alive while its
//! generation is odd and free while it is even, so every reuse of an index moves
//! its generation forward by two and yields an identity that never compares equal
//! to an earlier one. Differs rely on this: a reused index is reported as one
//! destroyed entity and one created entity.

use std::fmt;

/// Entity identifier. Equality and hashing use both fields.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct EntityId {
    /// Slot in the entity table.
    pub index: u32,
    /// Odd generation the slot was on when this id was issued.
    pub generation: u32,
}

impl EntityId {
    /// Generation of an index the first time it is issued.
    pub const FIRST_GENERATION: u32 = 1;

    /// Creates an entity ID from its parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns true if `generation` marks a live slot.
    #[must_use]
    pub const fn is_live_generation(generation: u32) -> bool {
        generation % 2 == 1
    }

    /// Returns the generation a slot moves to on its next spawn or destroy.
    ///
    /// `None` once the counter is exhausted; the slot must then be retired.
    #[must_use]
    pub const fn next_generation(generation: u32) -> Option<u32> {
        generation.checked_add(1)
    }

    /// Returns true if this id carries a live generation.
    ///
    /// Says nothing about whether the store still holds it.
    #[must_use]
    pub const fn has_live_generation(self) -> bool {
        Self::is_live_generation(self.generation)
    }

    /// Returns the identity the same index receives when next reused, if any.
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        match self.generation.checked_add(2) {
            Some(generation) => Some(Self::new(self.index, generation)),
            None => None,
        }
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({}v{})", self.index, self.generation)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}v{}", self.index, self.generation)
    }
}
