//! Opaque chunk identity tokens.

use std::fmt;

/// Identity of a chunk, valid for comparison within and across ticks.
///
/// A chunk lives at an arena `index`; every allocation into an index receives a fresh
/// `serial`, so a freed-and-reused index never compares equal to the chunk it
/// replaced. Equality is the only operation the diffing engine relies on.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct ChunkId {
    index: u32,
    serial: u32,
}

impl ChunkId {
    /// Creates a chunk identity from an arena index and allocation serial.
    #[must_use]
    pub const fn new(index: u32, serial: u32) -> Self {
        Self { index, serial }
    }

    /// Returns the arena index this chunk occupies.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.index
    }

    /// Returns the allocation serial.
    #[must_use]
    pub const fn serial(self) -> u32 {
        self.serial
    }
}

impl fmt::Debug for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkId({}#{})", self.index, self.serial)
    }
}
