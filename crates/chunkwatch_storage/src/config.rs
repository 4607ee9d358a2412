//! Configuration for the chunk store.

use chunkwatch_foundation::{Error, Result};

/// Configuration for a [`World`](crate::World).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WorldConfig {
    /// Maximum number of entities per chunk.
    pub chunk_capacity: usize,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            chunk_capacity: 128,
        }
    }
}

impl WorldConfig {
    /// Creates a configuration with tiny chunks, useful for exercising multi-chunk paths.
    #[must_use]
    pub fn small_chunks() -> Self {
        Self { chunk_capacity: 4 }
    }

    /// Builder method to set the chunk capacity.
    #[must_use]
    pub fn with_chunk_capacity(mut self, capacity: usize) -> Self {
        self.chunk_capacity = capacity;
        self
    }

    /// Checks that every value is usable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the chunk capacity is zero or exceeds `u32::MAX`.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_capacity == 0 {
            return Err(Error::invalid_config("chunk capacity must be at least 1"));
        }
        if u32::try_from(self.chunk_capacity).is_err() {
            return Err(Error::invalid_config("chunk capacity must fit in u32"));
        }
        Ok(())
    }
}
