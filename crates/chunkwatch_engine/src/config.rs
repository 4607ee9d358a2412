//! Configuration shared by every differ.

/// Tuning knobs for the differs.
///
/// The defaults suit interactive use on large stores. [`DiffConfig::sequential`]
/// keeps every scan on the calling thread.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiffConfig {
    /// Number of entities fed to the set differ per membership batch.
    pub entity_batch_size: usize,

    /// Minimum matching chunk count before the per-chunk scan runs in parallel.
    pub parallel_threshold: usize,

    /// Return an empty result when the store's global version has not moved.
    pub skip_when_global_unchanged: bool,
}

impl Default for DiffConfig {
    fn default() -> Self {
        Self {
            entity_batch_size: 4096,
            parallel_threshold: 64,
            skip_when_global_unchanged: true,
        }
    }
}

impl DiffConfig {
    /// Creates a configuration that never scans in parallel.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Self::default()
        }
    }

    /// Builder method to set the entity batch size.
    #[must_use]
    pub fn with_entity_batch_size(mut self, size: usize) -> Self {
        self.entity_batch_size = size.max(1);
        self
    }

    /// Builder method to set the parallel threshold.
    #[must_use]
    pub fn with_parallel_threshold(mut self, chunks: usize) -> Self {
        self.parallel_threshold = chunks;
        self
    }

    /// Builder method to enable/disable the global version short circuit.
    #[must_use]
    pub fn with_skip_when_global_unchanged(mut self, skip: bool) -> Self {
        self.skip_when_global_unchanged = skip;
        self
    }

    /// Returns true if a scan over `chunks` chunks should use the worker pool.
    #[must_use]
    pub fn use_parallel(&self, chunks: usize) -> bool {
        cfg!(feature = "parallel") && chunks >= self.parallel_threshold
    }
}
