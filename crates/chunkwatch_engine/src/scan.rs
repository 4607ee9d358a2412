//! Per-chunk scan driver.

use chunkwatch_foundation::ChunkId;

use crate::config::DiffConfig;

/// Applies `visit` to every (position, chunk) pair, returning results in chunk order.
///
/// Runs on the rayon pool when the configuration allows it for this many chunks.
pub(crate) fn map_chunks<T, F>(config: &DiffConfig, chunks: &[ChunkId], visit: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize, ChunkId) -> T + Send + Sync,
{
    if config.use_parallel(chunks.len()) {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            return chunks
                .par_iter()
                .enumerate()
                .map(|(i, chunk)| visit(i, *chunk))
                .collect();
        }
    }
    chunks
        .iter()
        .enumerate()
        .map(|(i, chunk)| visit(i, *chunk))
        .collect()
}
