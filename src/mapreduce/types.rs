use std::collections::HashMap;

/// Sink that a `Mapper` writes its intermediate key/value pairs into.
///
/// Implementations must accept concurrent writes from every map worker.
pub trait MapContext<K, V>: Send + Sync {
    /// Appends `value` to the group of `key`.
    fn write(&self, key: K, value: V);

    /// Snapshot of everything written so far, grouped by key.
    fn grouped_data(&self) -> HashMap<K, Vec<V>>;

    /// Number of distinct keys written so far.
    fn key_count(&self) -> usize;
}

/// Turns one input item into zero or more intermediate pairs.
pub trait Mapper<I, K, V>: Send + Sync {
    fn map(&self, input: &I, context: &dyn MapContext<K, V>) -> anyhow::Result<()>;
}

/// Folds all intermediate values of one key into a single output.
///
/// Returning `Ok(None)` drops the key from the phase output.
pub trait Reducer<K, V, O>: Send + Sync {
    fn reduce(&self, key: &K, values: &[V]) -> anyhow::Result<Option<O>>;
}

/// Bookkeeping for a finished phase.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PhaseSummary {
    /// Number of chunks the input was split into.
    pub chunks: usize,
    /// Items handled without error.
    pub processed: usize,
    /// Items whose map/reduce call returned an error.
    pub failed: usize,
    /// Chunks that panicked or were abandoned.
    pub failed_chunks: usize,
    /// Whether the phase hit its timeout.
    pub timed_out: bool,
}

impl PhaseSummary {
    pub(crate) fn merge_chunk(&mut self, chunk: ChunkStats) {
        self.processed += chunk.processed;
        self.failed += chunk.failed;
    }
}

/// Per-chunk counters returned by a worker.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct ChunkStats {
    pub processed: usize,
    pub failed: usize,
}

/// Contiguous chunk size used to split `total` items over `threads` workers.
pub fn chunk_size(total: usize, threads: usize) -> usize {
    if total == 0 || threads == 0 {
        return 1;
    }
    total.div_ceil(threads).max(1)
}

/// Splits `0..total` into contiguous `[start, end)` ranges of at most `chunk` items.
pub(crate) fn chunk_ranges(total: usize, chunk: usize) -> Vec<(usize, usize)> {
    (0..total)
        .step_by(chunk.max(1))
        .map(|start| (start, (start + chunk).min(total)))
        .collect()
}
