//! Phase Runners
//!
//! Drive the Map and Reduce phases over a `WorkerPool`.
//!
//! Both runners split their input into at most `threads` contiguous chunks of
//! `ceil(total / threads)` items and hand one chunk to each worker. Failures are isolated:
//! an error on one record (or key) is logged and counted, and the rest of the chunk keeps going.

use super::pool::WorkerPool;
use super::types::{chunk_ranges, chunk_size, ChunkStats, MapContext, Mapper, PhaseSummary, Reducer};
use crate::error::RuntimeError;

use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;
use std::sync::Arc;
use std::time::Duration;

/// Runs a `Mapper` over a slice of inputs in parallel.
#[derive(Debug, Clone)]
pub struct MapPhaseRunner {
    pool: WorkerPool,
}

impl MapPhaseRunner {
    pub fn new(threads: usize) -> Result<Self, RuntimeError> {
        Ok(Self {
            pool: WorkerPool::new(threads)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.pool = self.pool.with_timeout(timeout);
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// Maps every input into `context`.
    ///
    /// Returns once all chunks have finished or the phase timeout fired.
    pub async fn run<I, K, V, M, C>(
        &self,
        inputs: Arc<Vec<I>>,
        mapper: Arc<M>,
        context: Arc<C>,
    ) -> Result<PhaseSummary, RuntimeError>
    where
        I: Debug + Send + Sync + 'static,
        K: 'static,
        V: 'static,
        M: Mapper<I, K, V> + ?Sized + 'static,
        C: MapContext<K, V> + 'static,
    {
        let total = inputs.len();
        if total == 0 {
            tracing::info!("MapPhaseRunner: no records to process, skipping Map phase");
            return Ok(PhaseSummary::default());
        }

        let chunk = chunk_size(total, self.threads());
        let ranges = chunk_ranges(total, chunk);

        tracing::info!(
            "MapPhaseRunner: starting Map phase for {} records, threads={}, chunkSize={}",
            total,
            self.threads(),
            chunk
        );

        let tasks: Vec<_> = ranges
            .iter()
            .map(|&(start, end)| {
                let inputs = inputs.clone();
                let mapper = mapper.clone();
                let context = context.clone();

                move || {
                    let mut stats = ChunkStats::default();
                    for input in &inputs[start..end] {
                        match mapper.map(input, &*context) {
                            Ok(()) => stats.processed += 1,
                            Err(e) => {
                                tracing::error!(
                                    "MapPhaseRunner: error while mapping record {:?}: {:#}",
                                    input,
                                    e
                                );
                                stats.failed += 1;
                            }
                        }
                    }
                    stats
                }
            })
            .collect();

        let outcome = self.pool.execute(tasks).await?;

        let mut summary = PhaseSummary {
            chunks: ranges.len(),
            failed_chunks: outcome.panicked + outcome.abandoned,
            timed_out: outcome.timed_out,
            ..PhaseSummary::default()
        };
        for stats in outcome.results {
            summary.merge_chunk(stats);
        }

        tracing::info!(
            "MapPhaseRunner: Map phase completed, processed={}, failed={}, keys={}",
            summary.processed,
            summary.failed,
            context.key_count()
        );

        Ok(summary)
    }
}

/// Runs a `Reducer` over grouped intermediate data in parallel.
#[derive(Debug, Clone)]
pub struct ReducePhaseRunner {
    pool: WorkerPool,
}

impl ReducePhaseRunner {
    pub fn new(threads: usize) -> Result<Self, RuntimeError> {
        Ok(Self {
            pool: WorkerPool::new(threads)?,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.pool = self.pool.with_timeout(timeout);
        self
    }

    pub fn threads(&self) -> usize {
        self.pool.threads()
    }

    /// Reduces every key of `grouped`.
    ///
    /// Keys with no values, keys whose reducer failed and keys the reducer declined
    /// (`Ok(None)`) are absent from the result.
    pub async fn run<K, V, O, R>(
        &self,
        grouped: Arc<HashMap<K, Vec<V>>>,
        reducer: Arc<R>,
    ) -> Result<HashMap<K, O>, RuntimeError>
    where
        K: Eq + Hash + Clone + Debug + Send + Sync + 'static,
        V: Send + Sync + 'static,
        O: Send + 'static,
        R: Reducer<K, V, O> + ?Sized + 'static,
    {
        if grouped.is_empty() {
            tracing::info!("ReducePhaseRunner: no keys to reduce, returning empty result");
            return Ok(HashMap::new());
        }

        let keys: Arc<Vec<K>> = Arc::new(grouped.keys().cloned().collect());
        let total = keys.len();
        let chunk = chunk_size(total, self.threads());
        let ranges = chunk_ranges(total, chunk);

        tracing::info!(
            "ReducePhaseRunner: starting Reduce phase for {} keys, threads={}, chunkSize={}",
            total,
            self.threads(),
            chunk
        );

        let tasks: Vec<_> = ranges
            .iter()
            .map(|&(start, end)| {
                let keys = keys.clone();
                let grouped = grouped.clone();
                let reducer = reducer.clone();

                move || {
                    let mut reduced = Vec::with_capacity(end - start);
                    for key in &keys[start..end] {
                        let values = match grouped.get(key) {
                            Some(values) if !values.is_empty() => values,
                            _ => continue,
                        };

                        match reducer.reduce(key, values) {
                            Ok(Some(output)) => reduced.push((key.clone(), output)),
                            Ok(None) => {}
                            Err(e) => {
                                tracing::error!(
                                    "ReducePhaseRunner: error while reducing key '{:?}': {:#}",
                                    key,
                                    e
                                );
                            }
                        }
                    }
                    reduced
                }
            })
            .collect();

        let outcome = self.pool.execute(tasks).await?;
        if outcome.timed_out {
            tracing::warn!(
                "ReducePhaseRunner: {} chunks abandoned after timeout",
                outcome.abandoned
            );
        }

        let result: HashMap<K, O> = outcome.results.into_iter().flatten().collect();

        tracing::info!(
            "ReducePhaseRunner: Reduce phase completed, result size={}",
            result.len()
        );

        Ok(result)
    }
}
