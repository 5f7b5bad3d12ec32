//! In-Process MapReduce Engine
//!
//! A small MapReduce runtime that executes both phases on a bounded pool of worker threads.
//!
//! ## Pipeline
//! 1. **Map**: the input slice is split into contiguous chunks, one per worker. Each worker feeds
//!    its items through a `Mapper`, which writes intermediate pairs into a shared `MapContext`.
//! 2. **Shuffle**: `InMemoryMapContext` groups values by key as they are written.
//! 3. **Reduce**: the distinct keys are chunked again and each worker folds the values of its
//!    keys through a `Reducer`.
//!
//! ## Submodules
//! - **`types`**: the `Mapper`, `Reducer` and `MapContext` contracts plus phase bookkeeping.
//! - **`context`**: the concurrent in-memory grouping store.
//! - **`pool`**: the bounded worker pool (fixed number of concurrently running tasks, timeout).
//! - **`runtime`**: `MapPhaseRunner` and `ReducePhaseRunner`.
//! - **`sales`**: the per-category revenue job.

pub mod context;
pub mod pool;
pub mod runtime;
pub mod sales;
pub mod types;
