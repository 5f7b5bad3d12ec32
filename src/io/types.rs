use serde::Serialize;

/// Wall-clock duration of one full MapReduce run for a thread configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PerformanceSample {
    pub map_threads: usize,
    pub reduce_threads: usize,
    pub duration_millis: u128,
}
