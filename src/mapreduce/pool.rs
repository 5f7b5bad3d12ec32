//! Bounded Worker Pool
//!
//! Runs CPU-bound closures on tokio's blocking thread pool while never letting more than
//! `threads` of them execute at once. This is the fixed-size pool behind both phase runners
//! and the local job.
//!
//! ## Lifecycle
//! 1. **Scheduling**: every task waits for one of the `threads` slots, then starts on a
//!    blocking thread. The slot is released when the closure returns (or panics).
//! 2. **Collection**: results are gathered as tasks finish and returned in submission order.
//! 3. **Timeout**: if scheduling plus collection exceeds the pool timeout, tasks that have
//!    not started are cancelled and tasks still running are detached.

use crate::error::RuntimeError;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Default upper bound for a single `execute` call.
pub const DEFAULT_PHASE_TIMEOUT: Duration = Duration::from_secs(5 * 60);

/// Result of an `execute` call.
#[derive(Debug)]
pub struct PoolOutcome<T> {
    /// Outputs of the tasks that completed, in submission order.
    pub results: Vec<T>,
    /// Tasks that panicked.
    pub panicked: usize,
    /// Tasks that never reported back because the timeout fired.
    pub abandoned: usize,
    pub timed_out: bool,
}

#[derive(Debug, Clone)]
pub struct WorkerPool {
    threads: usize,
    timeout: Duration,
}

impl WorkerPool {
    /// Creates a pool with `threads` concurrent slots.
    pub fn new(threads: usize) -> Result<Self, RuntimeError> {
        if threads == 0 {
            return Err(RuntimeError::InvalidThreadCount);
        }
        Ok(Self {
            threads,
            timeout: DEFAULT_PHASE_TIMEOUT,
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn threads(&self) -> usize {
        self.threads
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Runs every task, at most `threads` at a time.
    pub async fn execute<T, F>(&self, tasks: Vec<F>) -> Result<PoolOutcome<T>, RuntimeError>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let total = tasks.len();
        let slots = Arc::new(Semaphore::new(self.threads));
        let mut join_set: JoinSet<(usize, T)> = JoinSet::new();
        let mut finished: Vec<(usize, T)> = Vec::with_capacity(total);
        let mut panicked = 0usize;

        let work = async {
            for (index, task) in tasks.into_iter().enumerate() {
                let permit = slots
                    .clone()
                    .acquire_owned()
                    .await
                    .map_err(|_| RuntimeError::PoolClosed)?;

                join_set.spawn_blocking(move || {
                    let _permit = permit;
                    (index, task())
                });
            }

            while let Some(joined) = join_set.join_next().await {
                match joined {
                    Ok(output) => finished.push(output),
                    Err(e) => {
                        tracing::error!("Worker task failed: {}", e);
                        panicked += 1;
                    }
                }
            }

            Ok::<(), RuntimeError>(())
        };

        let waited = tokio::time::timeout(self.timeout, work).await;

        let timed_out = match waited {
            Ok(result) => {
                result?;
                false
            }
            Err(_) => {
                tracing::warn!(
                    "Worker pool did not finish within {:?}, abandoning outstanding tasks",
                    self.timeout
                );
                join_set.abort_all();
                true
            }
        };

        finished.sort_by_key(|(index, _)| *index);
        let abandoned = total - finished.len() - panicked;

        Ok(PoolOutcome {
            results: finished.into_iter().map(|(_, output)| output).collect(),
            panicked,
            abandoned,
            timed_out,
        })
    }
}
