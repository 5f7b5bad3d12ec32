//! Sales Analysis Orchestration
//!
//! Wires the reader, the MapReduce runners and the writers together:
//! - a single analysis with the configured thread counts, written as a result table;
//! - a grid of runs over the map/reduce thread profiles, timed into a performance CSV.

use super::types::AnalysisOutcome;
use crate::config::AnalysisConfig;
use crate::io::types::PerformanceSample;
use crate::io::writer::{write_results, PerformanceLog};
use crate::mapreduce::context::InMemoryMapContext;
use crate::mapreduce::runtime::{MapPhaseRunner, ReducePhaseRunner};
use crate::mapreduce::types::MapContext;
use crate::mapreduce::sales::{SalesMapper, SalesReducer};
use crate::model::{CategoryStats, SalesRecord};

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

pub struct SalesAnalysis {
    config: AnalysisConfig,
}

impl SalesAnalysis {
    pub fn new(config: AnalysisConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Runs Map and Reduce over `records` and returns rows sorted by revenue.
    pub async fn execute_map_reduce(
        &self,
        records: Arc<Vec<SalesRecord>>,
        map_threads: usize,
        reduce_threads: usize,
    ) -> Result<Vec<(String, CategoryStats)>> {
        let timeout = self.config.phase_timeout();
        let map_runner = MapPhaseRunner::new(map_threads)?.with_timeout(timeout);
        let reduce_runner = ReducePhaseRunner::new(reduce_threads)?.with_timeout(timeout);

        let context = Arc::new(InMemoryMapContext::<String, CategoryStats>::new());

        // Map
        let summary = map_runner
            .run(records, Arc::new(SalesMapper), context.clone())
            .await
            .context("Map phase failed")?;
        if summary.timed_out {
            tracing::warn!(
                "Map phase timed out, {} chunks incomplete; results are partial",
                summary.failed_chunks
            );
        }

        // Reduce
        let grouped = Arc::new(context.grouped_data());
        let reduced = reduce_runner
            .run(grouped, Arc::new(SalesReducer))
            .await
            .context("Reduce phase failed")?;

        Ok(sort_by_revenue_desc(reduced))
    }

    /// Runs one analysis and writes the result table.
    pub async fn run_single_analysis(
        &self,
        records: Arc<Vec<SalesRecord>>,
        map_threads: usize,
        reduce_threads: usize,
    ) -> Result<AnalysisOutcome> {
        tracing::info!(
            "Running single analysis with mapThreads={}, reduceThreads={}",
            map_threads,
            reduce_threads
        );

        let start = Instant::now();
        let rows = self
            .execute_map_reduce(records, map_threads, reduce_threads)
            .await?;
        let duration = start.elapsed();

        tracing::info!(
            "Single analysis finished in {} ms, categories={}",
            duration.as_millis(),
            rows.len()
        );

        write_results(&rows, &self.config.result_file)?;

        Ok(AnalysisOutcome { rows, duration })
    }

    /// Times a full run for every `(map, reduce)` pair, map-major, streaming rows to the
    /// performance CSV.
    pub async fn run_performance_experiments(
        &self,
        records: Arc<Vec<SalesRecord>>,
        map_thread_profiles: &[usize],
        reduce_thread_profiles: &[usize],
    ) -> Result<Vec<PerformanceSample>> {
        tracing::info!(
            "Running performance experiments for mapThreads={:?} and reduceThreads={:?}",
            map_thread_profiles,
            reduce_thread_profiles
        );

        let mut log = PerformanceLog::create(&self.config.performance_file)?;
        let mut samples =
            Vec::with_capacity(map_thread_profiles.len() * reduce_thread_profiles.len());

        for &map_threads in map_thread_profiles {
            for &reduce_threads in reduce_thread_profiles {
                let start = Instant::now();
                self.execute_map_reduce(records.clone(), map_threads, reduce_threads)
                    .await?;
                let sample = PerformanceSample {
                    map_threads,
                    reduce_threads,
                    duration_millis: start.elapsed().as_millis(),
                };

                tracing::debug!("Performance sample: {:?}", sample);
                log.record(&sample)?;
                samples.push(sample);
            }
        }

        tracing::info!("Performance results written to '{}'", log.path().display());
        Ok(samples)
    }
}

/// Orders categories by total revenue, highest first; equal revenues by category name.
pub fn sort_by_revenue_desc(reduced: HashMap<String, CategoryStats>) -> Vec<(String, CategoryStats)> {
    let mut rows: Vec<(String, CategoryStats)> = reduced.into_iter().collect();
    rows.sort_by(|(name_a, a), (name_b, b)| {
        b.total_revenue
            .cmp(&a.total_revenue)
            .then_with(|| name_a.cmp(name_b))
    });
    rows
}
