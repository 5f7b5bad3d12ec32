//! Local File-to-File Job
//!
//! Runs the sales aggregation the way a single-node Hadoop job does: text files in, one
//! `part-r-NNNNN` file per reduce partition out.
//!
//! ## Stages
//! 1. **Setup**: validates the input directory and recreates the output directory.
//! 2. **Map**: one task per visible input file. Each line is parsed into a `SalesRecord` and
//!    emitted as `(category, SalesWritable)`, encoded and routed by the `HashPartitioner`.
//! 3. **Shuffle**: map outputs are concatenated per partition in input-file order.
//! 4. **Reduce**: one task per partition decodes its pairs, groups them by key in sorted order,
//!    sums them and writes `category \t revenue \t quantity` lines.
//! 5. **Commit**: an empty `_SUCCESS` file marks the output as complete.

use super::partitioner::HashPartitioner;
use super::types::{JobReport, MapTaskOutput, SalesWritable};
use crate::config::AnalysisConfig;
use crate::mapreduce::pool::{WorkerPool, DEFAULT_PHASE_TIMEOUT};
use crate::model::{format_money, SalesRecord};

use anyhow::{bail, Context, Result};
use bigdecimal::{BigDecimal, ToPrimitive};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Marker file written after every partition has been committed.
pub const SUCCESS_MARKER: &str = "_SUCCESS";

/// Name of the output file of reduce partition `partition`.
pub fn part_file_name(partition: u32) -> String {
    format!("part-r-{:05}", partition)
}

#[derive(Debug, Clone)]
pub struct LocalJob {
    input_dir: PathBuf,
    output_dir: PathBuf,
    reduce_partitions: u32,
    map_slots: usize,
    timeout: Duration,
}

impl LocalJob {
    pub fn new(input_dir: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            output_dir: output_dir.into(),
            reduce_partitions: 1,
            map_slots: 4,
            timeout: DEFAULT_PHASE_TIMEOUT,
        }
    }

    pub fn from_config(config: &AnalysisConfig) -> Self {
        Self::new(config.job_input_dir(), &config.job.output_dir)
            .with_reduce_partitions(config.job.reduce_partitions)
            .with_map_slots(config.job.map_slots)
            .with_timeout(config.phase_timeout())
    }

    pub fn with_reduce_partitions(mut self, partitions: usize) -> Self {
        self.reduce_partitions = u32::try_from(partitions.max(1)).unwrap_or(u32::MAX);
        self
    }

    pub fn with_map_slots(mut self, slots: usize) -> Self {
        self.map_slots = slots.max(1);
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub async fn run(&self) -> Result<JobReport> {
        let job_id = format!(
            "job_local_{}",
            &uuid::Uuid::new_v4().simple().to_string()[..12]
        );

        if !self.input_dir.is_dir() {
            bail!(
                "Input directory does not exist or is not a directory: {}",
                self.input_dir.display()
            );
        }
        self.prepare_output_dir()?;

        let inputs = self.input_files()?;
        tracing::info!(
            "Submitting job {}: input={}, output={}, splits={}, reducePartitions={}",
            job_id,
            self.input_dir.display(),
            self.output_dir.display(),
            inputs.len(),
            self.reduce_partitions
        );

        // Map
        let partitioner = HashPartitioner::new(self.reduce_partitions);
        let map_tasks: Vec<_> = inputs
            .iter()
            .cloned()
            .map(|path| move || run_map_task(&path, partitioner))
            .collect();

        let map_pool = WorkerPool::new(self.map_slots)?.with_timeout(self.timeout);
        let map_outcome = map_pool.execute(map_tasks).await?;
        if map_outcome.timed_out || map_outcome.panicked > 0 {
            bail!(
                "Job {} failed: {} map tasks did not complete",
                job_id,
                map_outcome.panicked + map_outcome.abandoned
            );
        }

        // Shuffle
        let mut buckets: Vec<Vec<(String, Vec<u8>)>> =
            vec![Vec::new(); self.reduce_partitions as usize];
        let mut input_records = 0;
        let mut malformed_records = 0;
        for output in map_outcome.results {
            let output = output?;
            input_records += output.records;
            malformed_records += output.malformed;
            for (bucket, pairs) in buckets.iter_mut().zip(output.partitions) {
                bucket.extend(pairs);
            }
        }

        tracing::info!(
            "Job {}: map stage done, records={}, malformed={}",
            job_id,
            input_records,
            malformed_records
        );

        // Reduce
        let reduce_tasks: Vec<_> = buckets
            .into_iter()
            .enumerate()
            .map(|(partition, pairs)| {
                let path = self.output_dir.join(part_file_name(partition as u32));
                move || run_reduce_task(pairs, &path).map(|groups| (path, groups))
            })
            .collect();

        let reduce_pool =
            WorkerPool::new(self.reduce_partitions as usize)?.with_timeout(self.timeout);
        let reduce_outcome = reduce_pool.execute(reduce_tasks).await?;
        if reduce_outcome.timed_out || reduce_outcome.panicked > 0 {
            bail!(
                "Job {} failed: {} reduce tasks did not complete",
                job_id,
                reduce_outcome.panicked + reduce_outcome.abandoned
            );
        }

        let mut output_files = Vec::with_capacity(reduce_outcome.results.len());
        let mut output_groups = 0;
        for result in reduce_outcome.results {
            let (path, groups) = result?;
            output_files.push(path);
            output_groups += groups;
        }

        let marker = self.output_dir.join(SUCCESS_MARKER);
        File::create(&marker)
            .with_context(|| format!("Failed to write {}", marker.display()))?;

        tracing::info!(
            "Job {} completed successfully, groups={}",
            job_id,
            output_groups
        );

        Ok(JobReport {
            job_id,
            map_tasks: inputs.len(),
            input_records,
            malformed_records,
            output_groups,
            output_files,
        })
    }

    fn prepare_output_dir(&self) -> Result<()> {
        if self.output_dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&self.output_dir) {
                tracing::warn!("Failed to delete {}: {}", self.output_dir.display(), e);
            }
        }
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!(
                "Failed to create output directory {}",
                self.output_dir.display()
            )
        })
    }

    /// Visible regular files of the input directory, in name order.
    fn input_files(&self) -> Result<Vec<PathBuf>> {
        let mut files = Vec::new();
        let entries = std::fs::read_dir(&self.input_dir)
            .with_context(|| format!("Failed to list {}", self.input_dir.display()))?;

        for entry in entries {
            let path = entry?.path();
            let hidden = path
                .file_name()
                .and_then(|name| name.to_str())
                .map(|name| name.starts_with('_') || name.starts_with('.'))
                .unwrap_or(true);
            if path.is_file() && !hidden {
                files.push(path);
            }
        }

        files.sort();
        Ok(files)
    }
}

fn run_map_task(path: &Path, partitioner: HashPartitioner) -> Result<MapTaskOutput> {
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut output = MapTaskOutput {
        partitions: vec![Vec::new(); partitioner.num_partitions() as usize],
        ..MapTaskOutput::default()
    };

    for line in BufReader::new(file).lines() {
        let line = line.with_context(|| format!("Failed to read {}", path.display()))?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let record = match SalesRecord::from_csv_line(trimmed) {
            Ok(Some(record)) => record,
            Ok(None) => continue,
            Err(e) => {
                tracing::warn!("Failed to parse CSV line '{}': {}", trimmed, e);
                output.malformed += 1;
                continue;
            }
        };

        let revenue = record
            .revenue()
            .to_f64()
            .with_context(|| format!("Revenue out of range for line '{}'", trimmed))?;
        let value = SalesWritable::new(revenue, i64::from(record.quantity));
        let partition = partitioner.get_partition(&record.category) as usize;
        output.partitions[partition].push((record.category, value.encode()?));
        output.records += 1;
    }

    tracing::debug!(
        "Map task for {} emitted {} records",
        path.display(),
        output.records
    );
    Ok(output)
}

/// Reduces one partition into its part file; returns the number of groups written.
fn run_reduce_task(pairs: Vec<(String, Vec<u8>)>, path: &Path) -> Result<usize> {
    let mut groups: BTreeMap<String, SalesWritable> = BTreeMap::new();
    for (key, bytes) in pairs {
        let value = SalesWritable::decode(&bytes)?;
        groups.entry(key).or_default().add_in_place(&value);
    }

    let file = File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    for (key, total) in &groups {
        writeln!(
            writer,
            "{}\t{}\t{}",
            key,
            round_revenue(total.total_revenue)?,
            total.total_quantity
        )?;
    }
    writer.flush()?;

    Ok(groups.len())
}

/// Rounds a floating-point revenue half-up to cents, starting from its shortest decimal form.
pub fn round_revenue(revenue: f64) -> Result<String> {
    if !revenue.is_finite() {
        bail!("revenue is not a finite number: {}", revenue);
    }
    let exact = BigDecimal::from_str(&revenue.to_string())?;
    Ok(format_money(&exact))
}
