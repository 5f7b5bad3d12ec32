//! Report writers: the per-category result table and the performance CSV.

use super::types::PerformanceSample;
use crate::model::CategoryStats;

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Header row of the performance CSV.
pub const PERFORMANCE_HEADER: &str = "mapThreads,reduceThreads,durationMillis";

/// Writes the result table, one row per category in the given order.
pub fn write_results(rows: &[(String, CategoryStats)], path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let mut writer = create_with_parents(path)?;

    writeln!(writer, "{:<15} {:<12} {:<10}", "Category", "Revenue", "Quantity")?;
    for (category, stats) in rows {
        writeln!(
            writer,
            "{:<15} {:<12} {:<10}",
            category,
            stats.revenue_display(),
            stats.total_quantity
        )?;
    }

    writer
        .flush()
        .with_context(|| format!("Failed to flush {}", path.display()))?;

    tracing::info!("Results written to '{}'", path.display());
    Ok(())
}

/// Streams performance samples to a CSV file as they are measured.
pub struct PerformanceLog {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl PerformanceLog {
    /// Creates (or truncates) the file and writes the header row.
    pub fn create(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let mut writer = create_with_parents(&path)?;
        writeln!(writer, "{}", PERFORMANCE_HEADER)?;
        writer.flush()?;

        Ok(Self { path, writer })
    }

    pub fn record(&mut self, sample: &PerformanceSample) -> Result<()> {
        writeln!(
            self.writer,
            "{},{},{}",
            sample.map_threads, sample.reduce_threads, sample.duration_millis
        )?;
        self.writer
            .flush()
            .with_context(|| format!("Failed to flush {}", self.path.display()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn create_with_parents(path: &Path) -> Result<BufWriter<File>> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory {}", parent.display()))?;
    }

    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    Ok(BufWriter::new(file))
}
