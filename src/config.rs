//! Runtime Configuration
//!
//! Every setting has a default, so a config file is optional. When given, the TOML file may
//! override any subset of fields; command-line flags are applied on top by the binary.
//!
//! ```toml
//! input_dir = "data"
//! map_threads = 8
//! map_thread_profiles = [1, 2, 4, 8, 16]
//!
//! [job]
//! output_dir = "output/hadoop-result"
//! reduce_partitions = 2
//! ```

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Directory scanned for `*.csv` input files.
    pub input_dir: PathBuf,
    /// Per-category result table.
    pub result_file: PathBuf,
    /// Thread-profile timings.
    pub performance_file: PathBuf,
    pub map_threads: usize,
    pub reduce_threads: usize,
    pub map_thread_profiles: Vec<usize>,
    pub reduce_thread_profiles: Vec<usize>,
    /// Upper bound for a single Map or Reduce phase.
    pub phase_timeout_secs: u64,
    pub job: JobConfig,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("data"),
            result_file: PathBuf::from("output/result.txt"),
            performance_file: PathBuf::from("output/performance.csv"),
            map_threads: 4,
            reduce_threads: 4,
            map_thread_profiles: vec![1, 2, 4, 8],
            reduce_thread_profiles: vec![1, 2, 4, 8],
            phase_timeout_secs: 300,
            job: JobConfig::default(),
        }
    }
}

/// Settings of the local file-to-file job.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JobConfig {
    /// Defaults to the analysis `input_dir` when absent.
    pub input_dir: Option<PathBuf>,
    /// Recreated on every run.
    pub output_dir: PathBuf,
    /// Number of reduce partitions, one `part-r-NNNNN` file each.
    pub reduce_partitions: usize,
    /// Map tasks allowed to run at once.
    pub map_slots: usize,
}

impl Default for JobConfig {
    fn default() -> Self {
        Self {
            input_dir: None,
            output_dir: PathBuf::from("output/hadoop-result"),
            reduce_partitions: 1,
            map_slots: 4,
        }
    }
}

impl AnalysisConfig {
    /// Reads a TOML config file; missing fields keep their defaults.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        Self::from_toml(&content).with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: AnalysisConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.map_threads == 0 || self.reduce_threads == 0 {
            bail!("map_threads and reduce_threads must be > 0");
        }
        if self.map_thread_profiles.is_empty() || self.reduce_thread_profiles.is_empty() {
            bail!("thread profiles must not be empty");
        }
        if self
            .map_thread_profiles
            .iter()
            .chain(&self.reduce_thread_profiles)
            .any(|&threads| threads == 0)
        {
            bail!("thread profiles must only contain values > 0");
        }
        if self.phase_timeout_secs == 0 {
            bail!("phase_timeout_secs must be > 0");
        }
        if self.job.reduce_partitions == 0 || self.job.map_slots == 0 {
            bail!("job.reduce_partitions and job.map_slots must be > 0");
        }
        Ok(())
    }

    pub fn phase_timeout(&self) -> Duration {
        Duration::from_secs(self.phase_timeout_secs)
    }

    /// Input directory of the local job.
    pub fn job_input_dir(&self) -> &Path {
        self.job.input_dir.as_deref().unwrap_or(&self.input_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = AnalysisConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.map_thread_profiles, vec![1, 2, 4, 8]);
        assert_eq!(config.phase_timeout(), Duration::from_secs(300));
        assert_eq!(config.job_input_dir(), Path::new("data"));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = AnalysisConfig::from_toml(
            r#"
            map_threads = 8
            reduce_thread_profiles = [2, 3]

            [job]
            input_dir = "raw"
            reduce_partitions = 3
            "#,
        )
        .unwrap();

        assert_eq!(config.map_threads, 8);
        assert_eq!(config.reduce_threads, 4);
        assert_eq!(config.reduce_thread_profiles, vec![2, 3]);
        assert_eq!(config.job.reduce_partitions, 3);
        assert_eq!(config.job.output_dir, PathBuf::from("output/hadoop-result"));
        assert_eq!(config.job_input_dir(), Path::new("raw"));
    }

    #[test]
    fn test_rejects_zero_threads() {
        assert!(AnalysisConfig::from_toml("map_threads = 0").is_err());
        assert!(AnalysisConfig::from_toml("map_thread_profiles = [1, 0]").is_err());
        assert!(AnalysisConfig::from_toml("reduce_thread_profiles = []").is_err());
    }

    #[test]
    fn test_rejects_unknown_fields() {
        assert!(AnalysisConfig::from_toml("mapThreads = 2").is_err());
    }
}
