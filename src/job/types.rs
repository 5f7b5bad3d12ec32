use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Intermediate value of the local job: floating-point revenue plus quantity.
///
/// Crosses the shuffle in its binary form (`encode`/`decode`).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct SalesWritable {
    pub total_revenue: f64,
    pub total_quantity: i64,
}

impl SalesWritable {
    pub fn new(total_revenue: f64, total_quantity: i64) -> Self {
        Self {
            total_revenue,
            total_quantity,
        }
    }

    pub fn add_in_place(&mut self, other: &SalesWritable) {
        self.total_revenue += other.total_revenue;
        self.total_quantity += other.total_quantity;
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serialize(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        Ok(bincode::deserialize(bytes)?)
    }
}

impl fmt::Display for SalesWritable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\t{}", self.total_revenue, self.total_quantity)
    }
}

/// Summary of a finished local job, printed as JSON by the binary.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job_id: String,
    pub map_tasks: usize,
    pub input_records: usize,
    pub malformed_records: usize,
    pub output_groups: usize,
    pub output_files: Vec<PathBuf>,
}

/// What a single map task hands to the shuffle.
#[derive(Debug, Default)]
pub(crate) struct MapTaskOutput {
    /// `(key, encoded SalesWritable)` pairs, one bucket per reduce partition.
    pub partitions: Vec<Vec<(String, Vec<u8>)>>,
    pub records: usize,
    pub malformed: usize,
}
