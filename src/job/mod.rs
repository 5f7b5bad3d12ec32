//! Local MapReduce Job
//!
//! A single-node, file-to-file variant of the sales aggregation that mimics a Hadoop job in
//! local mode: raw text lines are parsed inside the map tasks, intermediate values cross a
//! hash-partitioned shuffle in binary form, and each reduce partition commits its own output file.
//!
//! ## Submodules
//! - **`local`**: job setup, map/shuffle/reduce stages and output commit.
//! - **`partitioner`**: key to reduce-partition routing.
//! - **`types`**: the intermediate `SalesWritable` value and the `JobReport`.

pub mod local;
pub mod partitioner;
pub mod types;
