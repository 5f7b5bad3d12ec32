//! Parallel Sales Analysis Library
//!
//! Aggregates revenue and quantity per product category from CSV sales exports using a
//! MapReduce pipeline whose phases run on bounded worker pools. The binary (`main.rs`)
//! exposes two entry points built from these modules.
//!
//! ## Architecture Modules
//! - **`model`**: `SalesRecord` parsing/validation and `CategoryStats` arithmetic.
//! - **`mapreduce`**: the in-process engine: `Mapper`/`Reducer` contracts, the concurrent
//!   grouping context, the worker pool and the Map/Reduce phase runners.
//! - **`io`**: CSV directory reader, result table and performance CSV writers.
//! - **`analysis`**: single-run analysis and the thread-profile performance experiment.
//! - **`job`**: a local, Hadoop-style file-to-file job with a hash-partitioned binary shuffle.
//! - **`config`**: TOML-backed settings with defaults for every field.
//! - **`error`**: typed errors of the library layers.

pub mod analysis;
pub mod config;
pub mod error;
pub mod io;
pub mod job;
pub mod mapreduce;
pub mod model;
