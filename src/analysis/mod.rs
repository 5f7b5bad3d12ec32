//! Analysis Driver
//!
//! Top-level use cases of the in-memory pipeline: a single aggregation run and the
//! thread-profile performance experiment.

pub mod app;
pub mod types;
