//! Input/Output
//!
//! File boundaries of the analysis pipeline.
//!
//! - **`reader`**: loads sales records from a directory of CSV files, skipping the header and
//!   logging malformed lines instead of failing.
//! - **`writer`**: renders the per-category result table and streams the performance CSV.

pub mod reader;
pub mod types;
pub mod writer;
