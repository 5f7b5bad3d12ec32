use crate::model::CategoryStats;

use std::time::Duration;

/// Output of a single MapReduce run.
#[derive(Debug, Clone)]
pub struct AnalysisOutcome {
    /// `(category, totals)` sorted by revenue, highest first.
    pub rows: Vec<(String, CategoryStats)>,
    pub duration: Duration,
}
