//! Sales aggregation job: revenue and quantity per category.

use super::types::{MapContext, Mapper, Reducer};
use crate::model::{CategoryStats, SalesRecord};

/// Emits `(category, CategoryStats { price * quantity, quantity })` for every record.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesMapper;

impl Mapper<SalesRecord, String, CategoryStats> for SalesMapper {
    fn map(
        &self,
        input: &SalesRecord,
        context: &dyn MapContext<String, CategoryStats>,
    ) -> anyhow::Result<()> {
        let stats = CategoryStats::new(input.revenue(), i64::from(input.quantity));
        context.write(input.category.clone(), stats);
        Ok(())
    }
}

/// Sums every partial `CategoryStats` of a category.
#[derive(Debug, Clone, Copy, Default)]
pub struct SalesReducer;

impl Reducer<String, CategoryStats, CategoryStats> for SalesReducer {
    fn reduce(
        &self,
        _key: &String,
        values: &[CategoryStats],
    ) -> anyhow::Result<Option<CategoryStats>> {
        let total = values
            .iter()
            .fold(CategoryStats::empty(), |acc, stats| acc.add(stats));
        Ok(Some(total))
    }
}
