//! Sales Data Model
//!
//! Domain types shared by every pipeline in the crate.
//!
//! - **`SalesRecord`**: one parsed CSV line item (`transaction_id,product_id,category,price,quantity`).
//! - **`CategoryStats`**: running revenue/quantity totals for a category. Revenue is kept as an
//!   exact decimal so aggregation order never changes the result.

pub mod types;

pub use types::{format_money, CategoryStats, SalesRecord};

#[cfg(test)]
mod tests;
