use crate::error::RecordError;

use bigdecimal::num_bigint::Sign;
use bigdecimal::{BigDecimal, RoundingMode};
use std::str::FromStr;

/// Column header prefix of the sales CSV files.
const HEADER_PREFIX: &str = "transaction_id";

/// Number of mandatory columns: `transaction_id,product_id,category,price,quantity`.
const COLUMN_COUNT: usize = 5;

/// One line item of a sales CSV file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SalesRecord {
    pub transaction_id: i64,
    pub product_id: i64,
    pub category: String,
    pub price: BigDecimal,
    pub quantity: i32,
}

impl SalesRecord {
    /// Builds a record, rejecting blank categories and negative quantities.
    pub fn new(
        transaction_id: i64,
        product_id: i64,
        category: impl Into<String>,
        price: BigDecimal,
        quantity: i32,
    ) -> Result<Self, RecordError> {
        let category = category.into();
        if category.trim().is_empty() {
            return Err(RecordError::BlankCategory);
        }
        if quantity < 0 {
            return Err(RecordError::NegativeQuantity { quantity });
        }

        Ok(Self {
            transaction_id,
            product_id,
            category,
            price,
            quantity,
        })
    }

    /// Parses a single CSV line.
    ///
    /// # Returns
    /// * `Ok(Some(record))` for a data line.
    /// * `Ok(None)` for the header line.
    /// * `Err` for empty or malformed lines.
    pub fn from_csv_line(line: &str) -> Result<Option<Self>, RecordError> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            return Err(RecordError::EmptyLine);
        }

        if trimmed.to_lowercase().starts_with(HEADER_PREFIX) {
            return Ok(None);
        }

        let parts: Vec<&str> = trimmed.split(',').map(str::trim).collect();
        if parts.len() < COLUMN_COUNT {
            return Err(RecordError::ColumnCount {
                found: parts.len(),
                line: line.to_string(),
            });
        }

        let number_error = |field: &'static str| RecordError::InvalidNumber {
            field,
            line: line.to_string(),
        };

        let transaction_id: i64 = parts[0]
            .parse()
            .map_err(|_| number_error("transaction_id"))?;
        let product_id: i64 = parts[1].parse().map_err(|_| number_error("product_id"))?;

        let category = parts[2];
        if category.is_empty() {
            return Err(RecordError::EmptyCategory {
                line: line.to_string(),
            });
        }

        let price = BigDecimal::from_str(parts[3]).map_err(|_| number_error("price"))?;
        let quantity: i32 = parts[4].parse().map_err(|_| number_error("quantity"))?;

        Self::new(transaction_id, product_id, category, price, quantity).map(Some)
    }

    /// Exact revenue of this line item (`price * quantity`).
    pub fn revenue(&self) -> BigDecimal {
        &self.price * BigDecimal::from(self.quantity)
    }
}

/// Aggregated totals for one category.
///
/// Equality is numeric on the revenue, so `1.0` and `1.00` compare equal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryStats {
    pub total_revenue: BigDecimal,
    pub total_quantity: i64,
}

impl CategoryStats {
    pub fn new(total_revenue: BigDecimal, total_quantity: i64) -> Self {
        Self {
            total_revenue,
            total_quantity,
        }
    }

    pub fn empty() -> Self {
        Self::new(BigDecimal::from(0), 0)
    }

    /// Returns the field-wise sum of `self` and `other`.
    pub fn add(&self, other: &CategoryStats) -> CategoryStats {
        CategoryStats {
            total_revenue: &self.total_revenue + &other.total_revenue,
            total_quantity: self.total_quantity + other.total_quantity,
        }
    }

    /// Revenue rounded half-up to cents, as printed in reports.
    pub fn revenue_display(&self) -> String {
        format_money(&self.total_revenue)
    }
}

impl Default for CategoryStats {
    fn default() -> Self {
        Self::empty()
    }
}

/// Formats a decimal amount with exactly two fraction digits, rounding half-up.
pub fn format_money(amount: &BigDecimal) -> String {
    // Display drops the scale of zero ("0"), so the digits are laid out by hand.
    let (digits, scale) = amount
        .with_scale_round(2, RoundingMode::HalfUp)
        .into_bigint_and_exponent();
    let scale = usize::try_from(scale).unwrap_or(0);

    let mut text = digits.magnitude().to_string();
    if text.len() <= scale {
        text.insert_str(0, &"0".repeat(scale + 1 - text.len()));
    }
    if scale > 0 {
        text.insert(text.len() - scale, '.');
    }
    if digits.sign() == Sign::Minus {
        text.insert(0, '-');
    }
    text
}
