//! Model Tests
//!
//! ## Test Scopes
//! - **CSV parsing**: header detection, column validation, numeric parsing.
//! - **Aggregation**: `CategoryStats` arithmetic and numeric equality.

#[cfg(test)]
mod tests {
    use crate::error::RecordError;
    use crate::model::{format_money, CategoryStats, SalesRecord};
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    fn dec(value: &str) -> BigDecimal {
        BigDecimal::from_str(value).unwrap()
    }

    // ============================================================
    // CSV PARSING
    // ============================================================

    #[test]
    fn test_parse_valid_line() {
        let record = SalesRecord::from_csv_line("1,100,Electronics,199.99,2")
            .unwrap()
            .unwrap();

        assert_eq!(record.transaction_id, 1);
        assert_eq!(record.product_id, 100);
        assert_eq!(record.category, "Electronics");
        assert_eq!(record.price, dec("199.99"));
        assert_eq!(record.quantity, 2);
    }

    #[test]
    fn test_parse_trims_fields_and_line() {
        let record = SalesRecord::from_csv_line("  7 , 8 ,  Books , 12.50 , 3  ")
            .unwrap()
            .unwrap();

        assert_eq!(record.category, "Books");
        assert_eq!(record.price, dec("12.5"));
        assert_eq!(record.quantity, 3);
    }

    #[test]
    fn test_header_line_is_skipped() {
        assert_eq!(
            SalesRecord::from_csv_line("transaction_id,product_id,category,price,quantity"),
            Ok(None)
        );
        // Case-insensitive
        assert_eq!(
            SalesRecord::from_csv_line("Transaction_ID,Product_ID,Category,Price,Quantity"),
            Ok(None)
        );
    }

    #[test]
    fn test_empty_line_is_error() {
        assert_eq!(SalesRecord::from_csv_line("   "), Err(RecordError::EmptyLine));
    }

    #[test]
    fn test_too_few_columns() {
        let err = SalesRecord::from_csv_line("1,2,Books,10.0").unwrap_err();
        assert!(matches!(err, RecordError::ColumnCount { found: 4, .. }));
        assert!(err.to_string().contains("expected 5 columns"));
    }

    #[test]
    fn test_extra_columns_are_ignored() {
        let record = SalesRecord::from_csv_line("1,2,Toys,5.00,1,extra,columns")
            .unwrap()
            .unwrap();
        assert_eq!(record.category, "Toys");
    }

    #[test]
    fn test_empty_category_is_error() {
        let err = SalesRecord::from_csv_line("1,2, ,5.00,1").unwrap_err();
        assert!(matches!(err, RecordError::EmptyCategory { .. }));
    }

    #[test]
    fn test_invalid_numbers_name_the_field() {
        let cases = [
            ("x,2,Toys,5.00,1", "transaction_id"),
            ("1,y,Toys,5.00,1", "product_id"),
            ("1,2,Toys,abc,1", "price"),
            ("1,2,Toys,5.00,1.5", "quantity"),
        ];

        for (line, expected_field) in cases {
            match SalesRecord::from_csv_line(line) {
                Err(RecordError::InvalidNumber { field, .. }) => assert_eq!(field, expected_field),
                other => panic!("unexpected result for '{}': {:?}", line, other),
            }
        }
    }

    #[test]
    fn test_negative_quantity_is_error() {
        assert_eq!(
            SalesRecord::from_csv_line("1,2,Toys,5.00,-3"),
            Err(RecordError::NegativeQuantity { quantity: -3 })
        );
    }

    #[test]
    fn test_zero_quantity_is_allowed() {
        let record = SalesRecord::from_csv_line("1,2,Toys,5.00,0").unwrap().unwrap();
        assert_eq!(record.revenue(), dec("0"));
    }

    #[test]
    fn test_new_rejects_blank_category() {
        let err = SalesRecord::new(1, 1, "  ", dec("1.00"), 1).unwrap_err();
        assert_eq!(err, RecordError::BlankCategory);
        assert_eq!(err.to_string(), "category must not be blank");
    }

    #[test]
    fn test_revenue_is_exact() {
        let record = SalesRecord::new(1, 1, "Food", dec("0.10"), 3).unwrap();
        assert_eq!(record.revenue(), dec("0.30"));
    }

    // ============================================================
    // CATEGORY STATS
    // ============================================================

    #[test]
    fn test_stats_add() {
        let a = CategoryStats::new(dec("10.50"), 2);
        let b = CategoryStats::new(dec("4.25"), 5);

        let sum = a.add(&b);

        assert_eq!(sum.total_revenue, dec("14.75"));
        assert_eq!(sum.total_quantity, 7);
    }

    #[test]
    fn test_stats_empty_is_identity() {
        let a = CategoryStats::new(dec("3.3"), 1);
        assert_eq!(CategoryStats::empty().add(&a), a);
    }

    #[test]
    fn test_stats_equality_ignores_scale() {
        assert_eq!(
            CategoryStats::new(dec("1.0"), 1),
            CategoryStats::new(dec("1.00"), 1)
        );
        assert_ne!(
            CategoryStats::new(dec("1.0"), 1),
            CategoryStats::new(dec("1.0"), 2)
        );
    }

    #[test]
    fn test_format_money_rounds_half_up() {
        assert_eq!(format_money(&dec("10.005")), "10.01");
        assert_eq!(format_money(&dec("10.004")), "10.00");
        assert_eq!(format_money(&dec("5")), "5.00");
        assert_eq!(CategoryStats::new(dec("2.5"), 1).revenue_display(), "2.50");
    }

    #[test]
    fn test_format_money_keeps_cents_for_small_amounts() {
        assert_eq!(format_money(&dec("0")), "0.00");
        assert_eq!(format_money(&dec("0.004")), "0.00");
        assert_eq!(format_money(&dec("0.000000001")), "0.00");
        assert_eq!(format_money(&dec("0.005")), "0.01");
        assert_eq!(format_money(&dec("0.07")), "0.07");
        assert_eq!(format_money(&dec("-1.005")), "-1.01");
        assert_eq!(CategoryStats::empty().revenue_display(), "0.00");
    }
}
