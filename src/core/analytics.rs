//! Spending analytics
//!
//! Totals expense amounts per category for a set of ledger records. Payments
//! move money between members without being spending, so they are left out.

use crate::types::{EntryKind, LedgerRecord, SettleError};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Total spending and its breakdown by category
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpendingSummary {
    pub total: Decimal,

    /// Category → total, sorted by category name
    pub by_category: BTreeMap<String, Decimal>,
}

impl SpendingSummary {
    /// Summarize the expenses among `records`
    ///
    /// # Errors
    ///
    /// Returns `ArithmeticOverflow` if a total does not fit in a `Decimal`.
    pub fn from_records<'a, I>(records: I) -> Result<Self, SettleError>
    where
        I: IntoIterator<Item = &'a LedgerRecord>,
    {
        let mut summary = SpendingSummary::default();

        for record in records {
            if record.entry.kind() != EntryKind::Expense {
                continue;
            }
            let amount = record.entry.amount();
            summary.total = summary
                .total
                .checked_add(amount)
                .ok_or_else(|| SettleError::arithmetic_overflow("spending total"))?;
            let category = summary
                .by_category
                .entry(record.category_or_default().to_string())
                .or_default();
            *category = category
                .checked_add(amount)
                .ok_or_else(|| SettleError::arithmetic_overflow("category total"))?;
        }

        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::LedgerEntry;

    fn expense(amount: i64, category: Option<&str>) -> LedgerRecord {
        let mut record = LedgerRecord::new(
            "g",
            LedgerEntry::expense(Decimal::new(amount, 0), "A", ["A", "B"]),
        );
        record.category = category.map(str::to_string);
        record
    }

    #[test]
    fn test_totals_by_category() {
        let records = vec![
            expense(30, Some("Food")),
            expense(20, Some("Travel")),
            expense(12, Some("Food")),
            expense(5, None),
            LedgerRecord::new("g", LedgerEntry::payment(Decimal::new(100, 0), "B", "A")),
        ];

        let summary = SpendingSummary::from_records(&records).unwrap();

        assert_eq!(summary.total, Decimal::new(67, 0));
        assert_eq!(summary.by_category.get("Food"), Some(&Decimal::new(42, 0)));
        assert_eq!(summary.by_category.get("Travel"), Some(&Decimal::new(20, 0)));
        assert_eq!(summary.by_category.get("Default"), Some(&Decimal::new(5, 0)));
        assert_eq!(summary.by_category.len(), 3);
    }

    #[test]
    fn test_empty_records() {
        let records: Vec<LedgerRecord> = Vec::new();
        assert_eq!(
            SpendingSummary::from_records(&records).unwrap(),
            SpendingSummary::default()
        );
    }

    #[test]
    fn test_overflowing_total_is_reported() {
        let huge = Decimal::from_str_exact("50000000000000000000000000000").unwrap();
        let mut food = LedgerRecord::new("g", LedgerEntry::expense(huge, "A", ["A"]));
        food.category = Some("Food".to_string());
        let mut rent = LedgerRecord::new("g", LedgerEntry::expense(huge, "B", ["B"]));
        rent.category = Some("Rent".to_string());

        let err = SpendingSummary::from_records(&[food, rent]).unwrap_err();

        assert_eq!(err, SettleError::arithmetic_overflow("spending total"));
    }
}
