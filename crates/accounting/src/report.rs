//! Working-figure reports (trend analysis).
//!
//! Closing entries never take part here.

use std::collections::BTreeMap;

use chrono::Datelike;
use serde::Serialize;

use shopledger_core::{LedgerResult, Money};

use crate::closing::exclude_closing;
use crate::journal::Direction;
use crate::movement::LedgerMovement;

/// Debit/credit totals for one calendar month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    pub debits: Money,
    pub credits: Money,
    /// debits - credits
    pub net_change: Money,
    pub movement_count: usize,
}

/// Group non-closing movements by calendar month, oldest first.
pub fn monthly_summary<I>(movements: I) -> LedgerResult<Vec<MonthlySummary>>
where
    I: IntoIterator<Item = LedgerMovement>,
{
    let mut months: BTreeMap<(i32, u32), MonthlySummary> = BTreeMap::new();

    for m in exclude_closing(movements) {
        let key = (m.operation_date.year(), m.operation_date.month());
        let row = months.entry(key).or_insert_with(|| MonthlySummary {
            year: key.0,
            month: key.1,
            debits: Money::ZERO,
            credits: Money::ZERO,
            net_change: Money::ZERO,
            movement_count: 0,
        });

        match m.direction {
            Direction::Debit => row.debits = row.debits.checked_add(m.amount)?,
            Direction::Credit => row.credits = row.credits.checked_add(m.amount)?,
        }
        row.net_change = row.net_change.checked_add(m.signed_amount()?)?;
        row.movement_count += 1;
    }

    Ok(months.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::EntryType;
    use crate::testing::movement;
    use chrono::NaiveDate;

    #[test]
    fn groups_by_month_and_skips_closing() {
        let mut feb = movement(1, 3, EntryType::Normal, false, 200);
        feb.operation_date = NaiveDate::from_ymd_opt(2024, 2, 14).unwrap();

        let rows = monthly_summary(vec![
            feb,
            movement(3, 1, EntryType::Normal, true, 1_000),
            movement(9, 2, EntryType::Normal, false, 300),
            movement(31, 4, EntryType::Closing, false, 700),
        ])
        .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].year, rows[0].month), (2024, 1));
        assert_eq!(rows[0].debits, Money::from_minor(1_000));
        assert_eq!(rows[0].credits, Money::from_minor(300));
        assert_eq!(rows[0].net_change, Money::from_minor(700));
        assert_eq!(rows[0].movement_count, 2);
        assert_eq!(rows[1].net_change, Money::from_minor(-200));
    }
}
