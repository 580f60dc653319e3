//! Client-scoped movements projected from journal entries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopledger_core::{ClientId, EntryId, LedgerResult, Money};

use crate::journal::{Direction, EntryType, RecordedEntry};

/// The effect of one client line of a journal entry.
///
/// `sequence` and `line_no` locate the movement in insertion order; together
/// with `operation_date` they form the canonical ordering key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerMovement {
    pub entry_ref: EntryId,
    pub sequence: u64,
    pub line_no: u32,
    pub entry_type: EntryType,
    pub client_ref: ClientId,
    pub operation_date: NaiveDate,
    pub concept: String,
    pub direction: Direction,
    /// Always a magnitude.
    pub amount: Money,
}

impl LedgerMovement {
    /// Canonical ordering key: date, then insertion sequence, then line.
    pub fn canonical_key(&self) -> (NaiveDate, u64, u32) {
        (self.operation_date, self.sequence, self.line_no)
    }

    /// Signed effect on the client balance (debit increases what the client owes).
    pub fn signed_amount(&self) -> LedgerResult<Money> {
        match self.direction {
            Direction::Debit => Ok(self.amount),
            Direction::Credit => self.amount.checked_neg(),
        }
    }
}

/// A movement annotated with the client balance right after it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalancedMovement {
    #[serde(flatten)]
    pub movement: LedgerMovement,
    pub cumulative_balance: Money,
}

/// Expand a recorded entry into one movement per client line.
///
/// Nominal lines (sales, cash, ...) carry no client and produce no movement.
/// Zero-amount lines still produce a movement.
pub fn project(recorded: &RecordedEntry) -> Vec<LedgerMovement> {
    let entry = recorded.entry();
    let operation_date = entry.timestamp().date_naive();

    entry
        .lines()
        .iter()
        .enumerate()
        .filter_map(|(idx, line)| {
            let client_ref = line.account.client_id()?;
            Some(LedgerMovement {
                entry_ref: entry.id(),
                sequence: recorded.sequence(),
                line_no: idx as u32,
                entry_type: entry.entry_type(),
                client_ref,
                operation_date,
                concept: line
                    .concept
                    .clone()
                    .unwrap_or_else(|| entry.description().to_string()),
                direction: line.direction,
                amount: line.amount,
            })
        })
        .collect()
}

/// Movements of `client_id` across a set of recorded entries, in input order.
pub fn project_for_client<'a>(
    entries: impl IntoIterator<Item = &'a RecordedEntry>,
    client_id: &ClientId,
) -> Vec<LedgerMovement> {
    entries
        .into_iter()
        .flat_map(project)
        .filter(|m| &m.client_ref == client_id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::journal::{EntryLine, JournalEntry, LineAccount};
    use chrono::{TimeZone, Utc};

    fn recorded(seq: u64, lines: Vec<EntryLine>) -> RecordedEntry {
        let entry = JournalEntry::new(
            EntryId::new(),
            Utc.with_ymd_and_hms(2024, 6, 3, 18, 30, 0).unwrap(),
            EntryType::Normal,
            "Venta de repuestos",
            lines,
        )
        .unwrap();
        RecordedEntry::new(seq, entry).unwrap()
    }

    #[test]
    fn projects_one_movement_per_client_line() {
        let client = ClientId::new();
        let rec = recorded(
            7,
            vec![
                EntryLine::debit(LineAccount::client(client), Money::from_minor(10_000)),
                EntryLine::credit(LineAccount::nominal("sales"), Money::from_minor(10_000)),
            ],
        );

        let movements = project(&rec);
        assert_eq!(movements.len(), 1);
        let m = &movements[0];
        assert_eq!(m.client_ref, client);
        assert_eq!(m.direction, Direction::Debit);
        assert_eq!(m.amount, Money::from_minor(10_000));
        assert_eq!(m.sequence, 7);
        assert_eq!(m.line_no, 0);
        assert_eq!(m.operation_date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert_eq!(m.concept, "Venta de repuestos");
    }

    #[test]
    fn line_concept_overrides_entry_description() {
        let a = ClientId::new();
        let b = ClientId::new();
        let rec = recorded(
            1,
            vec![
                EntryLine::debit(LineAccount::client(a), Money::from_minor(300)),
                EntryLine::credit(LineAccount::client(b), Money::from_minor(300))
                    .with_concept("Transferencia de saldo"),
            ],
        );

        let movements = project(&rec);
        assert_eq!(movements.len(), 2);
        assert_eq!(movements[0].concept, "Venta de repuestos");
        assert_eq!(movements[1].concept, "Transferencia de saldo");
        assert_eq!(movements[1].direction, Direction::Credit);
        assert_eq!(movements[1].line_no, 1);

        assert_eq!(project_for_client([&rec], &b).len(), 1);
    }

    #[test]
    fn zero_amount_lines_still_produce_movements() {
        let client = ClientId::new();
        let rec = recorded(
            2,
            vec![
                EntryLine::debit(LineAccount::client(client), Money::ZERO),
                EntryLine::credit(LineAccount::nominal("sales"), Money::ZERO),
            ],
        );
        let movements = project(&rec);
        assert_eq!(movements.len(), 1);
        assert!(movements[0].amount.is_zero());
    }

    #[test]
    fn signed_amount_negates_credits_without_overflow() {
        let client = ClientId::new();
        let rec = recorded(
            4,
            vec![
                EntryLine::debit(LineAccount::nominal("cash"), Money::from_minor(250)),
                EntryLine::credit(LineAccount::client(client), Money::from_minor(250)),
            ],
        );
        let mut credit = project(&rec).remove(0);
        assert_eq!(credit.signed_amount().unwrap(), Money::from_minor(-250));

        credit.amount = Money::from_minor(i64::MIN);
        assert!(matches!(credit.signed_amount(), Err(shopledger_core::LedgerError::Precision(_))));
    }

    #[test]
    fn balanced_movement_serializes_flat() {
        let client = ClientId::new();
        let rec = recorded(
            3,
            vec![
                EntryLine::debit(LineAccount::client(client), Money::from_minor(5)),
                EntryLine::credit(LineAccount::nominal("sales"), Money::from_minor(5)),
            ],
        );
        let balanced = BalancedMovement {
            movement: project(&rec).remove(0),
            cumulative_balance: Money::from_minor(5),
        };
        let json = serde_json::to_value(&balanced).unwrap();
        assert_eq!(json["cumulativeBalance"], 5);
        assert_eq!(json["direction"], "debit");
        assert_eq!(json["clientRef"], client.to_string());
    }
}
