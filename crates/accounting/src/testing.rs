//! Deterministic fixtures shared by the unit tests of this crate.

use chrono::NaiveDate;

use shopledger_core::{ClientId, EntryId, Money};

use crate::journal::{Direction, EntryType};
use crate::movement::LedgerMovement;

pub fn client() -> ClientId {
    "00000000-0000-7000-8000-000000000001".parse().unwrap()
}

/// Entry id derived from the sequence number, so equal sequences mean equal entries.
pub fn entry_for(sequence: u64) -> EntryId {
    format!("00000000-0000-7000-9000-{sequence:012x}").parse().unwrap()
}

pub fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

pub fn movement(d: u32, sequence: u64, entry_type: EntryType, debit: bool, amount: i64) -> LedgerMovement {
    LedgerMovement {
        entry_ref: entry_for(sequence),
        sequence,
        line_no: 0,
        entry_type,
        client_ref: client(),
        operation_date: day(d),
        concept: format!("movement {sequence}"),
        direction: if debit { Direction::Debit } else { Direction::Credit },
        amount: Money::from_minor(amount),
    }
}
