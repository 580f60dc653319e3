//! Running balance calculator.
//!
//! Sign convention: the balance is what the client owes the shop. Debits
//! increase it, credits decrease it. Any display inversion belongs to the
//! renderer.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDate;
use serde::Serialize;

use shopledger_core::{ClientId, EntryId, LedgerError, LedgerResult, Money};

use crate::closing::is_closing;
use crate::movement::{BalancedMovement, LedgerMovement};

/// Result of folding one client's movements in canonical order.
///
/// Only [`compute_balances`] builds this type, which makes it the single
/// source for client account balances.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSummary {
    client_ref: Option<ClientId>,
    movements: Vec<BalancedMovement>,
    final_balance: Money,
    contains_closing: bool,
}

impl BalanceSummary {
    /// `None` when there were no movements.
    pub fn client_ref(&self) -> Option<ClientId> {
        self.client_ref
    }

    pub fn movements(&self) -> &[BalancedMovement] {
        &self.movements
    }

    pub fn into_movements(self) -> Vec<BalancedMovement> {
        self.movements
    }

    pub fn final_balance(&self) -> Money {
        self.final_balance
    }

    pub fn contains_closing(&self) -> bool {
        self.contains_closing
    }

    pub fn last_operation_date(&self) -> Option<NaiveDate> {
        self.movements.last().map(|m| m.movement.operation_date)
    }

    /// Balance entering `date`: the cumulative balance of the last movement
    /// dated strictly before it, or zero.
    pub fn balance_before(&self, date: NaiveDate) -> Money {
        self.movements
            .iter()
            .take_while(|m| m.movement.operation_date < date)
            .last()
            .map(|m| m.cumulative_balance)
            .unwrap_or(Money::ZERO)
    }
}

/// Sort movements into canonical order: operation date, then insertion
/// sequence, then line number.
///
/// Fails with `Validation` for a negative amount (movements carry
/// magnitudes), and with `Ordering` when sequence numbers are missing or
/// inconsistent (one sequence shared by two entries, one entry under two
/// sequences, or the same movement twice).
pub fn canonical_order(mut movements: Vec<LedgerMovement>) -> LedgerResult<Vec<LedgerMovement>> {
    let mut entry_by_sequence: HashMap<u64, EntryId> = HashMap::new();
    let mut sequence_by_entry: HashMap<EntryId, u64> = HashMap::new();
    let mut seen: HashSet<(u64, u32)> = HashSet::new();

    for m in &movements {
        if m.amount.is_negative() {
            return Err(LedgerError::validation(format!(
                "movement of entry {} has a negative amount ({})",
                m.entry_ref, m.amount
            )));
        }

        if m.sequence == 0 {
            return Err(LedgerError::ordering(format!(
                "movement of entry {} has no sequence number",
                m.entry_ref
            )));
        }

        match entry_by_sequence.insert(m.sequence, m.entry_ref) {
            Some(other) if other != m.entry_ref => {
                return Err(LedgerError::ordering(format!(
                    "sequence {} is shared by entries {other} and {}",
                    m.sequence, m.entry_ref
                )));
            }
            _ => {}
        }

        match sequence_by_entry.insert(m.entry_ref, m.sequence) {
            Some(other) if other != m.sequence => {
                return Err(LedgerError::ordering(format!(
                    "entry {} appears with sequences {other} and {}",
                    m.entry_ref, m.sequence
                )));
            }
            _ => {}
        }

        if !seen.insert((m.sequence, m.line_no)) {
            return Err(LedgerError::ordering(format!(
                "duplicate movement (sequence {}, line {})",
                m.sequence, m.line_no
            )));
        }
    }

    movements.sort_by_key(LedgerMovement::canonical_key);
    Ok(movements)
}

/// Annotate one client's movements with cumulative balances.
///
/// Input order does not matter; the result is always in canonical order and
/// identical for identical input. Any ordering or overflow problem aborts the
/// whole computation.
pub fn compute_balances<I>(movements: I) -> LedgerResult<BalanceSummary>
where
    I: IntoIterator<Item = LedgerMovement>,
{
    let movements: Vec<LedgerMovement> = movements.into_iter().collect();

    let client_ref = movements.first().map(|m| m.client_ref);
    if let Some(client) = client_ref {
        if let Some(stray) = movements.iter().find(|m| m.client_ref != client) {
            return Err(LedgerError::validation(format!(
                "balance fold spans clients {client} and {}",
                stray.client_ref
            )));
        }
    }

    let ordered = canonical_order(movements)?;

    let mut running = Money::ZERO;
    let mut contains_closing = false;
    let mut annotated = Vec::with_capacity(ordered.len());

    for movement in ordered {
        running = running.checked_add(movement.signed_amount()?)?;
        contains_closing |= is_closing(&movement);
        annotated.push(BalancedMovement {
            movement,
            cumulative_balance: running,
        });
    }

    Ok(BalanceSummary {
        client_ref,
        movements: annotated,
        final_balance: running,
        contains_closing,
    })
}
