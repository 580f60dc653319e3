//! Account statement builder.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use shopledger_core::{ClientId, LedgerError, LedgerResult, Money};
use shopledger_parties::{Client, ClientDirectory};

use crate::balance::compute_balances;
use crate::closing::{ClosingPolicy, is_closing};
use crate::journal::Direction;
use crate::movement::{BalancedMovement, LedgerMovement};

/// Inclusive date window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawRange")]
pub struct DateRange {
    from: NaiveDate,
    to: NaiveDate,
}

#[derive(Deserialize)]
struct RawRange {
    from: NaiveDate,
    to: NaiveDate,
}

impl TryFrom<RawRange> for DateRange {
    type Error = LedgerError;

    fn try_from(raw: RawRange) -> Result<Self, Self::Error> {
        DateRange::new(raw.from, raw.to)
    }
}

impl DateRange {
    pub fn new(from: NaiveDate, to: NaiveDate) -> LedgerResult<Self> {
        if from > to {
            return Err(LedgerError::validation(format!(
                "date range starts after it ends ({from} > {to})"
            )));
        }
        Ok(Self { from, to })
    }

    pub fn from(&self) -> NaiveDate {
        self.from
    }

    pub fn to(&self) -> NaiveDate {
        self.to
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.from <= date && date <= self.to
    }
}

/// Client-facing projection of movements and balances over a date range.
///
/// Raw values only; formatting is left to the renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Statement {
    pub client: Client,
    pub emission_date: NaiveDate,
    pub range: DateRange,
    pub closing_policy: ClosingPolicy,
    /// Balance entering the window.
    pub opening_balance: Money,
    pub movements: Vec<BalancedMovement>,
    pub total_debits: Money,
    pub total_credits: Money,
    pub final_balance: Money,
}

/// Build a statement for `client_id` over `range`.
///
/// `movements` is the client's full history as filtered by the caller's
/// closing policy; history before the window is needed to derive the opening
/// balance. A closing movement under `ClosingPolicy::Exclude` means the caller
/// and the builder disagree about the filter and is rejected.
pub fn build_statement<D, I>(
    directory: &D,
    client_id: &ClientId,
    range: DateRange,
    closing_policy: ClosingPolicy,
    movements: I,
    emission_date: NaiveDate,
) -> LedgerResult<Statement>
where
    D: ClientDirectory + ?Sized,
    I: IntoIterator<Item = LedgerMovement>,
{
    let client = directory.resolve(client_id)?;

    let movements: Vec<LedgerMovement> = movements.into_iter().collect();
    if let Some(stray) = movements.iter().find(|m| &m.client_ref != client_id) {
        return Err(LedgerError::validation(format!(
            "movement of entry {} belongs to client {}, not {client_id}",
            stray.entry_ref, stray.client_ref
        )));
    }
    if closing_policy == ClosingPolicy::Exclude && movements.iter().any(|m| is_closing(m)) {
        return Err(LedgerError::validation(
            "closing movements supplied to a statement that excludes them",
        ));
    }

    let summary = compute_balances(movements)?;
    let opening_balance = summary.balance_before(range.from());

    let window: Vec<BalancedMovement> = summary
        .into_movements()
        .into_iter()
        .filter(|m| range.contains(m.movement.operation_date))
        .collect();

    let mut total_debits = Money::ZERO;
    let mut total_credits = Money::ZERO;
    for m in &window {
        match m.movement.direction {
            Direction::Debit => total_debits = total_debits.checked_add(m.movement.amount)?,
            Direction::Credit => total_credits = total_credits.checked_add(m.movement.amount)?,
        }
    }

    let final_balance = window
        .last()
        .map(|m| m.cumulative_balance)
        .unwrap_or(opening_balance);

    Ok(Statement {
        client,
        emission_date,
        range,
        closing_policy,
        opening_balance,
        movements: window,
        total_debits,
        total_credits,
        final_balance,
    })
}
