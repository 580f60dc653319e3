//! Business events that produce journal entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use shopledger_core::{ClientId, EntryId, LedgerError, LedgerResult, Money};

use crate::journal::{EntryLine, EntryType, JournalEntry, LineAccount};

pub const SALES_ACCOUNT: &str = "sales";
pub const CASH_ACCOUNT: &str = "cash";
pub const PERIOD_CLOSE_ACCOUNT: &str = "period-close";

/// Shop events with a monetary effect on a client's current account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BusinessEvent {
    /// Goods or a repair sold on credit.
    SaleOnAccount {
        client_id: ClientId,
        amount: Money,
        concept: String,
        occurred_at: DateTime<Utc>,
    },
    PaymentReceived {
        client_id: ClientId,
        amount: Money,
        concept: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    RefundIssued {
        client_id: ClientId,
        amount: Money,
        concept: Option<String>,
        occurred_at: DateTime<Utc>,
    },
    /// Period-end close offsetting `balance` (what the client owed at close).
    PeriodClose {
        client_id: ClientId,
        balance: Money,
        occurred_at: DateTime<Utc>,
    },
}

impl BusinessEvent {
    pub fn client_id(&self) -> ClientId {
        match self {
            BusinessEvent::SaleOnAccount { client_id, .. }
            | BusinessEvent::PaymentReceived { client_id, .. }
            | BusinessEvent::RefundIssued { client_id, .. }
            | BusinessEvent::PeriodClose { client_id, .. } => *client_id,
        }
    }

    /// Translate the event into a balanced journal entry.
    pub fn into_entry(self, entry_id: EntryId) -> LedgerResult<JournalEntry> {
        match self {
            BusinessEvent::SaleOnAccount {
                client_id,
                amount,
                concept,
                occurred_at,
            } => {
                ensure_not_negative(amount)?;
                JournalEntry::new(
                    entry_id,
                    occurred_at,
                    EntryType::Normal,
                    concept,
                    vec![
                        EntryLine::debit(LineAccount::client(client_id), amount),
                        EntryLine::credit(LineAccount::nominal(SALES_ACCOUNT), amount),
                    ],
                )
            }
            BusinessEvent::PaymentReceived {
                client_id,
                amount,
                concept,
                occurred_at,
            } => {
                ensure_not_negative(amount)?;
                JournalEntry::new(
                    entry_id,
                    occurred_at,
                    EntryType::Normal,
                    concept.unwrap_or_else(|| "Pago recibido".to_string()),
                    vec![
                        EntryLine::debit(LineAccount::nominal(CASH_ACCOUNT), amount),
                        EntryLine::credit(LineAccount::client(client_id), amount),
                    ],
                )
            }
            BusinessEvent::RefundIssued {
                client_id,
                amount,
                concept,
                occurred_at,
            } => {
                ensure_not_negative(amount)?;
                JournalEntry::new(
                    entry_id,
                    occurred_at,
                    EntryType::Normal,
                    concept.unwrap_or_else(|| "Devolución".to_string()),
                    vec![
                        EntryLine::debit(LineAccount::client(client_id), amount),
                        EntryLine::credit(LineAccount::nominal(CASH_ACCOUNT), amount),
                    ],
                )
            }
            BusinessEvent::PeriodClose {
                client_id,
                balance,
                occurred_at,
            } => {
                let magnitude = balance.abs()?;
                let client = LineAccount::client(client_id);
                let close = LineAccount::nominal(PERIOD_CLOSE_ACCOUNT);
                // Owed balances are credited away, credit balances debited away.
                let lines = if balance.is_negative() {
                    vec![
                        EntryLine::debit(client, magnitude),
                        EntryLine::credit(close, magnitude),
                    ]
                } else {
                    vec![
                        EntryLine::credit(client, magnitude),
                        EntryLine::debit(close, magnitude),
                    ]
                };
                JournalEntry::new(entry_id, occurred_at, EntryType::Closing, "Cierre de período", lines)
            }
        }
    }
}

fn ensure_not_negative(amount: Money) -> LedgerResult<()> {
    if amount.is_negative() {
        return Err(LedgerError::validation("amount cannot be negative"));
    }
    Ok(())
}
