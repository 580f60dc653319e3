//! Customer current-account ledger.
//!
//! Pure domain logic only: no IO, no persistence, no rendering. Data flows
//! journal entry → movements → (closing filter) → running balances → statement.

pub mod account;
pub mod balance;
pub mod business;
pub mod closing;
pub mod draft;
pub mod journal;
pub mod movement;
pub mod report;
pub mod statement;

#[cfg(test)]
mod testing;

pub use account::ClientAccount;
pub use balance::{BalanceSummary, canonical_order, compute_balances};
pub use business::{BusinessEvent, CASH_ACCOUNT, PERIOD_CLOSE_ACCOUNT, SALES_ACCOUNT};
pub use closing::{ClosingPolicy, EntryTyped, exclude_closing, is_closing};
pub use draft::{DraftLine, JournalEntryDraft};
pub use journal::{Direction, EntryLine, EntryType, JournalEntry, LineAccount, RecordedEntry};
pub use movement::{BalancedMovement, LedgerMovement, project, project_for_client};
pub use report::{MonthlySummary, monthly_summary};
pub use statement::{DateRange, Statement, build_statement};
