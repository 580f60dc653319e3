use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;

use shopledger_accounting::{ClosingPolicy, JournalEntry, RecordedEntry};
use shopledger_core::{ClientId, EntryId, LedgerError};

/// Journal store operation error.
///
/// These are **infrastructure errors** (storage consistency, availability);
/// ledger errors raised at the boundary are carried through `Ledger`.
#[derive(Debug, Error)]
pub enum JournalStoreError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("entry {0} was already recorded")]
    DuplicateEntry(EntryId),

    #[error("journal store unavailable: {0}")]
    Unavailable(String),
}

/// Filter for reading recorded entries.
///
/// Date bounds are inclusive and compare against the entry's operation date.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryQuery {
    pub client_id: Option<ClientId>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub closing_policy: ClosingPolicy,
}

impl EntryQuery {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    pub fn up_to(mut self, to: NaiveDate) -> Self {
        self.to = Some(to);
        self
    }

    pub fn from_date(mut self, from: NaiveDate) -> Self {
        self.from = Some(from);
        self
    }

    pub fn with_policy(mut self, closing_policy: ClosingPolicy) -> Self {
        self.closing_policy = closing_policy;
        self
    }

    pub fn matches(&self, recorded: &RecordedEntry) -> bool {
        let entry = recorded.entry();
        let date = entry.timestamp().date_naive();

        self.client_id.is_none_or(|c| entry.touches_client(&c))
            && self.from.is_none_or(|from| date >= from)
            && self.to.is_none_or(|to| date <= to)
            && self.closing_policy.admits(recorded)
    }
}

/// Append-only journal of balanced entries.
///
/// Implementations must:
/// - assign each appended entry a sequence number strictly greater than every
///   previously assigned one, atomically with the append
/// - reject a second entry with an id already recorded
/// - return query results in sequence order
pub trait JournalStore: Send + Sync {
    /// Append one entry. The returned record carries its sequence number.
    fn append(&self, entry: JournalEntry) -> Result<RecordedEntry, JournalStoreError>;

    fn get(&self, id: &EntryId) -> Result<Option<RecordedEntry>, JournalStoreError>;

    fn query(&self, query: &EntryQuery) -> Result<Vec<RecordedEntry>, JournalStoreError>;

    /// Highest sequence assigned so far (0 when empty).
    fn last_sequence(&self) -> Result<u64, JournalStoreError>;
}

impl<S> JournalStore for Arc<S>
where
    S: JournalStore + ?Sized,
{
    fn append(&self, entry: JournalEntry) -> Result<RecordedEntry, JournalStoreError> {
        (**self).append(entry)
    }

    fn get(&self, id: &EntryId) -> Result<Option<RecordedEntry>, JournalStoreError> {
        (**self).get(id)
    }

    fn query(&self, query: &EntryQuery) -> Result<Vec<RecordedEntry>, JournalStoreError> {
        (**self).query(query)
    }

    fn last_sequence(&self) -> Result<u64, JournalStoreError> {
        (**self).last_sequence()
    }
}
