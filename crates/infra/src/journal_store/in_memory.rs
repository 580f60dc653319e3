use std::collections::HashMap;
use std::sync::RwLock;

use shopledger_accounting::{JournalEntry, RecordedEntry};
use shopledger_core::{ClientId, EntryId};

use super::r#trait::{EntryQuery, JournalStore, JournalStoreError};

#[derive(Debug, Default)]
struct Journal {
    entries: Vec<RecordedEntry>,
    by_id: HashMap<EntryId, usize>,
    by_client: HashMap<ClientId, Vec<usize>>,
    last_sequence: u64,
}

/// In-memory append-only journal.
///
/// A single write lock covers sequence assignment and the append, so sequence
/// numbers are global, gap-free and strictly increasing. Intended for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryJournalStore {
    journal: RwLock<Journal>,
}

impl InMemoryJournalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JournalStore for InMemoryJournalStore {
    fn append(&self, entry: JournalEntry) -> Result<RecordedEntry, JournalStoreError> {
        let mut journal = self
            .journal
            .write()
            .map_err(|_| JournalStoreError::Unavailable("lock poisoned".to_string()))?;

        if journal.by_id.contains_key(&entry.id()) {
            return Err(JournalStoreError::DuplicateEntry(entry.id()));
        }

        let sequence = journal.last_sequence + 1;
        let recorded = RecordedEntry::new(sequence, entry)?;
        let idx = journal.entries.len();

        journal.by_id.insert(recorded.entry().id(), idx);
        for client in recorded.entry().client_ids() {
            journal.by_client.entry(client).or_default().push(idx);
        }
        journal.entries.push(recorded.clone());
        journal.last_sequence = sequence;

        Ok(recorded)
    }

    fn get(&self, id: &EntryId) -> Result<Option<RecordedEntry>, JournalStoreError> {
        let journal = self
            .journal
            .read()
            .map_err(|_| JournalStoreError::Unavailable("lock poisoned".to_string()))?;

        Ok(journal.by_id.get(id).map(|idx| journal.entries[*idx].clone()))
    }

    fn query(&self, query: &EntryQuery) -> Result<Vec<RecordedEntry>, JournalStoreError> {
        let journal = self
            .journal
            .read()
            .map_err(|_| JournalStoreError::Unavailable("lock poisoned".to_string()))?;

        // Indices are pushed in append order, so results come out in sequence order.
        let matches: Vec<RecordedEntry> = match query.client_id {
            Some(client) => journal
                .by_client
                .get(&client)
                .map(|indices| {
                    indices
                        .iter()
                        .map(|idx| &journal.entries[*idx])
                        .filter(|rec| query.matches(rec))
                        .cloned()
                        .collect()
                })
                .unwrap_or_default(),
            None => journal
                .entries
                .iter()
                .filter(|rec| query.matches(rec))
                .cloned()
                .collect(),
        };

        Ok(matches)
    }

    fn last_sequence(&self) -> Result<u64, JournalStoreError> {
        let journal = self
            .journal
            .read()
            .map_err(|_| JournalStoreError::Unavailable("lock poisoned".to_string()))?;
        Ok(journal.last_sequence)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use chrono::{NaiveDate, TimeZone, Utc};
    use shopledger_accounting::{ClosingPolicy, EntryLine, EntryType, LineAccount};
    use shopledger_core::Money;

    fn entry(client: ClientId, day: u32, entry_type: EntryType) -> JournalEntry {
        JournalEntry::new(
            EntryId::new(),
            Utc.with_ymd_and_hms(2024, 4, day, 12, 0, 0).unwrap(),
            entry_type,
            "test",
            vec![
                EntryLine::debit(LineAccount::client(client), Money::from_minor(100)),
                EntryLine::credit(LineAccount::nominal("sales"), Money::from_minor(100)),
            ],
        )
        .unwrap()
    }

    #[test]
    fn assigns_increasing_sequence_numbers() {
        let store = InMemoryJournalStore::new();
        let client = ClientId::new();

        let a = store.append(entry(client, 2, EntryType::Normal)).unwrap();
        let b = store.append(entry(client, 1, EntryType::Normal)).unwrap();

        assert_eq!(a.sequence(), 1);
        assert_eq!(b.sequence(), 2);
        assert_eq!(store.last_sequence().unwrap(), 2);
        assert_eq!(store.get(&b.entry().id()).unwrap(), Some(b));
    }

    #[test]
    fn duplicate_entry_id_is_rejected() {
        let store = InMemoryJournalStore::new();
        let e = entry(ClientId::new(), 1, EntryType::Normal);

        store.append(e.clone()).unwrap();
        let err = store.append(e.clone()).unwrap_err();
        assert!(matches!(err, JournalStoreError::DuplicateEntry(id) if id == e.id()));
        assert_eq!(store.last_sequence().unwrap(), 1);
    }

    #[test]
    fn queries_by_client_range_and_policy() {
        let store = InMemoryJournalStore::new();
        let client = ClientId::new();
        let other = ClientId::new();

        store.append(entry(client, 1, EntryType::Normal)).unwrap();
        store.append(entry(other, 2, EntryType::Normal)).unwrap();
        store.append(entry(client, 3, EntryType::Closing)).unwrap();
        store.append(entry(client, 5, EntryType::Normal)).unwrap();

        let all = store.query(&EntryQuery::for_client(client)).unwrap();
        assert_eq!(all.iter().map(|r| r.sequence()).collect::<Vec<_>>(), vec![1, 3, 4]);

        let working = store
            .query(&EntryQuery::for_client(client).with_policy(ClosingPolicy::Exclude))
            .unwrap();
        assert_eq!(working.len(), 2);

        let windowed = store
            .query(
                &EntryQuery::for_client(client)
                    .from_date(NaiveDate::from_ymd_opt(2024, 4, 2).unwrap())
                    .up_to(NaiveDate::from_ymd_opt(2024, 4, 4).unwrap()),
            )
            .unwrap();
        assert_eq!(windowed.len(), 1);
        assert_eq!(windowed[0].sequence(), 3);

        assert_eq!(store.query(&EntryQuery::default()).unwrap().len(), 4);
        assert!(store.query(&EntryQuery::for_client(ClientId::new())).unwrap().is_empty());
    }

    #[test]
    fn concurrent_appends_never_share_a_sequence() {
        let store = Arc::new(InMemoryJournalStore::new());
        let client = ClientId::new();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || {
                    (0..25)
                        .map(|_| store.append(entry(client, 1, EntryType::Normal)).unwrap().sequence())
                        .collect::<Vec<_>>()
                })
            })
            .collect();

        let mut sequences: Vec<u64> = handles.into_iter().flat_map(|h| h.join().unwrap()).collect();
        sequences.sort_unstable();
        assert_eq!(sequences, (1..=200).collect::<Vec<u64>>());
    }
}
