use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use shopledger_core::LedgerError;

/// Read model operation error.
#[derive(Debug, Error)]
pub enum ReadModelError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("read model unavailable: {0}")]
    Unavailable(String),
}

/// Key/value store abstraction for disposable read models.
///
/// Read models here are always re-derivable from the journal, so a failed
/// write is recoverable by recomputation.
pub trait KeyValueStore<K, V>: Send + Sync {
    fn get(&self, key: &K) -> Result<Option<V>, ReadModelError>;
    fn upsert(&self, key: K, value: V) -> Result<(), ReadModelError>;
    fn list(&self) -> Result<Vec<V>, ReadModelError>;
    fn contains(&self, key: &K) -> Result<bool, ReadModelError> {
        Ok(self.get(key)?.is_some())
    }
}

impl<K, V, S> KeyValueStore<K, V> for Arc<S>
where
    S: KeyValueStore<K, V> + ?Sized,
{
    fn get(&self, key: &K) -> Result<Option<V>, ReadModelError> {
        (**self).get(key)
    }

    fn upsert(&self, key: K, value: V) -> Result<(), ReadModelError> {
        (**self).upsert(key, value)
    }

    fn list(&self) -> Result<Vec<V>, ReadModelError> {
        (**self).list()
    }

    fn contains(&self, key: &K) -> Result<bool, ReadModelError> {
        (**self).contains(key)
    }
}

/// In-memory store for tests/dev.
#[derive(Debug)]
pub struct InMemoryStore<K, V> {
    inner: RwLock<HashMap<K, V>>,
}

impl<K, V> InMemoryStore<K, V> {
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<K, V> Default for InMemoryStore<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

fn poisoned<T>(_: T) -> ReadModelError {
    ReadModelError::Unavailable("lock poisoned".to_string())
}

impl<K, V> KeyValueStore<K, V> for InMemoryStore<K, V>
where
    K: Clone + Eq + Hash + Send + Sync + 'static,
    V: Clone + Send + Sync + 'static,
{
    fn get(&self, key: &K) -> Result<Option<V>, ReadModelError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.get(key).cloned())
    }

    fn upsert(&self, key: K, value: V) -> Result<(), ReadModelError> {
        let mut map = self.inner.write().map_err(poisoned)?;
        map.insert(key, value);
        Ok(())
    }

    fn list(&self) -> Result<Vec<V>, ReadModelError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.values().cloned().collect())
    }

    fn contains(&self, key: &K) -> Result<bool, ReadModelError> {
        let map = self.inner.read().map_err(poisoned)?;
        Ok(map.contains_key(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upsert_replaces_existing_value() {
        let store: InMemoryStore<u32, &str> = InMemoryStore::new();
        store.upsert(1, "a").unwrap();
        store.upsert(1, "b").unwrap();

        assert_eq!(store.get(&1).unwrap(), Some("b"));
        assert!(store.contains(&1).unwrap());
        assert!(!store.contains(&2).unwrap());
        assert_eq!(store.list().unwrap(), vec!["b"]);
    }

    #[test]
    fn poisoned_lock_is_reported() {
        let store: Arc<InMemoryStore<u32, &str>> = Arc::new(InMemoryStore::new());
        store.upsert(1, "a").unwrap();

        let poisoner = store.clone();
        let _ = std::thread::spawn(move || {
            let _guard = poisoner.inner.write().unwrap();
            panic!("writer died");
        })
        .join();

        assert!(matches!(store.get(&1), Err(ReadModelError::Unavailable(_))));
        assert!(matches!(store.contains(&1), Err(ReadModelError::Unavailable(_))));
        assert!(matches!(store.upsert(2, "b"), Err(ReadModelError::Unavailable(_))));
        assert!(matches!(store.list(), Err(ReadModelError::Unavailable(_))));
    }
}
