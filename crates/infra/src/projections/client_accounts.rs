//! Client accounts read model.
//!
//! Holds every registered client together with its denormalized balances. The
//! balances are written in one place only, [`ClientAccounts::refresh`], which
//! re-derives them from a fresh journal snapshot. Storage failures, lock
//! poisoning included, surface as [`ReadModelError`].

use std::sync::{Arc, Mutex, MutexGuard};

use shopledger_accounting::{ClientAccount, LedgerMovement, compute_balances, exclude_closing};
use shopledger_core::{ClientId, LedgerError};
use shopledger_parties::Client;

use crate::read_model::{InMemoryStore, KeyValueStore, ReadModelError};

/// Registry of client accounts backed by a key/value read model.
#[derive(Debug)]
pub struct ClientAccounts<S = Arc<InMemoryStore<ClientId, ClientAccount>>>
where
    S: KeyValueStore<ClientId, ClientAccount>,
{
    store: S,
    /// Serializes snapshot → fold → write so a slower refresh can never
    /// overwrite a newer one.
    writer: Mutex<()>,
}

impl ClientAccounts {
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemoryStore::new()))
    }
}

impl<S> ClientAccounts<S>
where
    S: KeyValueStore<ClientId, ClientAccount>,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            writer: Mutex::new(()),
        }
    }

    fn lock_writer(&self) -> Result<MutexGuard<'_, ()>, ReadModelError> {
        self.writer
            .lock()
            .map_err(|_| ReadModelError::Unavailable("client accounts writer poisoned".to_string()))
    }

    /// Open an account for a new client (zero balances).
    pub fn register(&self, client: Client) -> Result<ClientAccount, ReadModelError> {
        let _guard = self.lock_writer()?;

        if self.store.contains(&client.id)? {
            return Err(LedgerError::conflict(format!("client {} already registered", client.id)).into());
        }

        let account = ClientAccount::open(client);
        self.store.upsert(account.client().id, account.clone())?;
        Ok(account)
    }

    pub fn get(&self, client_id: &ClientId) -> Result<Option<ClientAccount>, ReadModelError> {
        self.store.get(client_id)
    }

    /// The registered client, or `NotFound`.
    pub fn client(&self, client_id: &ClientId) -> Result<Client, ReadModelError> {
        self.store
            .get(client_id)?
            .map(|account| account.client().clone())
            .ok_or_else(|| LedgerError::not_found(format!("client {client_id}")).into())
    }

    /// All accounts, ordered by client name.
    pub fn list(&self) -> Result<Vec<ClientAccount>, ReadModelError> {
        let mut accounts = self.store.list()?;
        accounts.sort_by(|a, b| a.client().name.cmp(&b.client().name));
        Ok(accounts)
    }

    /// Recompute a client's balances from the movements returned by `load`.
    ///
    /// `load` must return the client's complete movement history (closing
    /// movements included); it runs while the writer lock is held.
    pub fn refresh<E, F>(&self, client_id: &ClientId, load: F) -> Result<ClientAccount, E>
    where
        E: From<ReadModelError>,
        F: FnOnce() -> Result<Vec<LedgerMovement>, E>,
    {
        let _guard = self.lock_writer()?;

        let mut account = self
            .store
            .get(client_id)?
            .ok_or_else(|| ReadModelError::from(LedgerError::not_found(format!("client {client_id}"))))?;

        let movements = load()?;
        let working = compute_balances(exclude_closing(movements.iter().cloned())).map_err(ReadModelError::from)?;
        let official = compute_balances(movements).map_err(ReadModelError::from)?;
        account.apply_balances(&official, &working).map_err(ReadModelError::from)?;

        self.store.upsert(*client_id, account.clone())?;

        tracing::debug!(
            client_id = %client_id,
            official_balance = %account.official_balance(),
            working_balance = %account.working_balance(),
            movements = account.movement_count(),
            "client balances refreshed"
        );

        Ok(account)
    }
}
