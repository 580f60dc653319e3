//! Ledger application service.
//!
//! Ties the journal store, the client accounts read model and the pure
//! accounting functions together. Every write goes: validate → fold check →
//! append → refresh the touched clients' balances. The fold check runs the
//! balance computation over the history plus the new entry before anything is
//! stored, so an entry that would break a client's fold is never appended.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;
use thiserror::Error;

use shopledger_accounting::{
    BalanceSummary, BusinessEvent, ClientAccount, ClosingPolicy, DateRange, JournalEntry,
    JournalEntryDraft, LedgerMovement, MonthlySummary, RecordedEntry, Statement, build_statement,
    compute_balances, exclude_closing, monthly_summary, project_for_client,
};
use shopledger_core::{ClientId, EntryId, LedgerError};
use shopledger_parties::{Client, RegisterClient};

use crate::config::LedgerConfig;
use crate::journal_store::{EntryQuery, JournalStore, JournalStoreError};
use crate::projections::ClientAccounts;
use crate::read_model::{KeyValueStore, ReadModelError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error(transparent)]
    Store(#[from] JournalStoreError),

    #[error(transparent)]
    ReadModel(ReadModelError),
}

impl From<ReadModelError> for ServiceError {
    fn from(err: ReadModelError) -> Self {
        match err {
            ReadModelError::Ledger(err) => Self::Ledger(err),
            other => Self::ReadModel(other),
        }
    }
}

pub struct LedgerService<J, A>
where
    J: JournalStore,
    A: KeyValueStore<ClientId, ClientAccount>,
{
    journal: J,
    accounts: ClientAccounts<A>,
    config: LedgerConfig,
    /// Serializes fold check → append → refresh.
    record_lock: Mutex<()>,
}

impl<J, A> LedgerService<J, A>
where
    J: JournalStore,
    A: KeyValueStore<ClientId, ClientAccount>,
{
    pub fn new(journal: J, accounts: ClientAccounts<A>, config: LedgerConfig) -> Self {
        Self {
            journal,
            accounts,
            config,
            record_lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn register_client(&self, cmd: RegisterClient) -> Result<ClientAccount, ServiceError> {
        let client = Client::register(cmd)?;
        let account = self.accounts.register(client)?;
        tracing::info!(client_id = %account.client().id, "client registered");
        Ok(account)
    }

    fn lock_records(&self) -> Result<MutexGuard<'_, ()>, ServiceError> {
        self.record_lock
            .lock()
            .map_err(|_| JournalStoreError::Unavailable("record lock poisoned".to_string()).into())
    }

    /// Append a validated entry and refresh the balances of every client it touches.
    ///
    /// Nothing is appended unless every touched client's balances still fold
    /// (no overflow, no ordering fault) with the entry in place.
    pub fn record(&self, entry: JournalEntry) -> Result<RecordedEntry, ServiceError> {
        let _guard = self.lock_records()?;

        let clients = entry.client_ids();
        for client_id in &clients {
            self.accounts.client(client_id)?;
        }
        self.check_fold(&entry, &clients)?;

        let recorded = self.journal.append(entry)?;
        tracing::info!(
            entry_id = %recorded.entry().id(),
            sequence = recorded.sequence(),
            entry_type = ?recorded.entry().entry_type(),
            "journal entry recorded"
        );

        for client_id in &clients {
            self.refresh(client_id)?;
        }

        Ok(recorded)
    }

    /// Fold each client's history with `entry` appended at the next sequence.
    fn check_fold(&self, entry: &JournalEntry, clients: &[ClientId]) -> Result<(), ServiceError> {
        let provisional = RecordedEntry::new(self.journal.last_sequence()? + 1, entry.clone())?;
        for client_id in clients {
            let mut movements = self.movements(client_id, ClosingPolicy::Include)?;
            movements.extend(project_for_client([&provisional], client_id));
            compute_balances(exclude_closing(movements.iter().cloned()))?;
            compute_balances(movements)?;
        }
        Ok(())
    }

    /// Validate an untyped draft at the configured currency scale, then record it.
    pub fn record_draft(&self, draft: JournalEntryDraft) -> Result<RecordedEntry, ServiceError> {
        let entry = draft.validate(self.config.currency_scale)?;
        self.record(entry)
    }

    pub fn record_event(&self, event: BusinessEvent) -> Result<RecordedEntry, ServiceError> {
        let entry = event.into_entry(EntryId::new())?;
        self.record(entry)
    }

    /// Recompute a client's stored balances from the journal.
    pub fn refresh(&self, client_id: &ClientId) -> Result<ClientAccount, ServiceError> {
        self.accounts
            .refresh(client_id, || self.movements(client_id, ClosingPolicy::Include))
    }

    /// A client's movements in journal order, filtered by `policy`.
    pub fn movements(
        &self,
        client_id: &ClientId,
        policy: ClosingPolicy,
    ) -> Result<Vec<LedgerMovement>, ServiceError> {
        let query = EntryQuery::for_client(*client_id).with_policy(policy);
        let entries = self.journal.query(&query)?;
        Ok(project_for_client(&entries, client_id))
    }

    pub fn balances(
        &self,
        client_id: &ClientId,
        policy: ClosingPolicy,
    ) -> Result<BalanceSummary, ServiceError> {
        self.accounts.client(client_id)?;
        let movements = self.movements(client_id, policy)?;
        Ok(compute_balances(movements)?)
    }

    pub fn account(&self, client_id: &ClientId) -> Result<ClientAccount, ServiceError> {
        self.accounts
            .get(client_id)?
            .ok_or_else(|| LedgerError::not_found(format!("client {client_id}")).into())
    }

    pub fn accounts(&self) -> Result<Vec<ClientAccount>, ServiceError> {
        Ok(self.accounts.list()?)
    }

    /// Build a statement; `policy` falls back to the configured default.
    pub fn statement(
        &self,
        client_id: &ClientId,
        range: DateRange,
        policy: Option<ClosingPolicy>,
        emission_date: NaiveDate,
    ) -> Result<Statement, ServiceError> {
        let policy = policy.unwrap_or_else(|| self.config.default_closing_policy());
        let client = self.accounts.client(client_id)?;
        let directory = HashMap::from([(client.id, client)]);

        // History before `from` is kept: it determines the opening balance.
        let query = EntryQuery::for_client(*client_id)
            .up_to(range.to())
            .with_policy(policy);
        let entries = self.journal.query(&query)?;
        let movements = project_for_client(&entries, client_id);

        let statement = build_statement(
            &directory,
            client_id,
            range,
            policy,
            movements,
            emission_date,
        )?;

        tracing::info!(
            client_id = %client_id,
            from = %range.from(),
            to = %range.to(),
            policy = ?policy,
            movements = statement.movements.len(),
            "statement built"
        );

        Ok(statement)
    }

    pub fn monthly_summary(&self, client_id: &ClientId) -> Result<Vec<MonthlySummary>, ServiceError> {
        self.accounts.client(client_id)?;
        let movements = self.movements(client_id, ClosingPolicy::Exclude)?;
        Ok(monthly_summary(movements)?)
    }
}
