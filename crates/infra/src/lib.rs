//! Infrastructure layer: storage, config, read models, rendering and the
//! ledger service wiring them together.

pub mod config;
pub mod journal_store;
pub mod projections;
pub mod read_model;
pub mod render;
pub mod service;


pub use config::{ConfigError, LedgerConfig};
pub use journal_store::{EntryQuery, InMemoryJournalStore, JournalStore, JournalStoreError};
pub use projections::ClientAccounts;
pub use read_model::{InMemoryStore, KeyValueStore, ReadModelError};
pub use render::{JsonStatementRenderer, RenderError, StatementRenderer};
pub use service::{LedgerService, ServiceError};
