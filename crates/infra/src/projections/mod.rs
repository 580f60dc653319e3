//! Projection implementations (read model builders).
//!
//! Projections are derived from the journal and can always be rebuilt from it.

pub mod client_accounts;

pub use client_accounts::ClientAccounts;
