//! `shopledger-core`: shared building blocks for the current-account ledger.
//!
//! This crate contains **pure** primitives (no infrastructure concerns):
//! identifiers, the error taxonomy and the fixed-point money type.

pub mod error;
pub mod id;
pub mod money;

pub use error::{LedgerError, LedgerResult};
pub use id::{ClientId, EntryId};
pub use money::{DEFAULT_SCALE, Money};
