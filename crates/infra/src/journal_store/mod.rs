//! Append-only journal store boundary.
//!
//! This module defines the storage-facing abstraction for recording journal
//! entries and reading them back per client, without making any storage
//! assumptions.

pub mod in_memory;
pub mod r#trait;

pub use in_memory::InMemoryJournalStore;
pub use r#trait::{EntryQuery, JournalStore, JournalStoreError};
