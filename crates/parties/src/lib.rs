//! Parties module (shop clients holding a current account).
//!
//! This crate contains client identity and the lookup seam the ledger uses to
//! resolve client references. Pure domain logic only (no IO, no storage).

pub mod client;

pub use client::{Client, ClientDirectory, ContactInfo, RegisterClient};
