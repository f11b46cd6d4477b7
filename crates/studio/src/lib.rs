//! Orchestration layer for the Manaforge studio.
//!
//! Ties the generation gateway, the credit ledger, and the local archive
//! together. Every generation runs estimate, afford-check, dispatch,
//! debit, archive, strictly in that order, and the ledger is untouched on
//! any failure path. Also hosts accounts and sessions, the event bus, the
//! low-energy notification writer, and the `manaforge` CLI entrypoint.

pub mod auth;
pub mod config;
pub mod error;
pub mod events;
pub mod notifications;
pub mod service;

pub use error::{StudioError, StudioResult};
pub use service::{GenerationOutcome, GenerationReceipt, Studio};
