//! This crate implements an all-or-nothing batch distribution engine: one payer,
//! many recipients, native value or fungible tokens, with a JSON-RPC service in
//! front of an in-memory execution environment.

pub mod types; // Batches, distribution modes and receipts.
pub mod error; // Typed failures callers can branch on.
pub mod validation; // Validate stage: lengths, recipients, amounts.
pub mod state; // Journaled execution environment: native bank and world.
pub mod ledger; // Token ledger interface and in-memory token.
pub mod distributor; // The three distribution entry points and the re-entrancy guard.
pub mod api; // JSON-RPC server.
pub mod config; // Defines and loads service configuration.

// Re-export commonly used types and configurations for easier access.
pub use types::*;
pub use config::Config;
pub use distributor::BatchDistributor;
pub use error::DisperseError;
