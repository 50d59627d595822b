//! State Management Module
//!
//! This module models the execution environment a distribution runs in:
//! - Journal: checkpoint/commit/revert for all-or-nothing calls
//! - NativeBank: native-asset balances and receiver hooks
//! - World: the bank plus every known token ledger, as served over RPC

mod bank;
mod journal;
mod world;

pub use bank::{NativeBank, Receiver};
pub use journal::{Checkpoint, Journaled, JournaledMap, atomically};
pub use world::World;
