//! Batch Distribution Module
//!
//! This module implements the three distribution entry points:
//! - Native: attached value pushed to each recipient, surplus refunded
//! - TokenPooled: aggregate pulled into custody once, then pushed out
//! - TokenDirect: each amount moved straight from caller to recipient
//!
//! Every entry point is one all-or-nothing call, guarded against re-entry.

mod distributor;
mod guard;


pub use distributor::BatchDistributor;
pub use guard::{Entered, ReentrancyGuard};
