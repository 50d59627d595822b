//! Batch Validation Module
//!
//! This module validates recipient/amount batches before any value moves.
//! Checks list lengths, recipient identities and amounts.

mod validator;
pub use validator::Validator;
