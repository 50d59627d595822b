//! Token Ledger Module
//!
//! Defines the interface the distributor uses to move fungible tokens, and an
//! in-memory ledger implementing it with balances and allowances.

mod token;

pub use token::TokenLedger;

use crate::error::LedgerError;
use crate::state::Journaled;
use ethers::types::{Address, U256};

/// A fungible-token ledger the distributor calls but does not own.
///
/// Implementations take part in the caller's checkpoint through
/// [`Journaled`], so a batch that fails after some ledger calls succeeded
/// leaves no trace on the ledger.
pub trait Ledger: Journaled {
    fn balance_of(&self, account: Address) -> U256;

    /// Move `amount` of `sender`'s own tokens to `to`.
    fn transfer(&mut self, sender: Address, to: Address, amount: U256) -> Result<(), LedgerError>;

    /// Move `amount` of `from`'s tokens to `to`, spending the allowance
    /// `from` granted to `spender`.
    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError>;
}
