use crate::error::{DisperseError, TransferError};
use ethers::types::{Address, U256};
use serde::{Deserialize, Serialize};

/// How value reaches the recipients of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistributionMode {
    /// Native value attached to the call, pushed to each recipient.
    Native,
    /// Aggregate pulled into the distributor's custody, then pushed out.
    TokenPooled,
    /// Each amount moved straight from the caller to its recipient.
    TokenDirect,
}

/// Recipients paired positionally with the amounts they receive.
///
/// Only constructed from lists of equal length.
#[derive(Debug, Clone, Copy)]
pub struct Batch<'a> {
    recipients: &'a [Address],
    amounts: &'a [U256],
}

impl<'a> Batch<'a> {
    pub fn new(recipients: &'a [Address], amounts: &'a [U256]) -> Result<Self, DisperseError> {
        if recipients.len() != amounts.len() {
            return Err(DisperseError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        Ok(Self { recipients, amounts })
    }

    pub fn len(&self) -> usize {
        self.recipients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.recipients.is_empty()
    }

    /// `(recipient, amount)` pairs in index order.
    pub fn legs(self) -> impl Iterator<Item = (Address, U256)> + 'a {
        self.recipients.iter().copied().zip(self.amounts.iter().copied())
    }

    /// Sum of all amounts; overflow is an error, never a wrap.
    pub fn total(&self) -> Result<U256, DisperseError> {
        self.amounts
            .iter()
            .try_fold(U256::zero(), |sum, amount| sum.checked_add(*amount))
            .ok_or(DisperseError::TransferFailed(TransferError::AggregateOverflow))
    }
}

/// Summary of a distribution that committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub mode: DistributionMode,
    pub caller: Address,
    pub recipients: usize,
    pub total: U256,
    /// Native value returned to the caller; always zero for tokens.
    pub refunded: U256,
    /// Asset movements executed, the pull and the refund included.
    pub transfers: usize,
    pub timestamp: u64,
}
