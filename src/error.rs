//! Error Types
//!
//! Every distribution failure surfaces as a [`DisperseError`] so callers can
//! branch on the cause. Failures reported by the native bank or a token
//! ledger are [`LedgerError`]s and reach the caller wrapped in
//! [`DisperseError::TransferFailed`].

use ethers::types::{Address, U256};
use thiserror::Error;

/// Failure reported by the native bank or a token ledger for a single movement.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LedgerError {
    #[error("insufficient balance for {account:?}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: U256,
        available: U256,
    },

    #[error("insufficient allowance from {owner:?} to {spender:?}: required {required}, approved {approved}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        required: U256,
        approved: U256,
    },

    #[error("recipient {recipient:?} rejected the transfer: {reason}")]
    RecipientRejected { recipient: Address, reason: String },

    #[error("balance of {account:?} would overflow")]
    BalanceOverflow { account: Address },
}

/// Why a batch failed while moving value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    #[error("aggregate amount overflows 256 bits")]
    AggregateOverflow,

    #[error("attached value exhausted at index {index}: {remaining} left, {required} required")]
    InsufficientValue {
        index: usize,
        remaining: U256,
        required: U256,
    },

    #[error("ledger moved {moved} for {account:?}, expected {expected}")]
    AccountingMismatch {
        account: Address,
        expected: U256,
        moved: U256,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DisperseError {
    #[error("recipient list has {recipients} entries but amount list has {amounts}")]
    LengthMismatch { recipients: usize, amounts: usize },

    #[error("caller {caller:?} cannot distribute through itself")]
    InvalidCaller { caller: Address },

    #[error("invalid recipient {recipient:?} at index {index}")]
    InvalidRecipient { index: usize, recipient: Address },

    #[error("zero amount at index {index}")]
    InvalidAmount { index: usize },

    #[error("transfer failed: {0}")]
    TransferFailed(#[from] TransferError),

    #[error("a distribution is already in progress")]
    ReentrancyRejected,
}

impl From<LedgerError> for DisperseError {
    fn from(err: LedgerError) -> Self {
        DisperseError::TransferFailed(TransferError::Ledger(err))
    }
}

impl DisperseError {
    /// Stable name of the variant, reported to RPC clients.
    pub fn kind(&self) -> &'static str {
        match self {
            DisperseError::LengthMismatch { .. } => "LengthMismatch",
            DisperseError::InvalidCaller { .. } => "InvalidCaller",
            DisperseError::InvalidRecipient { .. } => "InvalidRecipient",
            DisperseError::InvalidAmount { .. } => "InvalidAmount",
            DisperseError::TransferFailed(_) => "TransferFailed",
            DisperseError::ReentrancyRejected => "ReentrancyRejected",
        }
    }
}
