//! Batch Distributor
//!
//! Each operation runs as a pipeline:
//! 1. Enter the re-entrancy guard
//! 2. Validate the batch (lengths, recipients, amounts)
//! 3. Escrow or pull value into custody, where the mode needs it
//! 4. Transfer each leg in index order
//! 5. Refund or settle custody
//!
//! Stages 3 to 5 run inside one checkpoint of the bank or ledger, so a
//! failure at any stage leaves no balance changed.

use super::ReentrancyGuard;
use crate::{
    Batch, DistributionMode, Receipt,
    error::{DisperseError, TransferError},
    ledger::Ledger,
    state::{NativeBank, atomically},
    validation::Validator,
};
use ethers::types::{Address, U256};
use tracing::{debug, info, warn};

/// Moves value from one payer to many recipients, all or nothing.
///
/// The distributor keeps no state between calls beyond its address and its
/// guard flag. Share it behind an `Arc` when receiver code needs to reach it.
pub struct BatchDistributor {
    address: Address,
    guard: ReentrancyGuard,
    validator: Validator,
}

impl BatchDistributor {
    pub fn new(address: Address) -> Self {
        Self {
            address,
            guard: ReentrancyGuard::new(),
            validator: Validator::new(address),
        }
    }

    /// Address under which the distributor holds custody.
    pub fn address(&self) -> Address {
        self.address
    }

    /// Distribute native value attached by `caller`.
    ///
    /// `attached_value` is escrowed from the caller first; legs are paid from
    /// it alone, and whatever the call leaves in custody above the pre-call
    /// balance is pushed back to the caller.
    pub fn distribute_native(
        &self,
        bank: &mut NativeBank,
        caller: Address,
        recipients: &[Address],
        amounts: &[U256],
        attached_value: U256,
    ) -> Result<Receipt, DisperseError> {
        let _entered = self.guard.enter()?;
        info!(
            "Native distribution from {:?}: {} recipients, {} attached",
            caller,
            recipients.len(),
            attached_value
        );

        let batch = self.validator.validate(caller, recipients, amounts)?;
        let total = batch.total()?;

        let result: Result<Receipt, DisperseError> = atomically(bank, |bank| {
            let custody_before = bank.balance_of(self.address);
            bank.move_value(caller, self.address, attached_value)?;

            let mut remaining = attached_value;
            for (index, (recipient, amount)) in batch.legs().enumerate() {
                remaining = remaining
                    .checked_sub(amount)
                    .ok_or(TransferError::InsufficientValue {
                        index,
                        remaining,
                        required: amount,
                    })?;
                bank.push(self.address, recipient, amount)?;
                debug!("Leg {}: pushed {} to {:?}", index, amount, recipient);
            }

            let custody_after = bank.balance_of(self.address);
            let refund = custody_after.checked_sub(custody_before).ok_or(
                TransferError::AccountingMismatch {
                    account: self.address,
                    expected: custody_before,
                    moved: custody_after,
                },
            )?;

            let mut transfers = batch.len();
            if !refund.is_zero() {
                bank.push(self.address, caller, refund)?;
                transfers += 1;
                debug!("Refunded {} to {:?}", refund, caller);
            }

            Ok(self.receipt(DistributionMode::Native, caller, batch, total, refund, transfers))
        });

        self.log_outcome(&result);
        result
    }

    /// Distribute tokens by pulling the aggregate into custody, then pushing
    /// each amount out of it.
    ///
    /// The caller must have approved the distributor for at least the total.
    pub fn distribute_token_pooled<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        caller: Address,
        recipients: &[Address],
        amounts: &[U256],
    ) -> Result<Receipt, DisperseError> {
        let _entered = self.guard.enter()?;
        info!(
            "Pooled token distribution from {:?}: {} recipients",
            caller,
            recipients.len()
        );

        let batch = self.validator.validate(caller, recipients, amounts)?;
        let total = batch.total()?;

        let result: Result<Receipt, DisperseError> = atomically(ledger, |ledger| {
            let custody_before = ledger.balance_of(self.address);

            checked_move(ledger, Some(self.address), caller, self.address, total)?;
            debug!("Pulled {} from {:?} into custody", total, caller);

            for (index, (recipient, amount)) in batch.legs().enumerate() {
                checked_move(ledger, None, self.address, recipient, amount)?;
                debug!("Leg {}: pushed {} to {:?}", index, amount, recipient);
            }

            let custody_after = ledger.balance_of(self.address);
            if custody_after != custody_before {
                return Err(TransferError::AccountingMismatch {
                    account: self.address,
                    expected: custody_before,
                    moved: custody_after,
                }
                .into());
            }

            Ok(self.receipt(
                DistributionMode::TokenPooled,
                caller,
                batch,
                total,
                U256::zero(),
                batch.len() + 1,
            ))
        });

        self.log_outcome(&result);
        result
    }

    /// Distribute tokens straight from the caller to each recipient.
    ///
    /// The distributor never holds the tokens; the ledger checks the
    /// caller's approval on every leg.
    pub fn distribute_token_direct<L: Ledger + ?Sized>(
        &self,
        ledger: &mut L,
        caller: Address,
        recipients: &[Address],
        amounts: &[U256],
    ) -> Result<Receipt, DisperseError> {
        let _entered = self.guard.enter()?;
        info!(
            "Direct token distribution from {:?}: {} recipients",
            caller,
            recipients.len()
        );

        let batch = self.validator.validate(caller, recipients, amounts)?;
        let total = batch.total()?;

        let result: Result<Receipt, DisperseError> = atomically(ledger, |ledger| {
            for (index, (recipient, amount)) in batch.legs().enumerate() {
                checked_move(ledger, Some(self.address), caller, recipient, amount)?;
                debug!("Leg {}: moved {} from {:?} to {:?}", index, amount, caller, recipient);
            }

            Ok(self.receipt(
                DistributionMode::TokenDirect,
                caller,
                batch,
                total,
                U256::zero(),
                batch.len(),
            ))
        });

        self.log_outcome(&result);
        result
    }

    fn receipt(
        &self,
        mode: DistributionMode,
        caller: Address,
        batch: Batch<'_>,
        total: U256,
        refunded: U256,
        transfers: usize,
    ) -> Receipt {
        Receipt {
            mode,
            caller,
            recipients: batch.len(),
            total,
            refunded,
            transfers,
            timestamp: chrono::Utc::now().timestamp() as u64,
        }
    }

    fn log_outcome(&self, result: &Result<Receipt, DisperseError>) {
        match result {
            Ok(receipt) => info!(
                "{:?} distribution committed: {} legs, total {}",
                receipt.mode, receipt.recipients, receipt.total
            ),
            Err(err) => warn!("Distribution reverted: {}", err),
        }
    }
}

/// Move tokens through the ledger and verify both sides of the movement:
/// `from` was debited and `to` credited exactly `amount`, reading balances
/// fresh before and after.
///
/// `spender` selects `transfer_from`; `None` makes `from` send its own tokens.
fn checked_move<L: Ledger + ?Sized>(
    ledger: &mut L,
    spender: Option<Address>,
    from: Address,
    to: Address,
    amount: U256,
) -> Result<(), DisperseError> {
    let from_before = ledger.balance_of(from);
    let to_before = ledger.balance_of(to);
    match spender {
        Some(spender) => ledger.transfer_from(spender, from, to, amount)?,
        None => ledger.transfer(from, to, amount)?,
    }
    let from_after = ledger.balance_of(from);
    let to_after = ledger.balance_of(to);

    // A self-transfer leaves the balance where it was.
    let expected = if from == to { U256::zero() } else { amount };
    verify_delta(to, expected, to_before, to_after)?;
    verify_delta(from, expected, from_after, from_before)?;
    Ok(())
}

/// `high - low` must equal `expected`.
fn verify_delta(
    account: Address,
    expected: U256,
    low: U256,
    high: U256,
) -> Result<(), DisperseError> {
    let moved = high.checked_sub(low);
    if moved != Some(expected) {
        return Err(TransferError::AccountingMismatch {
            account,
            expected,
            moved: moved.unwrap_or_default(),
        }
        .into());
    }
    Ok(())
}
