use crate::error::LedgerError;
use crate::state::{Checkpoint, Journaled, JournaledMap};
use ethers::types::{Address, U256};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Code that runs when an address receives native value.
///
/// The hook gets the bank mid-transfer, so it can move value or call back into
/// a distributor it holds. Returning `Err` rejects the incoming transfer.
pub trait Receiver: Send + Sync {
    fn on_receive(&self, bank: &mut NativeBank, from: Address, amount: U256) -> Result<(), String>;
}

/// Native-asset balances of the execution environment.
#[derive(Default)]
pub struct NativeBank {
    balances: JournaledMap<Address>,
    receivers: HashMap<Address, Arc<dyn Receiver>>,
}

impl NativeBank {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: Address) -> U256 {
        self.balances.get(&account)
    }

    /// Credit new value to `account`.
    pub fn mint(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account })?;
        self.balances.set(account, balance);
        Ok(())
    }

    pub fn set_receiver(&mut self, account: Address, receiver: Arc<dyn Receiver>) {
        self.receivers.insert(account, receiver);
    }

    /// Move value between accounts without running any receiver.
    pub fn move_value(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            })?;
        if from == to {
            return Ok(());
        }

        let credited = self
            .balance_of(to)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account: to })?;
        self.balances.set(from, remaining);
        self.balances.set(to, credited);
        Ok(())
    }

    /// Move value to `to` and hand control to its receiver, if one is registered.
    ///
    /// The value has already moved when the receiver runs. A rejection leaves
    /// it moved; the enclosing checkpoint is what undoes it.
    pub fn push(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.move_value(from, to, amount)?;

        if let Some(receiver) = self.receivers.get(&to).cloned() {
            debug!("Running receiver of {:?} for {} from {:?}", to, amount, from);
            receiver
                .on_receive(self, from, amount)
                .map_err(|reason| LedgerError::RecipientRejected { recipient: to, reason })?;
        }
        Ok(())
    }
}

impl Journaled for NativeBank {
    fn checkpoint(&mut self) -> Checkpoint {
        self.balances.checkpoint()
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.balances.commit(checkpoint)
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        self.balances.revert(checkpoint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::atomically;

    struct Refuse;

    impl Receiver for Refuse {
        fn on_receive(&self, _: &mut NativeBank, _: Address, _: U256) -> Result<(), String> {
            Err("no thanks".to_string())
        }
    }

    #[test]
    fn push_moves_value_between_accounts() {
        let alice = Address::from_low_u64_be(1);
        let bob = Address::from_low_u64_be(2);
        let mut bank = NativeBank::new();
        bank.mint(alice, U256::from(50)).unwrap();

        bank.push(alice, bob, U256::from(20)).unwrap();

        assert_eq!(bank.balance_of(alice), U256::from(30));
        assert_eq!(bank.balance_of(bob), U256::from(20));
    }

    #[test]
    fn push_fails_on_insufficient_balance() {
        let alice = Address::from_low_u64_be(1);
        let bob = Address::from_low_u64_be(2);
        let mut bank = NativeBank::new();
        bank.mint(alice, U256::from(5)).unwrap();

        let err = bank.push(alice, bob, U256::from(6)).unwrap_err();
        assert!(matches!(err, LedgerError::InsufficientBalance { .. }));
        assert_eq!(bank.balance_of(alice), U256::from(5));
    }

    #[test]
    fn rejected_push_is_undone_by_enclosing_checkpoint() {
        let alice = Address::from_low_u64_be(1);
        let bob = Address::from_low_u64_be(2);
        let mut bank = NativeBank::new();
        bank.mint(alice, U256::from(10)).unwrap();
        bank.set_receiver(bob, Arc::new(Refuse));

        let result = atomically(&mut bank, |bank| bank.push(alice, bob, U256::from(10)));

        assert!(matches!(result, Err(LedgerError::RecipientRejected { .. })));
        assert_eq!(bank.balance_of(alice), U256::from(10));
        assert_eq!(bank.balance_of(bob), U256::zero());
    }
}
