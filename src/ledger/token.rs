use super::Ledger;
use crate::error::LedgerError;
use crate::state::{Checkpoint, Journaled, JournaledMap};
use ethers::types::{Address, U256};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum Slot {
    Balance(Address),
    Allowance { owner: Address, spender: Address },
}

/// In-memory fungible token with balances and allowances.
///
/// An allowance of `U256::MAX` is unlimited and never decremented.
#[derive(Debug, Clone)]
pub struct TokenLedger {
    address: Address,
    symbol: String,
    slots: JournaledMap<Slot>,
}

impl TokenLedger {
    pub fn new(address: Address, symbol: impl Into<String>) -> Self {
        Self {
            address,
            symbol: symbol.into(),
            slots: JournaledMap::new(),
        }
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn mint(&mut self, account: Address, amount: U256) -> Result<(), LedgerError> {
        let balance = self
            .balance_of(account)
            .checked_add(amount)
            .ok_or(LedgerError::BalanceOverflow { account })?;
        self.slots.set(Slot::Balance(account), balance);
        Ok(())
    }

    pub fn approve(&mut self, owner: Address, spender: Address, amount: U256) {
        self.slots.set(Slot::Allowance { owner, spender }, amount);
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.slots.get(&Slot::Allowance { owner, spender })
    }

    fn move_tokens(&mut self, from: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
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
        self.slots.set(Slot::Balance(from), remaining);
        self.slots.set(Slot::Balance(to), credited);
        Ok(())
    }
}

impl Ledger for TokenLedger {
    fn balance_of(&self, account: Address) -> U256 {
        self.slots.get(&Slot::Balance(account))
    }

    fn transfer(&mut self, sender: Address, to: Address, amount: U256) -> Result<(), LedgerError> {
        self.move_tokens(sender, to, amount)
    }

    fn transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), LedgerError> {
        let approved = self.allowance(from, spender);
        let remaining = approved
            .checked_sub(amount)
            .ok_or(LedgerError::InsufficientAllowance {
                owner: from,
                spender,
                required: amount,
                approved,
            })?;

        self.move_tokens(from, to, amount)?;
        if approved != U256::MAX {
            self.slots.set(Slot::Allowance { owner: from, spender }, remaining);
        }
        Ok(())
    }
}

impl Journaled for TokenLedger {
    fn checkpoint(&mut self) -> Checkpoint {
        self.slots.checkpoint()
    }

    fn commit(&mut self, checkpoint: Checkpoint) {
        self.slots.commit(checkpoint)
    }

    fn revert(&mut self, checkpoint: Checkpoint) {
        self.slots.revert(checkpoint)
    }
}
