use crate::config::Config;
use crate::ledger::TokenLedger;
use crate::state::NativeBank;
use ethers::types::Address;
use std::collections::HashMap;
use tracing::info;

/// Everything a distribution can touch: native balances plus every token
/// ledger the service knows, keyed by token address.
#[derive(Default)]
pub struct World {
    pub bank: NativeBank,
    pub tokens: HashMap<Address, TokenLedger>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the initial world from the `[[genesis]]` and `[[tokens]]` sections.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let mut world = Self::new();

        for account in &config.genesis {
            world.bank.mint(account.address, account.amount()?)?;
        }

        for token_config in &config.tokens {
            let mut token = TokenLedger::new(token_config.address, token_config.symbol.clone());
            for holder in &token_config.balances {
                token.mint(holder.address, holder.amount()?)?;
            }
            info!("Registered token {} at {:?}", token.symbol(), token.address());
            world.tokens.insert(token.address(), token);
        }

        Ok(world)
    }

    pub fn token_mut(&mut self, address: &Address) -> Option<&mut TokenLedger> {
        self.tokens.get_mut(address)
    }

    pub fn token(&self, address: &Address) -> Option<&TokenLedger> {
        self.tokens.get(address)
    }
}
