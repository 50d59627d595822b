//! Configuration Module
//!
//! This module defines all configuration structures for the distribution service.
//! Configuration is loaded from TOML files and parsed using serde.

use anyhow::{Context, anyhow};
use ethers::types::{Address, U256};
use serde::Deserialize;
use std::fs;

/// Main configuration structure
///
/// Loaded from a TOML file (e.g., config/default.toml).
///
/// # Example TOML
/// ```toml
/// [api]
/// host = "127.0.0.1"
/// port = 8545
///
/// [distributor]
/// address = "0x000000000000000000000000000000000000d15e"
///
/// [[genesis]]
/// address = "0x0000000000000000000000000000000000000001"
/// balance = "1000000000000000000"
///
/// [[tokens]]
/// address = "0x00000000000000000000000000000000000070c0"
/// symbol = "MOCK"
///
/// [[tokens.balances]]
/// address = "0x0000000000000000000000000000000000000001"
/// balance = "0xffff"
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub api: ApiConfig,
    pub distributor: DistributorConfig,
    #[serde(default)]
    pub genesis: Vec<GenesisAccount>,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

/// API server configuration
///
/// # Fields
/// - `host`: IP address to bind to (e.g., "127.0.0.1" or "0.0.0.0")
/// - `port`: TCP port to listen on (e.g., 8545)
#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Address under which the distributor holds custody and receives approvals.
#[derive(Debug, Clone, Deserialize)]
pub struct DistributorConfig {
    pub address: Address,
}

/// Initial balance of one account.
///
/// `balance` is a decimal string, or hex with a `0x` prefix, so amounts wider
/// than a TOML integer can be written down.
#[derive(Debug, Clone, Deserialize)]
pub struct GenesisAccount {
    pub address: Address,
    pub balance: String,
}

/// A token ledger created at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenConfig {
    pub address: Address,
    pub symbol: String,
    #[serde(default)]
    pub balances: Vec<GenesisAccount>,
}

impl GenesisAccount {
    pub fn amount(&self) -> anyhow::Result<U256> {
        parse_amount(&self.balance)
            .with_context(|| format!("invalid balance for {:?}", self.address))
    }
}

/// Parse a decimal or `0x`-prefixed hex amount.
pub fn parse_amount(raw: &str) -> anyhow::Result<U256> {
    let raw = raw.trim();
    match raw.strip_prefix("0x") {
        Some(hex) => U256::from_str_radix(hex, 16).map_err(|e| anyhow!("{:?}: {:?}", raw, e)),
        None => U256::from_dec_str(raw).map_err(|e| anyhow!("{:?}: {:?}", raw, e)),
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    /// * `path` - Path to the TOML configuration file
    ///
    /// # Returns
    /// * `Ok(Config)` if the file was successfully loaded and parsed
    /// * `Err` if the file couldn't be read or the TOML is invalid
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config file {}", path))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }
}
