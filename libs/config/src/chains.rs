//! Per-chain deployment table
//!
//! Each supported chain has one constant-product factory, the keccak hash of the
//! pool contract's creation code (for CREATE2 address derivation), the router the
//! swap calls are sent to, and the wrapped form of the native coin.

use pairswap_types::{Address, ChainId, Hash256, Token};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{ConfigError, Result};

/// Wrapped native coin of a chain (WETH, WBNB, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedNative {
    pub address: Address,
    pub decimals: u8,
    pub symbol: String,
    pub name: String,
}

/// Deployment addresses for one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    pub factory: Address,
    pub init_code_hash: Hash256,
    pub router: Address,
    pub wrapped_native: WrappedNative,
}

impl ChainConfig {
    pub fn wrapped_native_token(&self, chain_id: ChainId) -> Token {
        Token::new(chain_id, self.wrapped_native.address, self.wrapped_native.decimals)
            .with_symbol(self.wrapped_native.symbol.clone())
            .with_name(self.wrapped_native.name.clone())
    }
}

const V2_FACTORY: Address = Address::from_hex_const("0x5C69bEe701ef814a2B6a3EDD4B1652CB9cc5aA6f");
const V2_INIT_CODE_HASH: Hash256 =
    Hash256::from_hex_const("0x96e8ac4277198ff8b6f785478aa9a39f403cb768dd02cbee326c3e7da348845f");
const V2_ROUTER: Address = Address::from_hex_const("0x7a250d5630B4cF539739dF2C5dAcb4c659F2488D");

const BSC_FACTORY: Address = Address::from_hex_const("0xca143ce32fe78f1f7019d7d551a6402fc5350c73");
const BSC_INIT_CODE_HASH: Hash256 =
    Hash256::from_hex_const("0x0d9dc583e4e7ff700fe6e06c8dc012fd0e26c11ac8f2e4f556c6b3d407ecb1c6");
const BSC_ROUTER: Address = Address::from_hex_const("0x10ED43C718714eb63d5aA57B78B54704E256024E");

// BSC testnet and Sepolia share one factory/router deployment
const TESTNET_FACTORY: Address = Address::from_hex_const("0x897630E3EFCC6B5043B666430c0a68776E11c198");
const TESTNET_ROUTER: Address = Address::from_hex_const("0x7A8ba8b98eE2B67d157637C9Bce8535b7CA87761");
const BSC_TESTNET_INIT_CODE_HASH: Hash256 =
    Hash256::from_hex_const("0xbf90f78951f8fd91390a1bcc642674d457d217fecec1aae078a09309cf3af6e1");
const SEPOLIA_INIT_CODE_HASH: Hash256 =
    Hash256::from_hex_const("0x09faf0db2abc7be63b2dda8a616404b1d7ddcbd4808dbc637ba037f57c88a696");

const WETH: Address = Address::from_hex_const("0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2");
const WBNB: Address = Address::from_hex_const("0xbb4CdB9CBd36B01bD1cBaEBF2De08d9173bc095c");
const WBNB_TESTNET: Address = Address::from_hex_const("0xae13d989daC2f0dEbFf460aC112a837C89BAa7cd");
const WETH_SEPOLIA: Address = Address::from_hex_const("0xfFf9976782d46CC05630D1f6eBAb18b2324d6B14");

fn wrapped(address: Address, symbol: &str, name: &str) -> WrappedNative {
    WrappedNative {
        address,
        decimals: 18,
        symbol: symbol.to_string(),
        name: name.to_string(),
    }
}

/// Lookup table from chain id to deployment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChainRegistry {
    chains: HashMap<ChainId, ChainConfig>,
}

impl ChainRegistry {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Mainnet and testnet deployments known at build time
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.insert(
            ChainId::ETHEREUM,
            ChainConfig {
                factory: V2_FACTORY,
                init_code_hash: V2_INIT_CODE_HASH,
                router: V2_ROUTER,
                wrapped_native: wrapped(WETH, "WETH", "Wrapped Ether"),
            },
        );
        registry.insert(
            ChainId::BSC,
            ChainConfig {
                factory: BSC_FACTORY,
                init_code_hash: BSC_INIT_CODE_HASH,
                router: BSC_ROUTER,
                wrapped_native: wrapped(WBNB, "WBNB", "Wrapped BNB"),
            },
        );
        registry.insert(
            ChainId::BSC_TESTNET,
            ChainConfig {
                factory: TESTNET_FACTORY,
                init_code_hash: BSC_TESTNET_INIT_CODE_HASH,
                router: TESTNET_ROUTER,
                wrapped_native: wrapped(WBNB_TESTNET, "WBNB", "Wrapped BNB"),
            },
        );
        registry.insert(
            ChainId::SEPOLIA,
            ChainConfig {
                factory: TESTNET_FACTORY,
                init_code_hash: SEPOLIA_INIT_CODE_HASH,
                router: TESTNET_ROUTER,
                wrapped_native: wrapped(WETH_SEPOLIA, "WETH", "Wrapped Ether"),
            },
        );
        registry
    }

    /// Add or replace a chain, returning the previous entry
    pub fn insert(&mut self, chain_id: ChainId, config: ChainConfig) -> Option<ChainConfig> {
        self.chains.insert(chain_id, config)
    }

    pub fn get(&self, chain_id: ChainId) -> Result<&ChainConfig> {
        self.chains
            .get(&chain_id)
            .ok_or(ConfigError::UnknownChain(chain_id))
    }

    pub fn contains(&self, chain_id: ChainId) -> bool {
        self.chains.contains_key(&chain_id)
    }

    pub fn wrapped_native(&self, chain_id: ChainId) -> Result<Token> {
        Ok(self.get(chain_id)?.wrapped_native_token(chain_id))
    }

    /// Registered chains in ascending order
    pub fn chain_ids(&self) -> Vec<ChainId> {
        let mut ids: Vec<ChainId> = self.chains.keys().copied().collect();
        ids.sort();
        ids
    }

    /// Overlay `other` on top of `self`; entries in `other` win
    pub fn merge(mut self, other: ChainRegistry) -> Self {
        self.chains.extend(other.chains);
        self
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = (&ChainId, &ChainConfig)> {
        self.chains.iter()
    }
}
