//! Currencies: the chain's native coin or an ERC-20 style token
//!
//! [`Currency`] is a tagged variant compared structurally. Tokens are identified by
//! `(chain_id, address)` alone; symbol, name and even decimals are metadata.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

use crate::errors::TypesError;
use crate::identifiers::{Address, ChainId};

/// Decimals of every chain's native coin
pub const NATIVE_DECIMALS: u8 = 18;

const NATIVE_SYMBOL: &str = "ETH";
const NATIVE_NAME: &str = "Ether";

/// Token deployed at a fixed address on one chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Token {
    pub chain_id: ChainId,
    pub address: Address,
    pub decimals: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Token {
    pub fn new(chain_id: ChainId, address: Address, decimals: u8) -> Self {
        Self {
            chain_id,
            address,
            decimals,
            symbol: None,
            name: None,
        }
    }

    pub fn with_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.symbol = Some(symbol.into());
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// True when `self` is `token0` of a pool holding both tokens.
    ///
    /// Fails if the tokens live on different chains or share an address.
    pub fn sorts_before(&self, other: &Token) -> Result<bool, TypesError> {
        if self.chain_id != other.chain_id {
            return Err(TypesError::ChainIdMismatch {
                left: self.chain_id,
                right: other.chain_id,
            });
        }
        if self.address == other.address {
            return Err(TypesError::IdenticalAddresses);
        }
        Ok(self.address < other.address)
    }
}

impl PartialEq for Token {
    fn eq(&self, other: &Self) -> bool {
        self.chain_id == other.chain_id && self.address == other.address
    }
}

impl Eq for Token {}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.chain_id.hash(state);
        self.address.hash(state);
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.symbol {
            Some(symbol) => write!(f, "{symbol}"),
            None => write!(f, "{}", self.address),
        }
    }
}

/// Native coin or token
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Currency {
    Native,
    Token(Token),
}

impl Currency {
    pub fn decimals(&self) -> u8 {
        match self {
            Currency::Native => NATIVE_DECIMALS,
            Currency::Token(token) => token.decimals,
        }
    }

    pub fn symbol(&self) -> Option<&str> {
        match self {
            Currency::Native => Some(NATIVE_SYMBOL),
            Currency::Token(token) => token.symbol.as_deref(),
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            Currency::Native => Some(NATIVE_NAME),
            Currency::Token(token) => token.name.as_deref(),
        }
    }

    pub fn is_native(&self) -> bool {
        matches!(self, Currency::Native)
    }

    pub fn as_token(&self) -> Option<&Token> {
        match self {
            Currency::Native => None,
            Currency::Token(token) => Some(token),
        }
    }
}

impl From<Token> for Currency {
    fn from(token: Token) -> Self {
        Currency::Token(token)
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Currency::Native => f.write_str(NATIVE_SYMBOL),
            Currency::Token(token) => token.fmt(f),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(last: u8) -> Address {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Address::from_bytes(bytes)
    }

    #[test]
    fn test_token_equality_ignores_metadata() {
        let a = Token::new(ChainId::ETHEREUM, addr(1), 18).with_symbol("A");
        let b = Token::new(ChainId::ETHEREUM, addr(1), 6).with_name("Other");
        assert_eq!(a, b);

        let other_chain = Token::new(ChainId::BSC, addr(1), 18);
        assert_ne!(a, other_chain);
    }

    #[test]
    fn test_sorts_before() {
        let a = Token::new(ChainId::ETHEREUM, addr(1), 18);
        let b = Token::new(ChainId::ETHEREUM, addr(2), 18);
        assert!(a.sorts_before(&b).unwrap());
        assert!(!b.sorts_before(&a).unwrap());
    }

    #[test]
    fn test_sorts_before_rejects_invalid_pairs() {
        let a = Token::new(ChainId::ETHEREUM, addr(1), 18);
        assert_eq!(a.sorts_before(&a.clone()).unwrap_err(), TypesError::IdenticalAddresses);

        let b = Token::new(ChainId::BSC, addr(2), 18);
        assert!(matches!(
            a.sorts_before(&b),
            Err(TypesError::ChainIdMismatch { .. })
        ));
    }

    #[test]
    fn test_native_currency() {
        let native = Currency::Native;
        assert!(native.is_native());
        assert_eq!(native.decimals(), 18);
        assert_eq!(native.symbol(), Some("ETH"));
        assert_eq!(native.name(), Some("Ether"));
        assert!(native.as_token().is_none());
        assert_ne!(native, Currency::from(Token::new(ChainId::ETHEREUM, addr(1), 18)));
    }

    #[test]
    fn test_currency_serde_tagged() {
        let token = Token::new(ChainId::ETHEREUM, addr(3), 6).with_symbol("USDC");
        let json = serde_json::to_string(&Currency::from(token.clone())).unwrap();
        assert!(json.contains("\"kind\":\"token\""));
        let back: Currency = serde_json::from_str(&json).unwrap();
        assert_eq!(back.as_token(), Some(&token));
        assert_eq!(back.symbol(), Some("USDC"));
    }
}
