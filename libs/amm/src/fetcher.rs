//! Token and pair loading from an on-chain data source
//!
//! ## Purpose
//!
//! Builds [`Token`] and [`Pair`] values from whatever answers decimals and
//! reserve queries (an RPC client, an indexer, a test double). Token decimals
//! never change, so they are cached per `(chain, address)` for the lifetime of
//! the fetcher.
//!
//! ## Integration Points
//!
//! - **Input**: any [`PairDataSource`] implementation
//! - **Output**: validated [`Token`] and [`Pair`] values for routing and search

use dashmap::DashMap;
use num_bigint::BigInt;
use pairswap_types::{Address, ChainId, Token, TokenAmount};
use tracing::{debug, trace};

use crate::context::AmmContext;
use crate::error::{AmmError, Result};
use crate::pair::Pair;

/// Read access to token and pool state
#[async_trait::async_trait]
pub trait PairDataSource: Send + Sync {
    /// `decimals()` of the ERC-20 at `address`
    async fn token_decimals(&self, chain_id: ChainId, address: Address) -> Result<u8>;

    /// `getReserves()` of the pool at `pair_address`, in token0/token1 order
    async fn pair_reserves(&self, chain_id: ChainId, pair_address: Address) -> Result<(BigInt, BigInt)>;
}

/// Decimals of tokens whose `decimals()` call is known to misbehave
const KNOWN_DECIMALS: [(ChainId, Address, u8); 1] = [(
    ChainId::BSC,
    Address::from_hex_const("0xE0B7927c4aF23765Cb51314A0E0521A9645F0E2A"),
    9,
)];

pub struct Fetcher<S> {
    source: S,
    decimals: DashMap<(ChainId, Address), u8>,
}

impl<S: PairDataSource> Fetcher<S> {
    pub fn new(source: S) -> Self {
        let decimals = DashMap::new();
        for (chain_id, address, value) in KNOWN_DECIMALS {
            decimals.insert((chain_id, address), value);
        }
        Self { source, decimals }
    }

    /// Seed the decimals cache, skipping the source for `address`
    pub fn with_known_decimals(self, chain_id: ChainId, address: Address, decimals: u8) -> Self {
        self.decimals.insert((chain_id, address), decimals);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cached_decimals(&self, chain_id: ChainId, address: Address) -> Option<u8> {
        self.decimals.get(&(chain_id, address)).map(|entry| *entry)
    }

    /// Token with decimals from the cache or the source
    pub async fn fetch_token_data(
        &self,
        chain_id: ChainId,
        address: Address,
        symbol: Option<String>,
        name: Option<String>,
    ) -> Result<Token> {
        let decimals = match self.cached_decimals(chain_id, address) {
            Some(decimals) => {
                trace!(chain = %chain_id, %address, decimals, "Decimals cache hit");
                decimals
            }
            None => {
                let decimals = self.source.token_decimals(chain_id, address).await?;
                debug!(chain = %chain_id, %address, decimals, "Fetched token decimals");
                self.decimals.insert((chain_id, address), decimals);
                decimals
            }
        };

        let mut token = Token::new(chain_id, address, decimals);
        token.symbol = symbol;
        token.name = name;
        Ok(token)
    }

    /// Pair of `token_a` and `token_b` with current reserves
    pub async fn fetch_pair_data(&self, ctx: &AmmContext, token_a: &Token, token_b: &Token) -> Result<Pair> {
        if token_a.chain_id != token_b.chain_id {
            return Err(AmmError::ChainIdMismatch {
                expected: token_a.chain_id,
                found: token_b.chain_id,
            });
        }
        let address = Pair::address(ctx, token_a, token_b)?;
        let (reserve0, reserve1) = self.source.pair_reserves(token_a.chain_id, address).await?;
        debug!(chain = %token_a.chain_id, pair = %address, %reserve0, %reserve1, "Fetched reserves");

        let (balance_a, balance_b) = if token_a.sorts_before(token_b)? {
            (reserve0, reserve1)
        } else {
            (reserve1, reserve0)
        };
        Pair::new(
            ctx,
            TokenAmount::new(token_a.clone(), balance_a)?,
            TokenAmount::new(token_b.clone(), balance_b)?,
        )
    }
}
