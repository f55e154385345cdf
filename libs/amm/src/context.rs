//! Shared state for pool math: chain deployments and the pool-address cache
//!
//! Pool addresses are a pure function of `(chain, token0, token1)`, so they are
//! memoized. The cache is owned by an [`AmmContext`] passed by reference rather
//! than living in a global, and it stops growing at a fixed capacity. Callers can
//! [`clear`](PairAddressCache::clear) it at any time.

use dashmap::DashMap;
use pairswap_config::{ChainConfig, ChainRegistry};
use pairswap_types::{Address, ChainId, Token};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{trace, warn};

use crate::error::Result;

/// Default number of cached pool addresses
pub const DEFAULT_PAIR_ADDRESS_CAPACITY: usize = 4096;

type PairKey = (ChainId, Address, Address);

/// Bounded, thread-safe memo of derived pool addresses
#[derive(Debug)]
pub struct PairAddressCache {
    entries: DashMap<PairKey, Address>,
    capacity: usize,
    saturated: AtomicBool,
}

impl PairAddressCache {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: DashMap::with_capacity(capacity.min(DEFAULT_PAIR_ADDRESS_CAPACITY)),
            capacity,
            saturated: AtomicBool::new(false),
        }
    }

    /// Cached address for an ordered token pair, if present
    pub fn get(&self, chain_id: ChainId, token0: Address, token1: Address) -> Option<Address> {
        self.entries
            .get(&(chain_id, token0, token1))
            .map(|entry| *entry)
    }

    /// Read-through lookup. Concurrent misses may compute the same address twice;
    /// the result is identical either way.
    pub fn get_or_insert_with(
        &self,
        chain_id: ChainId,
        token0: Address,
        token1: Address,
        compute: impl FnOnce() -> Address,
    ) -> Address {
        if let Some(address) = self.get(chain_id, token0, token1) {
            trace!(chain = %chain_id, %token0, %token1, "Pair address cache hit");
            return address;
        }

        let address = compute();
        if self.entries.len() < self.capacity {
            trace!(chain = %chain_id, %token0, %token1, pair = %address, "Pair address cache miss");
            self.entries.insert((chain_id, token0, token1), address);
        } else if !self.saturated.swap(true, Ordering::Relaxed) {
            warn!(
                capacity = self.capacity,
                "Pair address cache is full, new addresses will not be cached"
            );
        }
        address
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&self) {
        self.entries.clear();
        self.saturated.store(false, Ordering::Relaxed);
    }
}

impl Default for PairAddressCache {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_PAIR_ADDRESS_CAPACITY)
    }
}

/// Chain deployments plus the pool-address cache
#[derive(Debug)]
pub struct AmmContext {
    chains: ChainRegistry,
    pair_addresses: PairAddressCache,
}

impl AmmContext {
    pub fn new(chains: ChainRegistry) -> Self {
        Self {
            chains,
            pair_addresses: PairAddressCache::default(),
        }
    }

    /// Context over the built-in chain table
    pub fn builtin() -> Self {
        Self::new(ChainRegistry::builtin())
    }

    pub fn with_cache_capacity(mut self, capacity: usize) -> Self {
        self.pair_addresses = PairAddressCache::with_capacity(capacity);
        self
    }

    pub fn chains(&self) -> &ChainRegistry {
        &self.chains
    }

    pub fn chain(&self, chain_id: ChainId) -> Result<&ChainConfig> {
        Ok(self.chains.get(chain_id)?)
    }

    pub fn pair_addresses(&self) -> &PairAddressCache {
        &self.pair_addresses
    }

    pub fn wrapped_native(&self, chain_id: ChainId) -> Result<Token> {
        Ok(self.chains.wrapped_native(chain_id)?)
    }
}

impl Default for AmmContext {
    fn default() -> Self {
        Self::builtin()
    }
}
