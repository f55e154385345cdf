//! Best-path search over a set of candidate pairs
//!
//! ## Purpose
//!
//! Depth-first enumeration of every simple path (no pair used twice) of at most
//! `max_hops` pairs between two currencies, keeping only the best
//! `max_num_results` trades in a sorted, bounded list.
//!
//! ## Cost
//!
//! The number of explored paths grows as `P!/(P-H)!` for `P` pairs and `H` hops.
//! Searches whose worst case exceeds [`SEARCH_WARN_PATH_BOUND`] are logged at
//! `warn` so callers can prune their candidate sets.
//!
//! ## Failure Policy
//!
//! A pair that cannot serve the hop (empty reserves or a zero-output swap) is
//! skipped. Any other error aborts the search and discards partial results.

use pairswap_types::{ChainId, Currency, CurrencyAmount, Token, TokenAmount};
use std::cmp::Ordering;
use tracing::{debug, warn};

use crate::context::AmmContext;
use crate::error::{AmmError, Result};
use crate::pair::Pair;
use crate::route::{wrapped_currency, Route};
use crate::trade::{wrapped_amount, Trade, TradeType};

/// Worst-case path count above which a search is flagged
pub const SEARCH_WARN_PATH_BOUND: u64 = 100_000;

/// Limits for [`Trade::best_trade_exact_in`] and [`Trade::best_trade_exact_out`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BestTradeOptions {
    pub max_num_results: usize,
    pub max_hops: usize,
}

impl Default for BestTradeOptions {
    fn default() -> Self {
        Self {
            max_num_results: 3,
            max_hops: 3,
        }
    }
}

impl BestTradeOptions {
    fn validate(&self) -> Result<()> {
        if self.max_num_results == 0 {
            return Err(AmmError::InvalidOptions("max_num_results must be positive".into()));
        }
        if self.max_hops == 0 {
            return Err(AmmError::InvalidOptions("max_hops must be positive".into()));
        }
        Ok(())
    }
}

/// Anything with an input and an output amount
pub trait InputOutput {
    fn input_amount(&self) -> &CurrencyAmount;
    fn output_amount(&self) -> &CurrencyAmount;
}

impl InputOutput for Trade {
    fn input_amount(&self) -> &CurrencyAmount {
        Trade::input_amount(self)
    }

    fn output_amount(&self) -> &CurrencyAmount {
        Trade::output_amount(self)
    }
}

/// Larger output first; equal outputs order by smaller input.
///
/// Both sides must share input and output currencies.
pub fn input_output_comparator<T: InputOutput>(a: &T, b: &T) -> Ordering {
    debug_assert_eq!(a.input_amount().currency(), b.input_amount().currency());
    debug_assert_eq!(a.output_amount().currency(), b.output_amount().currency());

    let (a_out, b_out) = (a.output_amount(), b.output_amount());
    if a_out.equal_to(b_out) {
        let (a_in, b_in) = (a.input_amount(), b.input_amount());
        if a_in.equal_to(b_in) {
            Ordering::Equal
        } else if a_in.less_than(b_in) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    } else if a_out.less_than(b_out) {
        Ordering::Greater
    } else {
        Ordering::Less
    }
}

/// Amounts first, then lower price impact, then fewer hops
pub fn trade_comparator(a: &Trade, b: &Trade) -> Ordering {
    input_output_comparator(a, b)
        .then_with(|| {
            a.price_impact()
                .partial_cmp(b.price_impact())
                .unwrap_or(Ordering::Equal)
        })
        .then_with(|| a.route().path().len().cmp(&b.route().path().len()))
}

/// Insert `add` into the sorted, bounded `items`.
///
/// Returns the item that fell off the end: the previous worst entry, or `add`
/// itself when the list is full and `add` is no better than the worst.
pub fn sorted_insert<T>(
    items: &mut Vec<T>,
    add: T,
    max_size: usize,
    comparator: impl Fn(&T, &T) -> Ordering,
) -> Option<T> {
    debug_assert!(max_size > 0);
    debug_assert!(items.len() <= max_size);

    let full = items.len() >= max_size;
    if full {
        if let Some(last) = items.last() {
            if comparator(last, &add) != Ordering::Greater {
                return Some(add);
            }
        }
    }

    let (mut lo, mut hi) = (0, items.len());
    while lo < hi {
        let mid = (lo + hi) / 2;
        if comparator(&items[mid], &add) != Ordering::Greater {
            lo = mid + 1;
        } else {
            hi = mid;
        }
    }
    items.insert(lo, add);

    if full {
        items.pop()
    } else {
        None
    }
}

/// Upper bound on explored paths: sum over `h` of `P!/(P-h)!`
pub fn worst_case_paths(pair_count: usize, max_hops: usize) -> u64 {
    let mut total: u64 = 0;
    let mut permutations: u64 = 1;
    for h in 0..max_hops.min(pair_count) {
        permutations = permutations.saturating_mul((pair_count - h) as u64);
        total = total.saturating_add(permutations);
    }
    total
}

fn search_chain_id(fixed: &CurrencyAmount, other: &Currency) -> Result<ChainId> {
    fixed
        .currency()
        .as_token()
        .or_else(|| other.as_token())
        .map(|token| token.chain_id)
        .ok_or(AmmError::NativeInAndOut)
}

fn flag_explosion(pairs: &[Pair], options: &BestTradeOptions) {
    let bound = worst_case_paths(pairs.len(), options.max_hops);
    if bound > SEARCH_WARN_PATH_BOUND {
        warn!(
            pairs = pairs.len(),
            max_hops = options.max_hops,
            worst_case_paths = bound,
            "Best-trade search may explore a very large number of paths"
        );
    }
}

/// Shared depth-first state for one search
struct Search<'a> {
    ctx: &'a AmmContext,
    pairs: &'a [Pair],
    options: BestTradeOptions,
    /// Input currency for exact-out, output currency for exact-in
    target_currency: &'a Currency,
    target_token: Token,
    fixed_amount: &'a CurrencyAmount,
    used: Vec<bool>,
    /// Indices of pairs on the current path, in visiting order
    stack: Vec<usize>,
    best: Vec<Trade>,
}

impl<'a> Search<'a> {
    fn new(
        ctx: &'a AmmContext,
        pairs: &'a [Pair],
        options: BestTradeOptions,
        fixed_amount: &'a CurrencyAmount,
        target_currency: &'a Currency,
        target_token: Token,
    ) -> Self {
        Self {
            ctx,
            pairs,
            options,
            target_currency,
            target_token,
            fixed_amount,
            used: vec![false; pairs.len()],
            stack: Vec::with_capacity(options.max_hops),
            best: Vec::with_capacity(options.max_num_results),
        }
    }

    fn remaining(&self) -> usize {
        self.pairs.len() - self.stack.len()
    }

    fn insert(&mut self, trade: Trade) {
        sorted_insert(&mut self.best, trade, self.options.max_num_results, trade_comparator);
    }

    fn skip(&self, index: usize, error: &AmmError) {
        debug!(pair = %self.pairs[index].liquidity_token().address, %error, "Skipping pair");
    }

    fn explore_forward(&mut self, amount_in: &TokenAmount, hops_left: usize) -> Result<()> {
        let pairs = self.pairs;
        for (i, pair) in pairs.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if !pair.involves_token(amount_in.token()) {
                continue;
            }
            if pair.reserve0().is_zero() || pair.reserve1().is_zero() {
                continue;
            }

            let amount_out = match pair.get_output_amount(amount_in) {
                Ok((amount_out, _)) => amount_out,
                Err(error) if error.is_recoverable() => {
                    self.skip(i, &error);
                    continue;
                }
                Err(error) => return Err(error),
            };

            if amount_out.token() == &self.target_token {
                let route_pairs = self
                    .stack
                    .iter()
                    .chain(std::iter::once(&i))
                    .map(|&j| self.pairs[j].clone())
                    .collect();
                let route = Route::new(
                    self.ctx,
                    route_pairs,
                    self.fixed_amount.currency().clone(),
                    Some(self.target_currency.clone()),
                )?;
                let trade = Trade::new(self.ctx, route, self.fixed_amount.clone(), TradeType::ExactInput)?;
                self.insert(trade);
            } else if hops_left > 1 && self.remaining() > 1 {
                self.used[i] = true;
                self.stack.push(i);
                let result = self.explore_forward(&amount_out, hops_left - 1);
                self.stack.pop();
                self.used[i] = false;
                result?;
            }
        }
        Ok(())
    }

    fn explore_backward(&mut self, amount_out: &TokenAmount, hops_left: usize) -> Result<()> {
        let pairs = self.pairs;
        for (i, pair) in pairs.iter().enumerate() {
            if self.used[i] {
                continue;
            }
            if !pair.involves_token(amount_out.token()) {
                continue;
            }
            if pair.reserve0().is_zero() || pair.reserve1().is_zero() {
                continue;
            }

            let amount_in = match pair.get_input_amount(amount_out) {
                Ok((amount_in, _)) => amount_in,
                Err(error) if error.is_recoverable() => {
                    self.skip(i, &error);
                    continue;
                }
                Err(error) => return Err(error),
            };

            if amount_in.token() == &self.target_token {
                // the stack holds pairs from the output side inward
                let route_pairs = std::iter::once(&i)
                    .chain(self.stack.iter().rev())
                    .map(|&j| self.pairs[j].clone())
                    .collect();
                let route = Route::new(
                    self.ctx,
                    route_pairs,
                    self.target_currency.clone(),
                    Some(self.fixed_amount.currency().clone()),
                )?;
                let trade = Trade::new(self.ctx, route, self.fixed_amount.clone(), TradeType::ExactOutput)?;
                self.insert(trade);
            } else if hops_left > 1 && self.remaining() > 1 {
                self.used[i] = true;
                self.stack.push(i);
                let result = self.explore_backward(&amount_in, hops_left - 1);
                self.stack.pop();
                self.used[i] = false;
                result?;
            }
        }
        Ok(())
    }
}

impl Trade {
    /// Best trades spending exactly `amount_in`, best first
    pub fn best_trade_exact_in(
        ctx: &AmmContext,
        pairs: &[Pair],
        amount_in: &CurrencyAmount,
        currency_out: &Currency,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        options.validate()?;
        if pairs.is_empty() {
            return Err(AmmError::NoCandidatePairs);
        }
        let chain_id = search_chain_id(amount_in, currency_out)?;
        flag_explosion(pairs, &options);

        let start = wrapped_amount(ctx, amount_in, chain_id)?;
        let token_out = wrapped_currency(ctx, currency_out, chain_id)?;
        let mut search = Search::new(ctx, pairs, options, amount_in, currency_out, token_out);
        search.explore_forward(&start, options.max_hops)?;

        debug!(pairs = pairs.len(), found = search.best.len(), "Exact-input search finished");
        Ok(search.best)
    }

    /// Best trades receiving exactly `amount_out`, best first
    pub fn best_trade_exact_out(
        ctx: &AmmContext,
        pairs: &[Pair],
        currency_in: &Currency,
        amount_out: &CurrencyAmount,
        options: BestTradeOptions,
    ) -> Result<Vec<Trade>> {
        options.validate()?;
        if pairs.is_empty() {
            return Err(AmmError::NoCandidatePairs);
        }
        let chain_id = search_chain_id(amount_out, currency_in)?;
        flag_explosion(pairs, &options);

        let start = wrapped_amount(ctx, amount_out, chain_id)?;
        let token_in = wrapped_currency(ctx, currency_in, chain_id)?;
        let mut search = Search::new(ctx, pairs, options, amount_out, currency_in, token_in);
        search.explore_backward(&start, options.max_hops)?;

        debug!(pairs = pairs.len(), found = search.best.len(), "Exact-output search finished");
        Ok(search.best)
    }
}
