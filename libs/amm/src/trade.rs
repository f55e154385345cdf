//! Trade simulation along a route
//!
//! ## Purpose
//!
//! Push a fixed boundary amount through each hop of a [`Route`], forward for
//! exact-input trades and backward for exact-output trades, and derive the
//! realized execution price, the post-trade mid price and the price impact.
//!
//! Native currency at either end is wrapped for the pool math and unwrapped again
//! in the reported amounts.

use pairswap_types::{ChainId, Currency, CurrencyAmount, Fraction, Percent, Price, TokenAmount};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::AmmContext;
use crate::error::{AmmError, Result};
use crate::pair::Pair;
use crate::route::{wrapped_currency, Route};

/// Which side of the trade is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TradeType {
    ExactInput,
    ExactOutput,
}

/// Relative shortfall of `output` against the exact quote at `mid_price`
pub fn compute_price_impact(
    mid_price: &Price,
    input_amount: &CurrencyAmount,
    output_amount: &CurrencyAmount,
) -> Result<Percent> {
    let exact_quote = mid_price
        .raw()
        .multiply(&Fraction::from_integer(input_amount.raw().clone()));
    let slippage = exact_quote
        .subtract(&Fraction::from_integer(output_amount.raw().clone()))
        .divide(&exact_quote)?;
    Ok(Percent::from(slippage))
}

/// Token amount the pools see for a boundary amount
pub(crate) fn wrapped_amount(
    ctx: &AmmContext,
    amount: &CurrencyAmount,
    chain_id: ChainId,
) -> Result<TokenAmount> {
    let token = wrapped_currency(ctx, amount.currency(), chain_id)?;
    Ok(TokenAmount::new(token, amount.raw().clone())?)
}

/// Reported amount for a route end: native stays native
fn unwrapped_amount(end: &Currency, amount: TokenAmount) -> Result<CurrencyAmount> {
    if end.is_native() {
        Ok(CurrencyAmount::native(amount.raw().clone())?)
    } else {
        Ok(amount.into())
    }
}

/// Simulated swap through a route
#[derive(Debug, Clone)]
pub struct Trade {
    route: Route,
    trade_type: TradeType,
    input_amount: CurrencyAmount,
    output_amount: CurrencyAmount,
    execution_price: Price,
    next_mid_price: Price,
    price_impact: Percent,
}

impl Trade {
    pub fn exact_in(ctx: &AmmContext, route: Route, amount_in: CurrencyAmount) -> Result<Self> {
        Self::new(ctx, route, amount_in, TradeType::ExactInput)
    }

    pub fn exact_out(ctx: &AmmContext, route: Route, amount_out: CurrencyAmount) -> Result<Self> {
        Self::new(ctx, route, amount_out, TradeType::ExactOutput)
    }

    /// `amount` is the fixed side: route input for exact-input, route output otherwise
    pub fn new(
        ctx: &AmmContext,
        route: Route,
        amount: CurrencyAmount,
        trade_type: TradeType,
    ) -> Result<Self> {
        let expected = match trade_type {
            TradeType::ExactInput => route.input(),
            TradeType::ExactOutput => route.output(),
        };
        if amount.currency() != expected {
            return Err(AmmError::CurrencyMismatch {
                expected: expected.to_string(),
                found: amount.currency().to_string(),
            });
        }

        let hops = route.pairs().len();
        let boundary = wrapped_amount(ctx, &amount, route.chain_id())?;
        let mut next_pairs: Vec<Pair> = Vec::with_capacity(hops);
        let (input_amount, output_amount) = match trade_type {
            TradeType::ExactInput => {
                let mut current = boundary;
                for pair in route.pairs() {
                    let (output, next) = pair.get_output_amount(&current)?;
                    next_pairs.push(next);
                    current = output;
                }
                (amount, unwrapped_amount(route.output(), current)?)
            }
            TradeType::ExactOutput => {
                let mut current = boundary;
                for pair in route.pairs().iter().rev() {
                    let (input, next) = pair.get_input_amount(&current)?;
                    next_pairs.push(next);
                    current = input;
                }
                next_pairs.reverse();
                (unwrapped_amount(route.input(), current)?, amount)
            }
        };

        let execution_price = Price::new(
            input_amount.currency().clone(),
            output_amount.currency().clone(),
            input_amount.raw().clone(),
            output_amount.raw().clone(),
        )?;
        let next_route = Route::new(ctx, next_pairs, route.input().clone(), None)?;
        let next_mid_price = next_route.mid_price().clone();
        let price_impact = compute_price_impact(route.mid_price(), &input_amount, &output_amount)?;

        debug!(
            ?trade_type,
            hops,
            input = %input_amount,
            output = %output_amount,
            impact = %price_impact,
            "Simulated trade"
        );
        Ok(Self {
            route,
            trade_type,
            input_amount,
            output_amount,
            execution_price,
            next_mid_price,
            price_impact,
        })
    }

    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn trade_type(&self) -> TradeType {
        self.trade_type
    }

    pub fn input_amount(&self) -> &CurrencyAmount {
        &self.input_amount
    }

    pub fn output_amount(&self) -> &CurrencyAmount {
        &self.output_amount
    }

    /// Realized output per unit of input
    pub fn execution_price(&self) -> &Price {
        &self.execution_price
    }

    /// Mid price of the route after this trade settles
    pub fn next_mid_price(&self) -> &Price {
        &self.next_mid_price
    }

    pub fn price_impact(&self) -> &Percent {
        &self.price_impact
    }

    fn slippage_factor(slippage_tolerance: &Percent) -> Result<Fraction> {
        if slippage_tolerance.as_fraction().less_than(&Fraction::from_integer(0)) {
            return Err(AmmError::NegativeSlippage);
        }
        Ok(Fraction::from_integer(1).add(slippage_tolerance.as_fraction()))
    }

    /// Least output acceptable under `slippage_tolerance`
    pub fn minimum_amount_out(&self, slippage_tolerance: &Percent) -> Result<CurrencyAmount> {
        let factor = Self::slippage_factor(slippage_tolerance)?;
        match self.trade_type {
            TradeType::ExactOutput => Ok(self.output_amount.clone()),
            TradeType::ExactInput => {
                let raw = factor
                    .invert()?
                    .multiply(&Fraction::from_integer(self.output_amount.raw().clone()))
                    .quotient();
                Ok(self.output_amount.with_raw(raw)?)
            }
        }
    }

    /// Most input acceptable under `slippage_tolerance`; floors the scaled input
    pub fn maximum_amount_in(&self, slippage_tolerance: &Percent) -> Result<CurrencyAmount> {
        let factor = Self::slippage_factor(slippage_tolerance)?;
        match self.trade_type {
            TradeType::ExactInput => Ok(self.input_amount.clone()),
            TradeType::ExactOutput => {
                let raw = factor
                    .multiply(&Fraction::from_integer(self.input_amount.raw().clone()))
                    .quotient();
                Ok(self.input_amount.with_raw(raw)?)
            }
        }
    }
}
