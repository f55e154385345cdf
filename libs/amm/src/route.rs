//! Ordered chain of pairs from an input currency to an output currency

use pairswap_types::{ChainId, Currency, Price, Token};
use tracing::debug;

use crate::context::AmmContext;
use crate::error::{AmmError, Result};
use crate::pair::Pair;

/// Resolve a currency to the token pools actually hold
pub(crate) fn wrapped_currency(ctx: &AmmContext, currency: &Currency, chain_id: ChainId) -> Result<Token> {
    match currency {
        Currency::Token(token) => Ok(token.clone()),
        Currency::Native => ctx.wrapped_native(chain_id),
    }
}

/// Validated multi-hop path through pairs
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    pairs: Vec<Pair>,
    path: Vec<Token>,
    input: Currency,
    output: Currency,
    mid_price: Price,
}

impl Route {
    /// Build a route; `output` defaults to the last token of the walked path.
    ///
    /// The native currency on either end resolves to the chain's wrapped token.
    pub fn new(
        ctx: &AmmContext,
        pairs: Vec<Pair>,
        input: Currency,
        output: Option<Currency>,
    ) -> Result<Self> {
        let first = pairs.first().ok_or(AmmError::EmptyRoute)?;
        let chain_id = first.chain_id();
        if let Some(other) = pairs.iter().find(|pair| pair.chain_id() != chain_id) {
            return Err(AmmError::ChainIdMismatch {
                expected: chain_id,
                found: other.chain_id(),
            });
        }

        let input_token = wrapped_currency(ctx, &input, chain_id)?;
        if !first.involves_token(&input_token) {
            return Err(AmmError::InputNotInRoute);
        }

        if let Some(output) = &output {
            let output_token = wrapped_currency(ctx, output, chain_id)?;
            let last = &pairs[pairs.len() - 1];
            if !last.involves_token(&output_token) {
                return Err(AmmError::OutputNotInRoute);
            }
        }

        let mut path = Vec::with_capacity(pairs.len() + 1);
        path.push(input_token);
        for (hop, pair) in pairs.iter().enumerate() {
            let next = pair
                .other_token(&path[hop])
                .map_err(|_| AmmError::DisconnectedPath { hop })?
                .clone();
            path.push(next);
        }

        let prices = pairs
            .iter()
            .zip(&path)
            .map(|(pair, token)| pair.price_of(token))
            .collect::<Result<Vec<Price>>>()?;
        let mid_price = Price::compose(&prices)?;

        let output = match output {
            Some(output) => output,
            None => Currency::Token(path[path.len() - 1].clone()),
        };

        debug!(chain = %chain_id, hops = pairs.len(), %input, %output, "Built route");
        Ok(Self {
            pairs,
            path,
            input,
            output,
            mid_price,
        })
    }

    pub fn pairs(&self) -> &[Pair] {
        &self.pairs
    }

    /// Tokens visited, `pairs().len() + 1` long
    pub fn path(&self) -> &[Token] {
        &self.path
    }

    pub fn input(&self) -> &Currency {
        &self.input
    }

    pub fn output(&self) -> &Currency {
        &self.output
    }

    /// Composed spot price of every hop, before any trade
    pub fn mid_price(&self) -> &Price {
        &self.mid_price
    }

    pub fn chain_id(&self) -> ChainId {
        self.pairs[0].chain_id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairswap_types::{Address, TokenAmount};

    fn token(last: u8) -> Token {
        let mut bytes = [0u8; 20];
        bytes[19] = last;
        Token::new(ChainId::ETHEREUM, Address::from_bytes(bytes), 18)
    }

    fn pair(ctx: &AmmContext, a: &Token, b: &Token) -> Pair {
        Pair::new(
            ctx,
            TokenAmount::new(a.clone(), 100u64).unwrap(),
            TokenAmount::new(b.clone(), 200u64).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_single_hop() {
        let ctx = AmmContext::builtin();
        let (t0, t1) = (token(1), token(2));
        let p = pair(&ctx, &t0, &t1);
        let route = Route::new(&ctx, vec![p.clone()], t0.clone().into(), None).unwrap();

        assert_eq!(route.pairs(), &[p]);
        assert_eq!(route.path(), &[t0.clone(), t1.clone()]);
        assert_eq!(route.input(), &Currency::Token(t0));
        assert_eq!(route.output(), &Currency::Token(t1));
        assert_eq!(route.chain_id(), ChainId::ETHEREUM);
        assert_eq!(route.mid_price().to_significant(4, pairswap_types::Rounding::HalfUp).unwrap(), "2");
    }

    #[test]
    fn test_multi_hop_path() {
        let ctx = AmmContext::builtin();
        let (t0, t1, t2) = (token(1), token(2), token(3));
        let pairs = vec![pair(&ctx, &t0, &t1), pair(&ctx, &t1, &t2)];
        let route = Route::new(&ctx, pairs, t0.clone().into(), Some(t2.clone().into())).unwrap();
        assert_eq!(route.path(), &[t0, t1, t2]);
        // 200/100 on each hop
        assert_eq!(route.mid_price().raw().to_fixed(0, pairswap_types::Rounding::Down), "4");
    }

    #[test]
    fn test_native_input_uses_wrapped_token() {
        let ctx = AmmContext::builtin();
        let weth = ctx.wrapped_native(ChainId::ETHEREUM).unwrap();
        let t0 = token(1);
        let route = Route::new(&ctx, vec![pair(&ctx, &weth, &t0)], Currency::Native, None).unwrap();
        assert_eq!(route.input(), &Currency::Native);
        assert_eq!(route.path()[0], weth);

        let to_native = Route::new(&ctx, vec![pair(&ctx, &t0, &weth)], t0.into(), Some(Currency::Native)).unwrap();
        assert_eq!(to_native.output(), &Currency::Native);
        assert_eq!(to_native.path()[1], weth);
    }

    #[test]
    fn test_circular_route() {
        let ctx = AmmContext::builtin();
        let weth = ctx.wrapped_native(ChainId::ETHEREUM).unwrap();
        let (t0, t1) = (token(1), token(2));
        let pairs = vec![pair(&ctx, &weth, &t0), pair(&ctx, &t0, &t1), pair(&ctx, &t1, &weth)];
        let route = Route::new(&ctx, pairs, weth.clone().into(), Some(weth.clone().into())).unwrap();

        assert_eq!(route.pairs().len(), 3);
        assert_eq!(route.path(), &[weth.clone(), t0, t1, weth.clone()]);
        assert_eq!(route.input(), &Currency::Token(weth.clone()));
        assert_eq!(route.output(), &Currency::Token(weth));
        assert_eq!(route.mid_price().to_significant(4, pairswap_types::Rounding::HalfUp).unwrap(), "8");
    }

    #[test]
    fn test_validation_failures() {
        let ctx = AmmContext::builtin();
        let (t0, t1, t2, t3) = (token(1), token(2), token(3), token(4));

        assert_eq!(
            Route::new(&ctx, vec![], t0.clone().into(), None).unwrap_err(),
            AmmError::EmptyRoute
        );
        assert_eq!(
            Route::new(&ctx, vec![pair(&ctx, &t1, &t2)], t0.clone().into(), None).unwrap_err(),
            AmmError::InputNotInRoute
        );
        assert_eq!(
            Route::new(&ctx, vec![pair(&ctx, &t0, &t1)], t0.clone().into(), Some(t2.clone().into()))
                .unwrap_err(),
            AmmError::OutputNotInRoute
        );
        assert_eq!(
            Route::new(
                &ctx,
                vec![pair(&ctx, &t0, &t1), pair(&ctx, &t2, &t3)],
                t0.clone().into(),
                None
            )
            .unwrap_err(),
            AmmError::DisconnectedPath { hop: 1 }
        );
    }

    #[test]
    fn test_mixed_chains_rejected() {
        let ctx = AmmContext::builtin();
        let (t0, t1) = (token(1), token(2));
        let bsc = |t: &Token| Token::new(ChainId::BSC, t.address, 18);
        let pairs = vec![pair(&ctx, &t0, &t1), pair(&ctx, &bsc(&t1), &bsc(&t0))];
        assert!(matches!(
            Route::new(&ctx, pairs, t0.into(), None),
            Err(AmmError::ChainIdMismatch { .. })
        ));
    }
}
