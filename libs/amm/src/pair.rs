//! Constant-product pool with the 0.3% swap fee
//!
//! ## Purpose
//!
//! Exact integer swap and liquidity formulas for a two-token pool. Every division
//! floors in the same order as the pool contract so quotes match on-chain results
//! to the unit.
//!
//! ## Invariants
//!
//! - `token0` sorts before `token1` by address
//! - Swaps never mutate a pair; they return the post-swap pair alongside the amount
//! - `reserve_in * reserve_out` never decreases across a swap

use num_bigint::BigInt;
use num_traits::{Signed, Zero};
use pairswap_types::math::sqrt;
use pairswap_types::{keccak256, Address, ChainId, Currency, Fraction, Hash256, Price, Token, TokenAmount};

use crate::context::AmmContext;
use crate::error::{AmmError, Result};

/// Liquidity permanently locked by the first deposit
pub const MINIMUM_LIQUIDITY: u64 = 1000;

const FEE_NUMERATOR: u32 = 997;
const FEE_DENOMINATOR: u32 = 1000;

pub const LIQUIDITY_TOKEN_DECIMALS: u8 = 18;
pub const LIQUIDITY_TOKEN_SYMBOL: &str = "UNI-V2";
pub const LIQUIDITY_TOKEN_NAME: &str = "Uniswap V2";

/// CREATE2 address of the pool for an already-ordered token pair
///
/// `keccak256(0xff ++ factory ++ keccak256(token0 ++ token1) ++ init_code_hash)[12..]`
pub fn compute_pair_address(
    factory: Address,
    init_code_hash: &Hash256,
    token0: Address,
    token1: Address,
) -> Address {
    let mut packed = [0u8; 40];
    packed[..20].copy_from_slice(token0.as_bytes());
    packed[20..].copy_from_slice(token1.as_bytes());
    let salt = keccak256(&packed);

    let mut preimage = [0u8; 85];
    preimage[0] = 0xff;
    preimage[1..21].copy_from_slice(factory.as_bytes());
    preimage[21..53].copy_from_slice(&salt);
    preimage[53..].copy_from_slice(init_code_hash.as_bytes());
    Address::from_word(&keccak256(&preimage))
}

/// Two-token constant-product pool snapshot
#[derive(Debug, Clone, PartialEq)]
pub struct Pair {
    liquidity_token: Token,
    reserves: [TokenAmount; 2],
}

impl Pair {
    /// Deterministic pool address for two tokens in either order
    pub fn address(ctx: &AmmContext, token_a: &Token, token_b: &Token) -> Result<Address> {
        let (token0, token1) = if token_a.sorts_before(token_b)? {
            (token_a, token_b)
        } else {
            (token_b, token_a)
        };
        let config = ctx.chain(token0.chain_id)?;
        Ok(ctx.pair_addresses().get_or_insert_with(
            token0.chain_id,
            token0.address,
            token1.address,
            || compute_pair_address(config.factory, &config.init_code_hash, token0.address, token1.address),
        ))
    }

    /// Pool holding the two reserves, sorted into `(token0, token1)`
    pub fn new(ctx: &AmmContext, amount_a: TokenAmount, amount_b: TokenAmount) -> Result<Self> {
        let (reserve0, reserve1) = if amount_a.token().sorts_before(amount_b.token())? {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        let address = Self::address(ctx, reserve0.token(), reserve1.token())?;
        let liquidity_token = Token::new(reserve0.token().chain_id, address, LIQUIDITY_TOKEN_DECIMALS)
            .with_symbol(LIQUIDITY_TOKEN_SYMBOL)
            .with_name(LIQUIDITY_TOKEN_NAME);
        Ok(Self {
            liquidity_token,
            reserves: [reserve0, reserve1],
        })
    }

    /// Same pool with new reserves; both amounts must be the pool's tokens
    fn with_reserves(&self, amount_a: TokenAmount, amount_b: TokenAmount) -> Self {
        let reserves = if amount_a.token() == self.token0() {
            [amount_a, amount_b]
        } else {
            [amount_b, amount_a]
        };
        Self {
            liquidity_token: self.liquidity_token.clone(),
            reserves,
        }
    }

    pub fn liquidity_token(&self) -> &Token {
        &self.liquidity_token
    }

    pub fn token0(&self) -> &Token {
        self.reserves[0].token()
    }

    pub fn token1(&self) -> &Token {
        self.reserves[1].token()
    }

    pub fn reserve0(&self) -> &TokenAmount {
        &self.reserves[0]
    }

    pub fn reserve1(&self) -> &TokenAmount {
        &self.reserves[1]
    }

    pub fn chain_id(&self) -> ChainId {
        self.token0().chain_id
    }

    pub fn involves_token(&self, token: &Token) -> bool {
        token == self.token0() || token == self.token1()
    }

    fn ensure_involves(&self, token: &Token) -> Result<()> {
        if !self.involves_token(token) {
            return Err(AmmError::TokenNotInPair {
                token: token.address,
            });
        }
        Ok(())
    }

    /// Token on the other side from `token`
    pub fn other_token(&self, token: &Token) -> Result<&Token> {
        self.ensure_involves(token)?;
        Ok(if token == self.token0() {
            self.token1()
        } else {
            self.token0()
        })
    }

    /// Price of token0 in units of token1
    pub fn token0_price(&self) -> Result<Price> {
        Ok(Price::new(
            Currency::Token(self.token0().clone()),
            Currency::Token(self.token1().clone()),
            self.reserve0().raw().clone(),
            self.reserve1().raw().clone(),
        )?)
    }

    /// Price of token1 in units of token0
    pub fn token1_price(&self) -> Result<Price> {
        Ok(Price::new(
            Currency::Token(self.token1().clone()),
            Currency::Token(self.token0().clone()),
            self.reserve1().raw().clone(),
            self.reserve0().raw().clone(),
        )?)
    }

    pub fn price_of(&self, token: &Token) -> Result<Price> {
        self.ensure_involves(token)?;
        if token == self.token0() {
            self.token0_price()
        } else {
            self.token1_price()
        }
    }

    pub fn reserve_of(&self, token: &Token) -> Result<&TokenAmount> {
        self.ensure_involves(token)?;
        Ok(if token == self.token0() {
            self.reserve0()
        } else {
            self.reserve1()
        })
    }

    fn has_empty_reserve(&self) -> bool {
        self.reserve0().is_zero() || self.reserve1().is_zero()
    }

    /// Output for an exact input, plus the pool after the swap
    pub fn get_output_amount(&self, input_amount: &TokenAmount) -> Result<(TokenAmount, Pair)> {
        self.ensure_involves(input_amount.token())?;
        if self.has_empty_reserve() {
            return Err(AmmError::InsufficientReserves);
        }

        let input_reserve = self.reserve_of(input_amount.token())?;
        let output_reserve = self.reserve_of(self.other_token(input_amount.token())?)?;

        let input_with_fee = input_amount.raw() * FEE_NUMERATOR;
        let numerator = &input_with_fee * output_reserve.raw();
        let denominator = input_reserve.raw() * FEE_DENOMINATOR + &input_with_fee;
        let output_raw = numerator / denominator;
        if output_raw.is_zero() {
            return Err(AmmError::InsufficientInputAmount);
        }

        let output_amount = output_reserve.with_raw(output_raw)?;
        let next = self.with_reserves(
            input_reserve.add(input_amount)?,
            output_reserve.subtract(&output_amount)?,
        );
        Ok((output_amount, next))
    }

    /// Input needed for an exact output, plus the pool after the swap
    pub fn get_input_amount(&self, output_amount: &TokenAmount) -> Result<(TokenAmount, Pair)> {
        self.ensure_involves(output_amount.token())?;

        let output_reserve = self.reserve_of(output_amount.token())?;
        let input_reserve = self.reserve_of(self.other_token(output_amount.token())?)?;
        if self.has_empty_reserve() || output_amount.raw() >= output_reserve.raw() {
            return Err(AmmError::InsufficientReserves);
        }

        let numerator = input_reserve.raw() * output_amount.raw() * FEE_DENOMINATOR;
        let denominator = (output_reserve.raw() - output_amount.raw()) * FEE_NUMERATOR;
        let input_raw = numerator / denominator + 1u32;

        let input_amount = input_reserve.with_raw(input_raw)?;
        let next = self.with_reserves(
            input_reserve.add(&input_amount)?,
            output_reserve.subtract(output_amount)?,
        );
        Ok((input_amount, next))
    }

    /// Liquidity tokens minted for a deposit of both tokens
    pub fn get_liquidity_minted(
        &self,
        total_supply: &TokenAmount,
        amount_a: &TokenAmount,
        amount_b: &TokenAmount,
    ) -> Result<TokenAmount> {
        if total_supply.token() != &self.liquidity_token {
            return Err(AmmError::LiquidityTokenMismatch);
        }
        let (amount0, amount1) = if amount_a.token().sorts_before(amount_b.token())? {
            (amount_a, amount_b)
        } else {
            (amount_b, amount_a)
        };
        if amount0.token() != self.token0() {
            return Err(AmmError::TokenNotInPair {
                token: amount0.token().address,
            });
        }
        if amount1.token() != self.token1() {
            return Err(AmmError::TokenNotInPair {
                token: amount1.token().address,
            });
        }

        let liquidity: BigInt = if total_supply.is_zero() {
            sqrt(&(amount0.raw() * amount1.raw()))? - MINIMUM_LIQUIDITY
        } else if self.has_empty_reserve() {
            return Err(AmmError::InsufficientReserves);
        } else {
            let share0 = amount0.raw() * total_supply.raw() / self.reserve0().raw();
            let share1 = amount1.raw() * total_supply.raw() / self.reserve1().raw();
            share0.min(share1)
        };
        if !liquidity.is_positive() {
            return Err(AmmError::InsufficientInputAmount);
        }

        Ok(TokenAmount::new(self.liquidity_token.clone(), liquidity)?)
    }

    /// Amount of `token` redeemable for `liquidity`.
    ///
    /// With `fee_on` and a non-zero `k_last`, total supply first grows by the
    /// protocol fee share minted since `k_last` was recorded.
    pub fn get_liquidity_value(
        &self,
        token: &Token,
        total_supply: &TokenAmount,
        liquidity: &TokenAmount,
        fee_on: bool,
        k_last: Option<&BigInt>,
    ) -> Result<TokenAmount> {
        self.ensure_involves(token)?;
        if total_supply.token() != &self.liquidity_token || liquidity.token() != &self.liquidity_token {
            return Err(AmmError::LiquidityTokenMismatch);
        }
        if liquidity.raw() > total_supply.raw() {
            return Err(AmmError::LiquidityExceedsSupply);
        }

        let mut supply = total_supply.raw().clone();
        if let Some(k_last) = k_last.filter(|k| fee_on && !k.is_zero()) {
            let root_k = sqrt(&(self.reserve0().raw() * self.reserve1().raw()))?;
            let root_k_last = sqrt(k_last)?;
            if root_k > root_k_last {
                let numerator = total_supply.raw() * (&root_k - &root_k_last);
                let denominator = &root_k * 5u32 + &root_k_last;
                supply += numerator / denominator;
            }
        }

        let value = Fraction::new(liquidity.raw() * self.reserve_of(token)?.raw(), supply)?.quotient();
        Ok(TokenAmount::new(token.clone(), value)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn token(address: &str, decimals: u8) -> Token {
        Token::new(ChainId::ETHEREUM, address.parse().unwrap(), decimals)
    }

    fn usdc() -> Token {
        token("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 18).with_symbol("USDC")
    }

    fn dai() -> Token {
        token("0x6B175474E89094C44Da98b954EedeAC495271d0F", 18).with_symbol("DAI")
    }

    fn amount(token: &Token, raw: u64) -> TokenAmount {
        TokenAmount::new(token.clone(), raw).unwrap()
    }

    #[test]
    fn test_mainnet_pair_addresses() {
        let ctx = AmmContext::builtin();
        let weth = ctx.wrapped_native(ChainId::ETHEREUM).unwrap();

        let usdc_dai = Pair::address(&ctx, &usdc(), &dai()).unwrap();
        assert_eq!(usdc_dai.to_string(), "0xAE461cA67B15dc8dc81CE7615e0320dA1A9aB8D5");
        assert_eq!(Pair::address(&ctx, &dai(), &usdc()).unwrap(), usdc_dai);

        let usdc_weth = Pair::address(&ctx, &usdc(), &weth).unwrap();
        assert_eq!(usdc_weth.to_string(), "0xB4e16d0168e52d35CaCD2c6185b44281Ec28C9Dc");
        assert_eq!(ctx.pair_addresses().len(), 2);
    }

    #[test]
    fn test_bsc_pair_addresses() {
        let ctx = AmmContext::builtin();
        let wbnb = ctx.wrapped_native(ChainId::BSC).unwrap();
        let busd = Token::new(
            ChainId::BSC,
            "0xe9e7CEA3DedcA5984780Bafc599bD69ADd087D56".parse().unwrap(),
            18,
        );
        let config = ctx.chain(ChainId::BSC).unwrap();
        let (token0, token1) = (wbnb.address, busd.address);

        let address = Pair::address(&ctx, &busd, &wbnb).unwrap();
        assert_eq!(address.to_string(), "0x11AC8F5ef01851a85c0893b9dc52c409D73C9faE");
        assert_eq!(
            address,
            compute_pair_address(config.factory, &config.init_code_hash, token0, token1)
        );

        let low = |last: u8| {
            let mut bytes = [0u8; 20];
            bytes[19] = last;
            Token::new(ChainId::BSC_TESTNET, Address::from_bytes(bytes), 18)
        };
        let testnet = Pair::address(&ctx, &low(1), &low(2)).unwrap();
        assert_eq!(testnet.to_string(), "0x407c9572d6a7a839729cB00C0B21fbF0452E7eE6");
    }

    #[test]
    fn test_different_chains_rejected() {
        let ctx = AmmContext::builtin();
        let wbnb = ctx.wrapped_native(ChainId::BSC_TESTNET).unwrap();
        let result = Pair::new(&ctx, amount(&usdc(), 100), amount(&wbnb, 100));
        assert!(matches!(
            result,
            Err(AmmError::Types(pairswap_types::TypesError::ChainIdMismatch { .. }))
        ));
    }

    #[test]
    fn test_reserves_follow_sort_order() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&usdc(), 100), amount(&dai(), 101)).unwrap();
        assert_eq!(pair.token0(), &dai());
        assert_eq!(pair.token1(), &usdc());
        assert_eq!(pair.reserve0(), &amount(&dai(), 101));
        assert_eq!(pair.reserve1(), &amount(&usdc(), 100));
        assert_eq!(pair.chain_id(), ChainId::ETHEREUM);
        assert_eq!(pair.liquidity_token().symbol.as_deref(), Some("UNI-V2"));
        assert_eq!(pair.liquidity_token().decimals, 18);
    }

    #[test]
    fn test_prices() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 100), amount(&usdc(), 101)).unwrap();
        let expected0 = Price::new(dai().into(), usdc().into(), 100, 101).unwrap();
        let expected1 = Price::new(usdc().into(), dai().into(), 101, 100).unwrap();
        assert_eq!(pair.token0_price().unwrap(), expected0);
        assert_eq!(pair.token1_price().unwrap(), expected1);
        assert_eq!(pair.price_of(&dai()).unwrap(), expected0);
        assert_eq!(pair.price_of(&usdc()).unwrap(), expected1);

        let weth = ctx.wrapped_native(ChainId::ETHEREUM).unwrap();
        assert!(matches!(pair.price_of(&weth), Err(AmmError::TokenNotInPair { .. })));
        assert!(pair.reserve_of(&weth).is_err());
        assert!(!pair.involves_token(&weth));
        assert!(pair.involves_token(&usdc()));
    }

    #[test]
    fn test_output_amount_and_next_pair() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 1_000_000), amount(&usdc(), 2_000_000)).unwrap();

        let (out, next) = pair.get_output_amount(&amount(&dai(), 1000)).unwrap();
        // 1000*997*2_000_000 / (1_000_000*1000 + 997_000)
        assert_eq!(out, amount(&usdc(), 1992));
        assert_eq!(next.reserve_of(&dai()).unwrap(), &amount(&dai(), 1_001_000));
        assert_eq!(next.reserve_of(&usdc()).unwrap(), &amount(&usdc(), 1_998_008));
        assert_eq!(pair.reserve0(), &amount(&dai(), 1_000_000));
    }

    #[test]
    fn test_insufficient_errors() {
        let ctx = AmmContext::builtin();
        let empty = Pair::new(&ctx, amount(&dai(), 0), amount(&usdc(), 1000)).unwrap();
        assert_eq!(
            empty.get_output_amount(&amount(&dai(), 10)).unwrap_err(),
            AmmError::InsufficientReserves
        );

        let pair = Pair::new(&ctx, amount(&dai(), 1_000_000), amount(&usdc(), 1000)).unwrap();
        assert_eq!(
            pair.get_output_amount(&amount(&dai(), 1)).unwrap_err(),
            AmmError::InsufficientInputAmount
        );
        assert_eq!(
            pair.get_input_amount(&amount(&usdc(), 1000)).unwrap_err(),
            AmmError::InsufficientReserves
        );
    }

    #[test]
    fn test_input_amount_rounds_toward_pool() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 1_000_000), amount(&usdc(), 2_000_000)).unwrap();

        let (input, next) = pair.get_input_amount(&amount(&usdc(), 1992)).unwrap();
        // 1_000_000*1992*1000 / (1_998_008*997) = 999.99.. -> 999, +1
        assert_eq!(input, amount(&dai(), 1000));
        let k_before = pair.reserve0().raw() * pair.reserve1().raw();
        let k_after = next.reserve0().raw() * next.reserve1().raw();
        assert!(k_after >= k_before);
    }

    #[test]
    fn test_liquidity_minted_first_deposit() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 0), amount(&usdc(), 0)).unwrap();
        let supply = amount(pair.liquidity_token(), 0);

        assert_eq!(
            pair.get_liquidity_minted(&supply, &amount(&dai(), 1000), &amount(&usdc(), 1000))
                .unwrap_err(),
            AmmError::InsufficientInputAmount
        );
        assert_eq!(
            pair.get_liquidity_minted(&supply, &amount(&dai(), 1_000_000), &amount(&usdc(), 1))
                .unwrap_err(),
            AmmError::InsufficientInputAmount
        );

        let minted = pair
            .get_liquidity_minted(&supply, &amount(&dai(), 1001), &amount(&usdc(), 1001))
            .unwrap();
        assert_eq!(minted.raw(), &BigInt::from(1));
        assert_eq!(minted.token(), pair.liquidity_token());
    }

    #[test]
    fn test_liquidity_minted_proportional() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 10_000), amount(&usdc(), 10_000)).unwrap();
        let supply = amount(pair.liquidity_token(), 10_000);

        let minted = pair
            .get_liquidity_minted(&supply, &amount(&usdc(), 2000), &amount(&dai(), 2000))
            .unwrap();
        assert_eq!(minted.raw(), &BigInt::from(2000));

        let wrong_supply = amount(&dai(), 10_000);
        assert_eq!(
            pair.get_liquidity_minted(&wrong_supply, &amount(&usdc(), 1), &amount(&dai(), 1))
                .unwrap_err(),
            AmmError::LiquidityTokenMismatch
        );
    }

    #[test]
    fn test_liquidity_value_without_fee() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 1000), amount(&usdc(), 1000)).unwrap();
        let supply = amount(pair.liquidity_token(), 1000);

        let full = pair
            .get_liquidity_value(&dai(), &supply, &amount(pair.liquidity_token(), 1000), false, None)
            .unwrap();
        assert_eq!(full, amount(&dai(), 1000));

        let half = pair
            .get_liquidity_value(&usdc(), &supply, &amount(pair.liquidity_token(), 500), false, None)
            .unwrap();
        assert_eq!(half, amount(&usdc(), 500));

        assert_eq!(
            pair.get_liquidity_value(&dai(), &supply, &amount(pair.liquidity_token(), 1001), false, None)
                .unwrap_err(),
            AmmError::LiquidityExceedsSupply
        );
    }

    #[test]
    fn test_liquidity_value_with_protocol_fee() {
        let ctx = AmmContext::builtin();
        let pair = Pair::new(&ctx, amount(&dai(), 1000), amount(&usdc(), 1000)).unwrap();
        let supply = amount(pair.liquidity_token(), 500);
        let liquidity = amount(pair.liquidity_token(), 500);
        let k_last = BigInt::from(500 * 500);

        // rootK 1000, rootKLast 500: fee share 500*500 / 5500 = 45, supply 545
        let value = pair
            .get_liquidity_value(&dai(), &supply, &liquidity, true, Some(&k_last))
            .unwrap();
        assert_eq!(value, amount(&dai(), 917));

        let fee_off = pair
            .get_liquidity_value(&dai(), &supply, &liquidity, false, Some(&k_last))
            .unwrap();
        assert_eq!(fee_off, amount(&dai(), 1000));
    }
}
