//! # Best Route Demo
//!
//! Builds a handful of mainnet-style pools, searches the best exact-input and
//! exact-output trades from ETH to DAI, and prints the router call for the winner.
//!
//! ```text
//! RUST_LOG=pairswap_amm=debug cargo run -p pairswap-amm --example best_route [chains.toml]
//! ```
//!
//! An optional TOML path is merged over the built-in chain table.

use anyhow::Context;
use pairswap_amm::{AmmContext, BestTradeOptions, Pair, Router, Trade, TradeOptions};
use pairswap_config::ChainRegistry;
use pairswap_types::{Address, ChainId, Currency, CurrencyAmount, Percent, Rounding, Token, TokenAmount};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn mainnet_token(address: &str, decimals: u8, symbol: &str) -> anyhow::Result<Token> {
    let address: Address = address.parse()?;
    Ok(Token::new(ChainId::ETHEREUM, address, decimals).with_symbol(symbol))
}

fn pool(ctx: &AmmContext, a: &Token, ra: u128, b: &Token, rb: u128) -> anyhow::Result<Pair> {
    let scale = |token: &Token, whole: u128| whole * 10u128.pow(token.decimals as u32);
    Ok(Pair::new(
        ctx,
        TokenAmount::new(a.clone(), scale(a, ra))?,
        TokenAmount::new(b.clone(), scale(b, rb))?,
    )?)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let registry = match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => ChainRegistry::load(&path).with_context(|| format!("loading {}", path.display()))?,
        None => ChainRegistry::builtin(),
    };
    let ctx = AmmContext::new(registry);

    let weth = ctx.wrapped_native(ChainId::ETHEREUM)?;
    let usdc = mainnet_token("0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", 6, "USDC")?;
    let dai = mainnet_token("0x6B175474E89094C44Da98b954EedeAC495271d0F", 18, "DAI")?;
    let usdt = mainnet_token("0xdAC17F958D2ee523a2206206994597C13D831ec7", 6, "USDT")?;

    let pairs = vec![
        pool(&ctx, &weth, 20_000, &usdc, 50_000_000)?,
        pool(&ctx, &weth, 5_000, &dai, 12_400_000)?,
        pool(&ctx, &usdc, 30_000_000, &dai, 30_010_000)?,
        pool(&ctx, &weth, 8_000, &usdt, 19_990_000)?,
        pool(&ctx, &usdt, 10_000_000, &dai, 10_000_000)?,
    ];
    let options = BestTradeOptions::default();

    let amount_in = CurrencyAmount::native(10u128 * 10u128.pow(18))?;
    let exact_in = Trade::best_trade_exact_in(&ctx, &pairs, &amount_in, &dai.clone().into(), options)?;
    for (rank, trade) in exact_in.iter().enumerate() {
        let hops: Vec<String> = trade.route().path().iter().map(ToString::to_string).collect();
        info!(
            rank,
            path = %hops.join(" -> "),
            output = %trade.output_amount().to_significant(6, Rounding::Down)?,
            impact = %trade.price_impact(),
            "Exact-input candidate"
        );
    }

    let amount_out: CurrencyAmount = TokenAmount::new(dai.clone(), 25_000u128 * 10u128.pow(18))?.into();
    let exact_out = Trade::best_trade_exact_out(&ctx, &pairs, &Currency::Native, &amount_out, options)?;
    if let Some(best) = exact_out.first() {
        info!(
            input = %best.input_amount(),
            execution_price = %best.execution_price(),
            "Cheapest way to buy 25000 DAI"
        );
    }

    let best = exact_in.first().context("no route from ETH to DAI")?;
    let call = Router::swap_call_parameters(
        best,
        &TradeOptions {
            allowed_slippage: Percent::new(50, 10_000)?,
            ttl: 20 * 60,
            recipient: "0x000000000000000000000000000000000000dEaD".parse()?,
            fee_on_transfer: false,
        },
    )?;
    println!("{}", serde_json::to_string_pretty(&call)?);
    Ok(())
}
