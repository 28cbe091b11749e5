//! Execution cost model for a two-leg (buy here, sell there) trade.
//!
//! Costs are made of:
//! - slippage on each leg from the configured `SlippageModel`
//! - a flat round-trip venue fee
//! - gas for both legs, priced from the `fast` tier of each chain
//! - a bridge fee and settlement delay when the legs sit on different chains
//!
//! Missing table entries never fail; each has a fixed fallback. Components
//! saturate at `Decimal::MAX` instead of overflowing.

use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::math::{SlippageModel, SqrtImpactSlippageModel};
use crate::config::{settings::Config, MarketTables};

/// Flat 0.6% round-trip fee across both venues.
pub const VENUE_FEE_RATE: Decimal = dec!(0.006);
/// Gas price (gwei) used when a chain or its `fast` tier is unknown.
pub const FALLBACK_GAS_GWEI: Decimal = dec!(25);
/// Combined gas units assumed for both legs.
pub const GAS_UNITS_PER_TRADE: Decimal = dec!(100000);
pub const GWEI_TO_NATIVE: Decimal = dec!(0.000000001);
/// Fraction of notional charged for a cross-chain route with no bridge entry.
pub const FALLBACK_BRIDGE_FEE_RATE: Decimal = dec!(0.15);
pub const FALLBACK_BRIDGE_DELAY_SECS: u64 = 600;
/// Settlement and confirmation latency applied to every trade.
pub const BASE_EXECUTION_SECS: u64 = 30;

// =============================================================================
// Cost Breakdown Types
// =============================================================================

/// Inputs of one candidate trade, after venue -> chain resolution.
#[derive(Debug, Clone, Copy)]
pub struct TradeLegs<'a> {
    pub buy_venue: &'a str,
    pub sell_venue: &'a str,
    pub buy_liquidity_usd: Decimal,
    pub sell_liquidity_usd: Decimal,
    pub buy_chain: &'a str,
    pub sell_chain: &'a str,
    pub trade_size_usd: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub slippage_cost_usd: Decimal,
    pub venue_fee_usd: Decimal,
    pub gas_cost_usd: Decimal,
    pub bridge_cost_usd: Decimal,
    pub total_cost_usd: Decimal,
    pub execution_time_sec: u64,
}

// =============================================================================
// Fee Manager
// =============================================================================

#[derive(Clone)]
pub struct FeeManager {
    tables: Arc<MarketTables>,
    native_token_usd_price: Decimal,
    slippage_model: Arc<dyn SlippageModel>,
}

impl FeeManager {
    pub fn new(tables: Arc<MarketTables>, native_token_usd_price: Decimal) -> Self {
        Self::with_slippage_model(
            tables,
            native_token_usd_price,
            Arc::new(SqrtImpactSlippageModel::default()),
        )
    }

    /// Native token price and slippage multiplier from `Config`.
    pub fn from_config(config: &Config, tables: Arc<MarketTables>) -> Self {
        Self::with_slippage_model(
            tables,
            config.native_token_usd_price,
            Arc::new(SqrtImpactSlippageModel::new(config.slippage_multiplier)),
        )
    }

    pub fn with_slippage_model(
        tables: Arc<MarketTables>,
        native_token_usd_price: Decimal,
        slippage_model: Arc<dyn SlippageModel>,
    ) -> Self {
        Self {
            tables,
            native_token_usd_price,
            slippage_model,
        }
    }

    pub fn tables(&self) -> &MarketTables {
        &self.tables
    }

    pub fn native_token_usd_price(&self) -> Decimal {
        self.native_token_usd_price
    }

    /// `fast` gas tier for a chain in gwei, falling back to 25.
    pub fn gas_fast(&self, chain: &str) -> Decimal {
        self.tables
            .chain_gas
            .fast_gwei(chain)
            .unwrap_or(FALLBACK_GAS_GWEI)
    }

    pub fn gas_cost_usd(&self, buy_chain: &str, sell_chain: &str) -> Decimal {
        (self.gas_fast(buy_chain) + self.gas_fast(sell_chain))
            * GAS_UNITS_PER_TRADE
            * GWEI_TO_NATIVE
            * self.native_token_usd_price
    }

    /// Bridge fee in USD and extra delay in seconds for moving `trade_size_usd`
    /// from `buy_chain` to `sell_chain`.
    pub fn bridge_cost(
        &self,
        buy_chain: &str,
        sell_chain: &str,
        trade_size_usd: Decimal,
    ) -> (Decimal, u64) {
        if buy_chain.eq_ignore_ascii_case(sell_chain) {
            return (Decimal::ZERO, 0);
        }
        match self.tables.bridges.get(buy_chain, sell_chain) {
            Some(route) => (
                trade_size_usd.saturating_mul(route.fee_pct / dec!(100)),
                route.time_minutes * 60,
            ),
            None => {
                debug!(
                    "No bridge route {} -> {}, applying fallback penalty",
                    buy_chain, sell_chain
                );
                (
                    trade_size_usd * FALLBACK_BRIDGE_FEE_RATE,
                    FALLBACK_BRIDGE_DELAY_SECS,
                )
            }
        }
    }

    pub fn slippage_cost_usd(&self, legs: &TradeLegs<'_>) -> Decimal {
        let buy_pct = self
            .slippage_model
            .slippage_pct(legs.trade_size_usd, legs.buy_liquidity_usd);
        let sell_pct = self
            .slippage_model
            .slippage_pct(legs.trade_size_usd, legs.sell_liquidity_usd);
        legs.trade_size_usd.saturating_mul((buy_pct + sell_pct) / dec!(100))
    }

    /// Full cost of a two-leg trade. Never fails.
    pub fn estimate(&self, legs: &TradeLegs<'_>) -> CostBreakdown {
        let slippage_cost_usd = self.slippage_cost_usd(legs);
        let venue_fee_usd = legs.trade_size_usd * VENUE_FEE_RATE;
        let gas_cost_usd = self.gas_cost_usd(legs.buy_chain, legs.sell_chain);
        let (bridge_cost_usd, extra_delay_sec) =
            self.bridge_cost(legs.buy_chain, legs.sell_chain, legs.trade_size_usd);

        let breakdown = CostBreakdown {
            slippage_cost_usd,
            venue_fee_usd,
            gas_cost_usd,
            bridge_cost_usd,
            total_cost_usd: slippage_cost_usd
                .saturating_add(venue_fee_usd)
                .saturating_add(gas_cost_usd)
                .saturating_add(bridge_cost_usd),
            execution_time_sec: BASE_EXECUTION_SECS + extra_delay_sec,
        };
        debug!(
            "Cost {} ({}) -> {} ({}): {:?}",
            legs.buy_venue, legs.buy_chain, legs.sell_venue, legs.sell_chain, breakdown
        );
        breakdown
    }
}

impl std::fmt::Debug for FeeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeeManager")
            .field("native_token_usd_price", &self.native_token_usd_price)
            .field("chains", &self.tables.chain_gas.len())
            .field("bridge_routes", &self.tables.bridges.len())
            .finish()
    }
}
