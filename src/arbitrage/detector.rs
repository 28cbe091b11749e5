// src/arbitrage/detector.rs
use crate::{
    arbitrage::{
        analysis::{FeeManager, TradeLegs},
        opportunity::Opportunity,
        types::{Quote, QuoteSet},
    },
    config::{settings::Config, MarketTables},
    utils::{round_pct, round_price, round_usd, timing::Timer},
};
use itertools::Itertools;
use log::{debug, info, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Serialize;
use std::sync::Arc;

/// Liquidity at which the liquidity score saturates at 1.
pub const LIQUIDITY_SCORE_CAP_USD: Decimal = dec!(500000);
/// 24h volume at which the volume score saturates at 1.
pub const VOLUME_SCORE_CAP_USD: Decimal = dec!(1000000);

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionParams {
    pub trade_size_usd: Decimal,
    pub min_spread_pct: Decimal,
    pub top_n: usize,
}

impl Default for DetectionParams {
    fn default() -> Self {
        Self {
            trade_size_usd: dec!(1000),
            min_spread_pct: dec!(0.01),
            top_n: 5,
        }
    }
}

impl From<&Config> for DetectionParams {
    fn from(config: &Config) -> Self {
        Self {
            trade_size_usd: config.trade_size_usd,
            min_spread_pct: config.min_spread_pct,
            top_n: config.top_n,
        }
    }
}

/// Counters for one detection pass, including pairs that were filtered out.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DetectionStats {
    pub symbols_scanned: usize,
    /// Symbols with fewer than two quotes.
    pub symbols_skipped: usize,
    pub pairs_evaluated: usize,
    pub pairs_below_spread: usize,
    pub pairs_unprofitable: usize,
    /// Pairs whose spread or profit does not fit in a `Decimal`.
    pub pairs_overflowed: usize,
    /// Opportunities found before `top_n` truncation.
    pub opportunities_emitted: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DetectionReport {
    pub opportunities: Vec<Opportunity>,
    pub stats: DetectionStats,
}

#[derive(Debug, Clone)]
pub struct ArbitrageDetector {
    fee_manager: FeeManager,
    params: DetectionParams,
}

impl ArbitrageDetector {
    pub fn new(fee_manager: FeeManager, params: DetectionParams) -> Self {
        info!(
            "ArbitrageDetector initialized with: Trade Size = ${}, Min Spread = {}%, Top N = {}, Native Token = ${}",
            params.trade_size_usd,
            params.min_spread_pct,
            params.top_n,
            fee_manager.native_token_usd_price()
        );
        Self {
            fee_manager,
            params,
        }
    }

    pub fn from_config(config: &Config, tables: Arc<MarketTables>) -> Self {
        Self::new(
            FeeManager::from_config(config, tables),
            DetectionParams::from(config),
        )
    }

    pub fn params(&self) -> &DetectionParams {
        &self.params
    }

    pub fn set_min_spread_pct(&mut self, min_spread_pct: Decimal) {
        self.params.min_spread_pct = min_spread_pct;
        info!("ArbitrageDetector min_spread_pct updated to: {}%", min_spread_pct);
    }

    /// Top opportunities across all symbols, best net profit first.
    pub fn detect(&self, quotes: &QuoteSet) -> Vec<Opportunity> {
        self.detect_with_report(quotes).opportunities
    }

    pub fn detect_with_report(&self, quotes: &QuoteSet) -> DetectionReport {
        let timer = Timer::start("detection pass");
        let mut stats = DetectionStats::default();
        let mut opportunities = Vec::new();

        for (symbol, symbol_quotes) in quotes.iter() {
            stats.symbols_scanned += 1;
            if symbol_quotes.len() < 2 {
                stats.symbols_skipped += 1;
                debug!("{}: fewer than 2 quotes, skipping", symbol);
                continue;
            }
            for (a, b) in symbol_quotes.iter().tuple_combinations() {
                stats.pairs_evaluated += 1;
                if let Some(opp) = self.evaluate_pair(symbol, a, b, &mut stats) {
                    opportunities.push(opp);
                }
            }
        }

        stats.opportunities_emitted = opportunities.len();
        // Stable: equal profits keep generation order.
        opportunities.sort_by(|a, b| b.net_profit_usd.cmp(&a.net_profit_usd));
        opportunities.truncate(self.params.top_n);

        let elapsed = timer.finish();
        info!(
            "Detection over {} symbols: {} pairs, {} below spread, {} unprofitable, {} out of range, {} found, {} returned in {}ms",
            stats.symbols_scanned,
            stats.pairs_evaluated,
            stats.pairs_below_spread,
            stats.pairs_unprofitable,
            stats.pairs_overflowed,
            stats.opportunities_emitted,
            opportunities.len(),
            elapsed.as_millis()
        );
        for opp in &opportunities {
            opp.log_summary();
        }

        DetectionReport {
            opportunities,
            stats,
        }
    }

    fn evaluate_pair(
        &self,
        symbol: &str,
        a: &Quote,
        b: &Quote,
        stats: &mut DetectionStats,
    ) -> Option<Opportunity> {
        let (buy, sell) = if a.price <= b.price { (a, b) } else { (b, a) };
        let trade_size_usd = self.params.trade_size_usd;

        let Some(spread_pct) = (sell.price - buy.price)
            .checked_div(buy.price)
            .and_then(|ratio| ratio.checked_mul(dec!(100)))
        else {
            stats.pairs_overflowed += 1;
            warn!(
                "{}: {} @ {} -> {} @ {} spread out of range, skipping",
                symbol, buy.venue, buy.price, sell.venue, sell.price
            );
            return None;
        };
        if spread_pct < self.params.min_spread_pct {
            stats.pairs_below_spread += 1;
            debug!(
                "{}: {} -> {} spread {}% below threshold",
                symbol,
                buy.venue,
                sell.venue,
                round_pct(spread_pct)
            );
            return None;
        }

        let Some(gross_profit_usd) = trade_size_usd
            .checked_mul(spread_pct)
            .and_then(|notional| notional.checked_div(dec!(100)))
        else {
            stats.pairs_overflowed += 1;
            warn!(
                "{}: {} -> {} gross profit out of range at {}% spread, skipping",
                symbol, buy.venue, sell.venue, spread_pct
            );
            return None;
        };

        let venue_chains = &self.fee_manager.tables().venue_chains;
        let buy_chain = venue_chains.resolve(&buy.venue);
        let sell_chain = venue_chains.resolve(&sell.venue);

        let cost = self.fee_manager.estimate(&TradeLegs {
            buy_venue: &buy.venue,
            sell_venue: &sell.venue,
            buy_liquidity_usd: buy.liquidity_usd,
            sell_liquidity_usd: sell.liquidity_usd,
            buy_chain,
            sell_chain,
            trade_size_usd,
        });

        let net_profit_usd = gross_profit_usd - cost.total_cost_usd;
        if net_profit_usd <= Decimal::ZERO {
            stats.pairs_unprofitable += 1;
            debug!(
                "{}: {} -> {} unprofitable, gross ${} vs cost ${}",
                symbol,
                buy.venue,
                sell.venue,
                round_usd(gross_profit_usd),
                round_usd(cost.total_cost_usd)
            );
            return None;
        }

        let (confidence, risk_score) = score(buy, sell);

        Some(Opportunity {
            symbol: symbol.to_string(),
            buy_venue: buy.venue.clone(),
            buy_price: round_price(buy.price),
            sell_venue: sell.venue.clone(),
            sell_price: round_price(sell.price),
            buy_chain: buy_chain.to_string(),
            sell_chain: sell_chain.to_string(),
            spread_pct: round_pct(spread_pct),
            net_profit_usd: round_usd(net_profit_usd),
            gas_cost_usd: round_usd(cost.gas_cost_usd),
            bridge_cost_usd: round_usd(cost.bridge_cost_usd),
            risk_score,
            confidence,
            execution_time_sec: cost.execution_time_sec,
        })
    }
}

/// `(confidence, risk_score)` from the thinner side of the pair, both rounded.
fn score(buy: &Quote, sell: &Quote) -> (Decimal, Decimal) {
    let liquidity = buy.liquidity_usd.min(sell.liquidity_usd);
    let volume = buy.volume_24h_usd.min(sell.volume_24h_usd);
    let liquidity_score = (liquidity / LIQUIDITY_SCORE_CAP_USD).clamp(Decimal::ZERO, Decimal::ONE);
    let volume_score = (volume / VOLUME_SCORE_CAP_USD).clamp(Decimal::ZERO, Decimal::ONE);
    let confidence = (liquidity_score + volume_score) / dec!(2);
    (round_pct(confidence), round_pct(Decimal::ONE - confidence))
}

/// One-shot detection without keeping a detector around.
pub fn detect(
    quotes: &QuoteSet,
    fee_manager: &FeeManager,
    params: &DetectionParams,
) -> Vec<Opportunity> {
    ArbitrageDetector::new(fee_manager.clone(), params.clone()).detect(quotes)
}
