//! Opportunity Module
//!
//! A two-venue arbitrage opportunity as emitted by the detector: buy on the
//! cheaper venue, sell on the dearer one. Records are built once per qualifying
//! venue pair and never mutated afterwards; all figures are already rounded
//! (prices to 6 dp, USD amounts, percentages and scores to 2 dp).

use log::info;
use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Opportunity {
    /// Upper-cased token symbol.
    pub symbol: String,
    pub buy_venue: String,
    pub buy_price: Decimal,
    pub sell_venue: String,
    pub sell_price: Decimal,
    /// Chain the buy venue resolved to.
    pub buy_chain: String,
    /// Chain the sell venue resolved to.
    pub sell_chain: String,
    /// `(sell - buy) / buy * 100`.
    pub spread_pct: Decimal,
    /// Gross spread profit on the notional minus every execution cost.
    pub net_profit_usd: Decimal,
    pub gas_cost_usd: Decimal,
    pub bridge_cost_usd: Decimal,
    /// `1 - confidence`.
    pub risk_score: Decimal,
    /// Mean of the liquidity and volume scores, in `[0, 1]`.
    pub confidence: Decimal,
    /// Base settlement latency plus any bridge delay.
    pub execution_time_sec: u64,
}

impl Opportunity {
    /// True when the two legs settle on different chains.
    pub fn is_cross_chain(&self) -> bool {
        !self.buy_chain.eq_ignore_ascii_case(&self.sell_chain)
    }

    pub fn log_summary(&self) {
        info!(
            "[{}] buy {} @ {} ({}) -> sell {} @ {} ({}) | spread {}% | net ${} | gas ${} | bridge ${} | risk {} | confidence {} | ~{}s",
            self.symbol,
            self.buy_venue,
            self.buy_price,
            self.buy_chain,
            self.sell_venue,
            self.sell_price,
            self.sell_chain,
            self.spread_pct,
            self.net_profit_usd,
            self.gas_cost_usd,
            self.bridge_cost_usd,
            self.risk_score,
            self.confidence,
            self.execution_time_sec
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sample(buy_chain: &str, sell_chain: &str) -> Opportunity {
        Opportunity {
            symbol: "ETH".to_string(),
            buy_venue: "uniswap".to_string(),
            buy_price: dec!(3000),
            sell_venue: "pancakeswap".to_string(),
            sell_price: dec!(3100),
            buy_chain: buy_chain.to_string(),
            sell_chain: sell_chain.to_string(),
            spread_pct: dec!(3.33),
            net_profit_usd: dec!(12.5),
            gas_cost_usd: dec!(9),
            bridge_cost_usd: Decimal::ZERO,
            risk_score: dec!(0.25),
            confidence: dec!(0.75),
            execution_time_sec: 30,
        }
    }

    #[test]
    fn test_cross_chain_flag() {
        assert!(!sample("ethereum", "Ethereum").is_cross_chain());
        assert!(sample("ethereum", "bsc").is_cross_chain());
    }

    #[test]
    fn test_serializes_for_downstream_consumers() {
        let json = serde_json::to_value(sample("ethereum", "bsc")).expect("serializable");
        assert_eq!(json["symbol"], "ETH");
        assert_eq!(json["execution_time_sec"], 30);
        assert_eq!(json["net_profit_usd"], "12.5");
    }
}
