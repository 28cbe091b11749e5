// Slippage models: trade size vs. pool depth -> estimated price impact in percent

use rust_decimal::{Decimal, MathematicalOps};
use rust_decimal_macros::dec;

/// Returned for zero-depth pools. Deliberately above `MAX_SLIPPAGE_PCT`:
/// the leg is treated as infeasible, not merely capped.
pub const INFEASIBLE_SLIPPAGE_PCT: Decimal = dec!(100);
pub const MAX_SLIPPAGE_PCT: Decimal = dec!(50);
pub const DEFAULT_SLIPPAGE_MULTIPLIER: Decimal = dec!(1.2);

pub trait SlippageModel: Send + Sync {
    /// Estimated price impact in percent for one leg.
    fn slippage_pct(&self, trade_size_usd: Decimal, liquidity_usd: Decimal) -> Decimal;
}

/// Square-root impact law: `sqrt(trade / liquidity) * multiplier * 100`, capped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SqrtImpactSlippageModel {
    pub multiplier: Decimal,
}

impl SqrtImpactSlippageModel {
    pub fn new(multiplier: Decimal) -> Self {
        Self { multiplier }
    }
}

impl Default for SqrtImpactSlippageModel {
    fn default() -> Self {
        Self::new(DEFAULT_SLIPPAGE_MULTIPLIER)
    }
}

impl SlippageModel for SqrtImpactSlippageModel {
    fn slippage_pct(&self, trade_size_usd: Decimal, liquidity_usd: Decimal) -> Decimal {
        if liquidity_usd <= Decimal::ZERO {
            return INFEASIBLE_SLIPPAGE_PCT;
        }
        // Pools too thin to represent the ratio are past the cap anyway.
        let Some(ratio) = trade_size_usd.max(Decimal::ZERO).checked_div(liquidity_usd) else {
            return MAX_SLIPPAGE_PCT;
        };
        ratio
            .sqrt()
            .unwrap_or(Decimal::ZERO)
            .checked_mul(self.multiplier)
            .and_then(|impact| impact.checked_mul(dec!(100)))
            .map_or(MAX_SLIPPAGE_PCT, |impact| impact.min(MAX_SLIPPAGE_PCT))
    }
}

/// Slippage with the default 1.2 multiplier.
pub fn estimate_slippage_pct(trade_size_usd: Decimal, liquidity_usd: Decimal) -> Decimal {
    SqrtImpactSlippageModel::default().slippage_pct(trade_size_usd, liquidity_usd)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use rust_decimal::prelude::ToPrimitive;

    fn pct(trade_size_usd: Decimal, liquidity_usd: Decimal) -> f64 {
        estimate_slippage_pct(trade_size_usd, liquidity_usd).to_f64().unwrap()
    }

    #[test]
    fn test_zero_or_negative_liquidity_saturates() {
        assert_eq!(estimate_slippage_pct(dec!(1000), Decimal::ZERO), dec!(100));
        assert_eq!(estimate_slippage_pct(dec!(1000), dec!(-10)), dec!(100));
        assert_eq!(estimate_slippage_pct(Decimal::ZERO, Decimal::ZERO), dec!(100));
    }

    #[test]
    fn test_square_root_law() {
        // sqrt(1000 / 100_000) = 0.1 -> 0.1 * 1.2 * 100 = 12
        assert_approx_eq!(pct(dec!(1000), dec!(100000)), 12.0, 1e-9);
        // sqrt(0.001) * 120
        assert_approx_eq!(pct(dec!(1000), dec!(1000000)), 3.794733192202055, 1e-9);
        // sqrt(1) * 120 = 120, capped
        assert_eq!(estimate_slippage_pct(dec!(1000), dec!(1000)), MAX_SLIPPAGE_PCT);
        assert_eq!(estimate_slippage_pct(Decimal::ZERO, dec!(1000)), Decimal::ZERO);
    }

    #[test]
    fn test_custom_multiplier() {
        let model = SqrtImpactSlippageModel::new(dec!(1));
        let value = model.slippage_pct(dec!(1000), dec!(100000)).to_f64().unwrap();
        assert_approx_eq!(value, 10.0, 1e-9);
    }

    #[test]
    fn test_dust_liquidity_caps_instead_of_overflowing() {
        assert_eq!(estimate_slippage_pct(dec!(1000000), Decimal::new(1, 24)), MAX_SLIPPAGE_PCT);
        assert_eq!(estimate_slippage_pct(Decimal::MAX, Decimal::new(1, 28)), MAX_SLIPPAGE_PCT);

        let model = SqrtImpactSlippageModel::new(Decimal::MAX);
        assert_eq!(model.slippage_pct(dec!(1000), dec!(1000)), MAX_SLIPPAGE_PCT);
    }
}
