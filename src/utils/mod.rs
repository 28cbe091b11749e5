// src/utils/mod.rs
use log::info;
use rust_decimal::{Decimal, RoundingStrategy};

pub mod timing;

/// Decimal places kept on published prices.
pub const PRICE_DP: u32 = 6;
/// Decimal places kept on USD amounts, percentages and scores.
pub const USD_DP: u32 = 2;

pub fn setup_logging(level: log::LevelFilter) -> Result<(), fern::InitError> {
    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.target(),
                message
            ))
        })
        .level(level)
        .chain(std::io::stdout())
        .apply()?;
    info!("Logging initialized.");
    Ok(())
}

/// Half-away-from-zero rounding, the way amounts are displayed to users.
pub fn round_dp(value: Decimal, dp: u32) -> Decimal {
    value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero)
}

pub fn round_price(value: Decimal) -> Decimal {
    round_dp(value, PRICE_DP)
}

pub fn round_usd(value: Decimal) -> Decimal {
    round_dp(value, USD_DP)
}

/// Percentages and 0..1 scores share the USD precision.
pub fn round_pct(value: Decimal) -> Decimal {
    round_dp(value, USD_DP)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_rounding_is_half_away_from_zero() {
        assert_eq!(round_usd(dec!(1.005)), dec!(1.01));
        assert_eq!(round_usd(dec!(-1.005)), dec!(-1.01));
        assert_eq!(round_usd(dec!(2.004)), dec!(2.00));
        assert_eq!(round_price(dec!(0.0000005)), dec!(0.000001));
        assert_eq!(round_pct(dec!(7.58945)), dec!(7.59));
    }
}
