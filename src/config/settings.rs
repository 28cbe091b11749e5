use crate::error::ArbError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone)]
pub struct Config {
    /// Reference notional for detection passes, in quote currency
    pub trade_size_usd: Decimal,
    /// Pairs with a spread below this percentage are skipped
    pub min_spread_pct: Decimal,
    pub top_n: usize,
    /// USD price of the gas token, used to convert gwei costs
    pub native_token_usd_price: Decimal,
    pub twap_steps: u32,
    pub twap_delay_secs: u64,
    pub slippage_multiplier: Decimal,
    /// Quotes further than this factor from fair value are rejected
    pub quote_sanity_band: Decimal,
    pub market_tables_path: Option<String>,
}

fn decimal_var(key: &str, default: Decimal) -> Decimal {
    env::var(key)
        .ok()
        .and_then(|v| Decimal::from_str(v.trim()).ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            trade_size_usd: decimal_var("TRADE_SIZE_USD", dec!(1000)),
            min_spread_pct: decimal_var("MIN_SPREAD_PCT", dec!(0.01)),
            top_n: env::var("TOP_N")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .unwrap_or(5),
            native_token_usd_price: decimal_var("NATIVE_TOKEN_USD_PRICE", dec!(3000)),
            twap_steps: env::var("TWAP_STEPS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .unwrap_or(10),
            twap_delay_secs: env::var("TWAP_DELAY_SECS")
                .unwrap_or_else(|_| "2".to_string())
                .parse()
                .unwrap_or(2),
            slippage_multiplier: decimal_var("SLIPPAGE_MULTIPLIER", dec!(1.2)),
            quote_sanity_band: decimal_var("QUOTE_SANITY_BAND", dec!(10)),
            market_tables_path: env::var("MARKET_TABLES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty()),
        }
    }

    pub fn validate(&self) -> Result<(), ArbError> {
        if self.trade_size_usd <= Decimal::ZERO {
            return Err(ArbError::ConfigError(
                "TRADE_SIZE_USD must be positive".to_string(),
            ));
        }
        if self.min_spread_pct < Decimal::ZERO {
            return Err(ArbError::ConfigError(
                "MIN_SPREAD_PCT cannot be negative".to_string(),
            ));
        }
        if self.top_n == 0 {
            return Err(ArbError::ConfigError("TOP_N must be at least 1".to_string()));
        }
        if self.native_token_usd_price <= Decimal::ZERO {
            return Err(ArbError::ConfigError(
                "NATIVE_TOKEN_USD_PRICE must be positive".to_string(),
            ));
        }
        if self.twap_steps == 0 {
            return Err(ArbError::ConfigError(
                "TWAP_STEPS must be at least 1".to_string(),
            ));
        }
        if self.slippage_multiplier < Decimal::ZERO {
            return Err(ArbError::ConfigError(
                "SLIPPAGE_MULTIPLIER cannot be negative".to_string(),
            ));
        }
        if self.quote_sanity_band < Decimal::ONE {
            return Err(ArbError::ConfigError(
                "QUOTE_SANITY_BAND must be >= 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn log_settings(&self) {
        log::info!("Application Configuration Loaded: {:?}", self);
    }

    /// Built-in defaults without reading the environment; TWAP delay is zero.
    pub fn defaults() -> Self {
        Config {
            trade_size_usd: dec!(1000),
            min_spread_pct: dec!(0.01),
            top_n: 5,
            native_token_usd_price: dec!(3000),
            twap_steps: 10,
            twap_delay_secs: 0,
            slippage_multiplier: dec!(1.2),
            quote_sanity_band: dec!(10),
            market_tables_path: None,
        }
    }
}
