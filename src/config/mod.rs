pub mod market;
pub mod settings;

pub use market::{
    BridgeCostTable, BridgeRecord, BridgeRoute, ChainGasTable, GasTiers, MarketTables,
    VenueChainMap, DEFAULT_CHAIN,
};
pub use settings::Config;

use crate::error::ArbError;
use std::sync::Arc;

/// Loads and returns the application configuration as an `Arc<Config>`.
/// Reads `.env` if present, then the process environment.
pub fn load_config() -> Result<Arc<settings::Config>, ArbError> {
    dotenv::dotenv().ok(); // Load .env file if present, ignore errors

    let config = settings::Config::from_env();
    config.validate()?;
    config.log_settings();

    Ok(Arc::new(config))
}

/// Market tables from `MARKET_TABLES_PATH`, or the built-in defaults when unset.
pub fn load_market_tables(config: &settings::Config) -> Result<Arc<MarketTables>, ArbError> {
    let tables = match config.market_tables_path.as_deref() {
        Some(path) => MarketTables::from_json_file(path)?,
        None => {
            log::info!("MARKET_TABLES_PATH not set, using built-in market tables");
            MarketTables::default()
        }
    };
    Ok(Arc::new(tables))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_tables_file_is_io_error() {
        let mut config = Config::defaults();
        config.market_tables_path = Some("/nonexistent/market_tables.json".to_string());
        let err = load_market_tables(&config).unwrap_err();
        assert!(matches!(err, ArbError::Io(_)));
    }

    #[test]
    fn test_default_tables_when_path_unset() {
        let config = Config::defaults();
        let tables = load_market_tables(&config).expect("defaults");
        assert!(!tables.chain_gas.is_empty());
        assert!(!tables.bridges.is_empty());
    }
}
