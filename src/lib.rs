pub mod arbitrage;
pub mod config;
pub mod error;
pub mod utils;

// Re-export the main entry points for easy access
pub use arbitrage::{
    detect, estimate_slippage_pct, run_twap, ArbitrageDetector, BestVenueQuoter, CostBreakdown,
    DetectionParams, DetectionReport, FeeManager, Opportunity, PriceDataProvider, Quote, QuoteSet,
    StepQuoteProvider, TwapConfig, TwapExecutor, TwapReport, VenueQuoter,
};
pub use config::{load_config, load_market_tables, Config, MarketTables};
pub use error::{ArbError, Result};
