//! Cross-venue arbitrage: quote collection types, the cost model, the
//! opportunity detector and TWAP sampling.

pub mod analysis;
pub mod detector;
pub mod market_data;
pub mod opportunity;
pub mod price_aggregator;
pub mod risk;
pub mod twap;
pub mod types;

pub use analysis::{
    estimate_slippage_pct, CostBreakdown, FeeManager, SlippageModel, SqrtImpactSlippageModel,
    TradeLegs,
};
pub use detector::{detect, ArbitrageDetector, DetectionParams, DetectionReport, DetectionStats};
pub use market_data::{PriceDataProvider, StaticPriceBook};
pub use opportunity::Opportunity;
pub use price_aggregator::{
    select_best_quote, select_spot_anchored_quote, BestVenueQuoter, QuoteSelection, VenueQuote,
    VenueQuoter,
};
pub use twap::{run_twap, CancellationFlag, StepQuoteProvider, TwapConfig, TwapExecutor, TwapReport};
pub use types::{Quote, QuoteSet};
