//! Best-of-venues quote aggregation.
//!
//! Each step of a TWAP run asks every configured venue how much `to` it would
//! give for a quantity of `from`, throws away missing or implausible answers,
//! and keeps the largest output, or the first output close enough to spot.

use crate::arbitrage::{market_data::PriceDataProvider, twap::StepQuoteProvider};
use crate::config::settings::Config;
use async_trait::async_trait;
use log::{debug, warn};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

/// Quotes are rejected when further than this factor from fair value.
pub const DEFAULT_SANITY_BAND: Decimal = dec!(10);
/// Relative deviation from spot accepted by `QuoteSelection::SpotAnchored` (100%).
pub const DEFAULT_MAX_SPOT_DEVIATION: Decimal = dec!(1);

/// A venue that can price a swap of `amount` units of `from` into `to`.
#[async_trait]
pub trait VenueQuoter: Send + Sync {
    /// Returns the name of the venue (e.g., "1inch", "openocean").
    fn name(&self) -> &str;

    /// Output amount in `to` units, `Ok(None)` when the venue has no route.
    async fn quote(&self, from: &str, to: &str, amount: Decimal) -> anyhow::Result<Option<Decimal>>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct VenueQuote {
    pub venue: String,
    pub output_amount: Decimal,
}

/// Largest output wins; the first venue wins a tie.
pub fn select_best_quote(quotes: &[VenueQuote]) -> Option<VenueQuote> {
    quotes
        .iter()
        .fold(None::<&VenueQuote>, |best, q| match best {
            Some(b) if b.output_amount >= q.output_amount => Some(b),
            _ => Some(q),
        })
        .cloned()
}

/// How `BestVenueQuoter` picks among the quotes that passed the sanity band.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum QuoteSelection {
    /// Largest output, first venue on ties.
    MaxOutput,
    /// First quote in venue order within `max_deviation` of the spot value,
    /// otherwise the least deviant one. Falls back to `MaxOutput` when there
    /// is no spot price.
    SpotAnchored { max_deviation: Decimal },
}

impl Default for QuoteSelection {
    fn default() -> Self {
        QuoteSelection::MaxOutput
    }
}

/// `|output - spot| / spot` for each quote; first within `max_deviation` wins,
/// else the smallest deviation (first on ties).
pub fn select_spot_anchored_quote(
    quotes: &[VenueQuote],
    spot_output: Decimal,
    max_deviation: Decimal,
) -> Option<VenueQuote> {
    if spot_output <= Decimal::ZERO {
        return select_best_quote(quotes);
    }
    let mut closest: Option<(&VenueQuote, Decimal)> = None;
    for q in quotes {
        let deviation = match (q.output_amount - spot_output).abs().checked_div(spot_output) {
            Some(d) => d,
            None => continue,
        };
        if deviation <= max_deviation {
            return Some(q.clone());
        }
        if closest.map_or(true, |(_, best)| deviation < best) {
            closest = Some((q, deviation));
        }
    }
    closest.map(|(q, _)| q.clone())
}

pub struct BestVenueQuoter {
    venues: Vec<Arc<dyn VenueQuoter>>,
    price_provider: Option<Arc<dyn PriceDataProvider>>,
    sanity_band: Decimal,
    selection: QuoteSelection,
}

impl BestVenueQuoter {
    pub fn new(venues: Vec<Arc<dyn VenueQuoter>>) -> Self {
        Self {
            venues,
            price_provider: None,
            sanity_band: DEFAULT_SANITY_BAND,
            selection: QuoteSelection::default(),
        }
    }

    pub fn from_config(
        venues: Vec<Arc<dyn VenueQuoter>>,
        price_provider: Arc<dyn PriceDataProvider>,
        config: &Config,
    ) -> Self {
        Self::new(venues)
            .with_price_provider(price_provider)
            .with_sanity_band(config.quote_sanity_band)
    }

    /// Enables the fair-value check against USD reference prices.
    pub fn with_price_provider(mut self, provider: Arc<dyn PriceDataProvider>) -> Self {
        self.price_provider = Some(provider);
        self
    }

    pub fn with_sanity_band(mut self, band: Decimal) -> Self {
        self.sanity_band = band;
        self
    }

    pub fn with_selection(mut self, selection: QuoteSelection) -> Self {
        self.selection = selection;
        self
    }

    /// `usd_price(from) * amount`, if a reference price exists and the product fits.
    pub fn fair_output(&self, from: &str, amount: Decimal) -> Option<Decimal> {
        self.price_provider
            .as_ref()
            .and_then(|p| p.get_current_price(from))
            .and_then(|usd_price| usd_price.checked_mul(amount))
    }

    /// `fair / band <= output <= fair * band` with `fair = usd_price(from) * amount`.
    /// Without a reference price every quote passes.
    pub fn within_sanity_band(&self, from: &str, amount: Decimal, output: Decimal) -> bool {
        let fair = match self.fair_output(from, amount) {
            Some(fair) => fair,
            None => return true,
        };
        if self.sanity_band <= Decimal::ZERO {
            return true;
        }
        let lower = fair.checked_div(self.sanity_band).unwrap_or(Decimal::ZERO);
        let upper = fair.checked_mul(self.sanity_band).unwrap_or(Decimal::MAX);
        output >= lower && output <= upper
    }

    /// Valid quotes from every venue, in venue order.
    pub async fn collect_quotes(&self, from: &str, to: &str, amount: Decimal) -> Vec<VenueQuote> {
        let mut quotes = Vec::with_capacity(self.venues.len());

        for venue in &self.venues {
            match venue.quote(from, to, amount).await {
                Ok(Some(output)) if output <= Decimal::ZERO => {
                    warn!("{} returned non-positive output {} for {} {}", venue.name(), output, amount, from);
                }
                Ok(Some(output)) => {
                    if self.within_sanity_band(from, amount, output) {
                        debug!("Got quote from {}: {} {} -> {} {}", venue.name(), amount, from, output, to);
                        quotes.push(VenueQuote {
                            venue: venue.name().to_string(),
                            output_amount: output,
                        });
                    } else {
                        warn!(
                            "Rejected {} quote {} {} -> {} {}: outside {}x fair-value band",
                            venue.name(),
                            amount,
                            from,
                            output,
                            to,
                            self.sanity_band
                        );
                    }
                }
                Ok(None) => {
                    debug!("{} has no route for {} -> {}", venue.name(), from, to);
                }
                Err(e) => {
                    warn!("Failed to get quote from {}: {:#}", venue.name(), e);
                }
            }
        }

        quotes
    }

    pub async fn best_quote(&self, from: &str, to: &str, amount: Decimal) -> Option<VenueQuote> {
        let quotes = self.collect_quotes(from, to, amount).await;
        match (self.selection, self.fair_output(from, amount)) {
            (QuoteSelection::SpotAnchored { max_deviation }, Some(spot)) => {
                select_spot_anchored_quote(&quotes, spot, max_deviation)
            }
            _ => select_best_quote(&quotes),
        }
    }
}

#[async_trait]
impl StepQuoteProvider for BestVenueQuoter {
    async fn step_output(&self, from: &str, to: &str, amount: Decimal) -> Option<Decimal> {
        self.best_quote(from, to, amount)
            .await
            .map(|q| q.output_amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arbitrage::market_data::StaticPriceBook;
    use pretty_assertions::assert_eq;

    struct FixedVenue {
        name: &'static str,
        output: Option<Decimal>,
        fail: bool,
    }

    #[async_trait]
    impl VenueQuoter for FixedVenue {
        fn name(&self) -> &str {
            self.name
        }

        async fn quote(&self, _from: &str, _to: &str, _amount: Decimal) -> anyhow::Result<Option<Decimal>> {
            if self.fail {
                anyhow::bail!("{} unavailable", self.name);
            }
            Ok(self.output)
        }
    }

    fn venue(name: &'static str, output: Option<Decimal>) -> Arc<dyn VenueQuoter> {
        Arc::new(FixedVenue {
            name,
            output,
            fail: false,
        })
    }

    #[test]
    fn test_select_best_quote_prefers_max_then_first() {
        let quotes = vec![
            VenueQuote { venue: "a".into(), output_amount: dec!(10) },
            VenueQuote { venue: "b".into(), output_amount: dec!(12) },
            VenueQuote { venue: "c".into(), output_amount: dec!(12) },
        ];
        assert_eq!(select_best_quote(&quotes).map(|q| q.venue), Some("b".to_string()));
        assert_eq!(select_best_quote(&[]), None);
    }

    #[tokio::test]
    async fn test_best_quote_skips_missing_and_failed_venues() {
        let failing: Arc<dyn VenueQuoter> = Arc::new(FixedVenue {
            name: "down",
            output: Some(dec!(1000)),
            fail: true,
        });
        let quoter = BestVenueQuoter::new(vec![
            failing,
            venue("none", None),
            venue("1inch", Some(dec!(2990))),
            venue("openocean", Some(dec!(3005))),
        ]);
        let best = quoter.best_quote("ETH", "USDC", dec!(1)).await.expect("a quote");
        assert_eq!(best.venue, "openocean");
        assert_eq!(best.output_amount, dec!(3005));
    }

    #[tokio::test]
    async fn test_sanity_band_rejects_outliers() {
        let prices: Arc<dyn PriceDataProvider> =
            Arc::new(StaticPriceBook::new().with_price("ETH", dec!(3000)));
        let quoter = BestVenueQuoter::new(vec![
            venue("broken", Some(dec!(300000))),
            venue("honest", Some(dec!(2995))),
        ])
        .with_price_provider(prices);

        assert!(quoter.within_sanity_band("ETH", dec!(1), dec!(300)));
        assert!(!quoter.within_sanity_band("ETH", dec!(1), dec!(299)));
        assert!(quoter.within_sanity_band("UNKNOWN", dec!(1), dec!(1)));

        let output = quoter.step_output("ETH", "USDC", dec!(1)).await;
        assert_eq!(output, Some(dec!(2995)));
    }

    #[test]
    fn test_spot_anchored_takes_first_within_deviation() {
        let quotes = vec![
            VenueQuote { venue: "far".into(), output_amount: dec!(250) },
            VenueQuote { venue: "near".into(), output_amount: dec!(180) },
            VenueQuote { venue: "best".into(), output_amount: dec!(105) },
        ];
        // 180 deviates 80% from 100: accepted before the closer "best"
        let picked = select_spot_anchored_quote(&quotes, dec!(100), DEFAULT_MAX_SPOT_DEVIATION);
        assert_eq!(picked.map(|q| q.venue), Some("near".to_string()));
    }

    #[test]
    fn test_spot_anchored_falls_back_to_least_deviant() {
        let quotes = vec![
            VenueQuote { venue: "high".into(), output_amount: dec!(400) },
            VenueQuote { venue: "low".into(), output_amount: dec!(20) },
            VenueQuote { venue: "mid".into(), output_amount: dec!(300) },
        ];
        // deviations 3.0, 0.8, 2.0 against a 0.5 threshold
        let picked = select_spot_anchored_quote(&quotes, dec!(100), dec!(0.5));
        assert_eq!(picked.map(|q| q.venue), Some("low".to_string()));
        assert_eq!(select_spot_anchored_quote(&[], dec!(100), dec!(0.5)), None);
    }

    #[tokio::test]
    async fn test_quoter_selection_mode() {
        let prices: Arc<dyn PriceDataProvider> =
            Arc::new(StaticPriceBook::new().with_price("ETH", dec!(3000)));
        let venues = || {
            vec![
                venue("steady", Some(dec!(2990))),
                venue("generous", Some(dec!(5000))),
            ]
        };

        let max = BestVenueQuoter::new(venues()).with_price_provider(prices.clone());
        assert_eq!(max.step_output("ETH", "USDC", dec!(1)).await, Some(dec!(5000)));

        let anchored = BestVenueQuoter::new(venues())
            .with_price_provider(prices)
            .with_selection(QuoteSelection::SpotAnchored {
                max_deviation: DEFAULT_MAX_SPOT_DEVIATION,
            });
        assert_eq!(anchored.step_output("ETH", "USDC", dec!(1)).await, Some(dec!(2990)));

        // no spot price: plain max output
        let blind = BestVenueQuoter::new(venues()).with_selection(QuoteSelection::SpotAnchored {
            max_deviation: DEFAULT_MAX_SPOT_DEVIATION,
        });
        assert_eq!(blind.step_output("ETH", "USDC", dec!(1)).await, Some(dec!(5000)));
    }

    #[tokio::test]
    async fn test_no_valid_venue_yields_none() {
        let quoter = BestVenueQuoter::new(vec![venue("zero", Some(Decimal::ZERO)), venue("none", None)]);
        assert_eq!(quoter.step_output("ETH", "USDC", dec!(1)).await, None);
    }
}
