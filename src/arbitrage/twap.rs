//! Time-Weighted Average Price (TWAP) sampling.
//!
//! Splits a USD notional into equal token quantities, prices each slice
//! against the best available venue at fixed intervals and averages the
//! realized per-token prices. Slices with no usable quote are skipped, not
//! retried; the average is an unweighted mean over the slices that priced.

use crate::{
    arbitrage::market_data::PriceDataProvider,
    config::settings::Config,
    error::{ArbError, Result},
    utils::timing::Timer,
};
use async_trait::async_trait;
use log::{error, info, warn};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

/// Prices one TWAP slice: output amount of `to` for `amount` of `from`,
/// `None` when no venue produced a usable quote.
#[async_trait]
pub trait StepQuoteProvider: Send + Sync {
    async fn step_output(&self, from: &str, to: &str, amount: Decimal) -> Option<Decimal>;
}

/// Cooperative stop signal, checked between steps only.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TwapConfig {
    /// Number of equal slices
    pub steps: u32,
    /// Pause between consecutive slices
    pub delay: Duration,
}

impl Default for TwapConfig {
    fn default() -> Self {
        Self {
            steps: 10,
            delay: Duration::from_secs(2),
        }
    }
}

impl From<&Config> for TwapConfig {
    fn from(config: &Config) -> Self {
        Self {
            steps: config.twap_steps,
            delay: Duration::from_secs(config.twap_delay_secs),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TwapReport {
    pub from_symbol: String,
    pub to_symbol: String,
    /// Mean realized price per `from` token, in `to` units
    pub twap_price: Decimal,
    /// Realized price per successful slice, in step order
    pub samples: Vec<Decimal>,
    pub per_step_qty: Decimal,
    pub steps_attempted: u32,
    pub steps_skipped: u32,
    pub cancelled: bool,
}

pub struct TwapExecutor {
    config: TwapConfig,
    price_provider: Arc<dyn PriceDataProvider>,
    quote_provider: Arc<dyn StepQuoteProvider>,
    cancel: Option<CancellationFlag>,
}

impl TwapExecutor {
    pub fn new(
        config: TwapConfig,
        price_provider: Arc<dyn PriceDataProvider>,
        quote_provider: Arc<dyn StepQuoteProvider>,
    ) -> Self {
        Self {
            config,
            price_provider,
            quote_provider,
            cancel: None,
        }
    }

    pub fn with_cancellation(mut self, flag: CancellationFlag) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &TwapConfig {
        &self.config
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().map_or(false, CancellationFlag::is_cancelled)
    }

    /// Run every slice in order and average the successful ones.
    ///
    /// Fails with `PriceUnavailable` before any slice when `from` has no USD
    /// price, and with `NoValidSteps` when not a single slice priced.
    pub async fn execute(
        &self,
        from_symbol: &str,
        to_symbol: &str,
        total_notional_usd: Decimal,
    ) -> Result<TwapReport> {
        let steps = self.config.steps;
        if steps == 0 {
            return Err(ArbError::InvalidInput("TWAP steps must be at least 1".to_string()));
        }
        if total_notional_usd <= Decimal::ZERO {
            return Err(ArbError::InvalidInput(format!(
                "TWAP notional must be positive, got {}",
                total_notional_usd
            )));
        }

        let usd_price = self
            .price_provider
            .get_current_price(from_symbol)
            .filter(|p| *p > Decimal::ZERO)
            .ok_or_else(|| ArbError::PriceUnavailable(from_symbol.to_string()))?;

        let total_token_qty = total_notional_usd.checked_div(usd_price).ok_or_else(|| {
            ArbError::InvalidInput(format!(
                "TWAP notional ${} at ${} per {} exceeds the representable quantity",
                total_notional_usd, usd_price, from_symbol
            ))
        })?;
        let per_step_qty = total_token_qty / Decimal::from(steps);
        if per_step_qty <= Decimal::ZERO {
            return Err(ArbError::InvalidInput(format!(
                "TWAP slice of ${} over {} steps rounds to zero {}",
                total_notional_usd, steps, from_symbol
            )));
        }

        info!(
            "TWAP {} -> {}: ${} = {} {} in {} steps of {} every {:?}",
            from_symbol,
            to_symbol,
            total_notional_usd,
            total_token_qty,
            from_symbol,
            steps,
            per_step_qty,
            self.config.delay
        );

        let mut timer = Timer::start("twap run");
        let mut samples = Vec::with_capacity(steps as usize);
        let mut steps_attempted = 0u32;
        let mut cancelled = false;

        for step in 0..steps {
            if self.is_cancelled() {
                warn!("TWAP {} -> {} cancelled before step {}/{}", from_symbol, to_symbol, step + 1, steps);
                cancelled = true;
                break;
            }

            steps_attempted += 1;
            let output = self
                .quote_provider
                .step_output(from_symbol, to_symbol, per_step_qty)
                .await
                .filter(|output| *output > Decimal::ZERO);
            match output.and_then(|o| o.checked_div(per_step_qty).map(|price| (o, price))) {
                Some((output, price_per_token)) => {
                    info!(
                        "TWAP step {}/{}: {} {} -> {} {} ({} per token)",
                        step + 1,
                        steps,
                        per_step_qty,
                        from_symbol,
                        output,
                        to_symbol,
                        price_per_token
                    );
                    samples.push(price_per_token);
                }
                None => {
                    warn!("TWAP step {}/{}: no valid quote, skipping", step + 1, steps);
                }
            }
            timer.checkpoint(&format!("step {}", step + 1));

            if step + 1 < steps && !self.config.delay.is_zero() {
                tokio::time::sleep(self.config.delay).await;
            }
        }
        timer.finish();

        if samples.is_empty() {
            return Err(ArbError::NoValidSteps { steps });
        }

        // Scale before summing so large samples cannot overflow the total.
        let count = Decimal::from(samples.len());
        let twap_price = samples
            .iter()
            .fold(Decimal::ZERO, |acc, sample| acc + *sample / count);
        let steps_skipped = steps - samples.len() as u32;
        info!(
            "TWAP {} -> {} result: {} from {} samples ({} skipped)",
            from_symbol,
            to_symbol,
            twap_price,
            samples.len(),
            steps_skipped
        );

        Ok(TwapReport {
            from_symbol: from_symbol.to_string(),
            to_symbol: to_symbol.to_string(),
            twap_price,
            samples,
            per_step_qty,
            steps_attempted,
            steps_skipped,
            cancelled,
        })
    }
}

/// TWAP price, or `None` when the run fails. The reason is logged.
pub async fn run_twap(
    from_symbol: &str,
    to_symbol: &str,
    total_notional_usd: Decimal,
    price_provider: Arc<dyn PriceDataProvider>,
    quote_provider: Arc<dyn StepQuoteProvider>,
    config: TwapConfig,
) -> Option<Decimal> {
    let executor = TwapExecutor::new(config, price_provider, quote_provider);
    match executor.execute(from_symbol, to_symbol, total_notional_usd).await {
        Ok(report) => Some(report.twap_price),
        Err(e) => {
            error!("TWAP {} -> {} failed: {}", from_symbol, to_symbol, e);
            None
        }
    }
}
