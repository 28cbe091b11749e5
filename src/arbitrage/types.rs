// src/arbitrage/types.rs
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One observation of a token's tradeable price at one venue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub symbol: String,
    pub venue: String,
    /// Quote currency per unit token, always > 0 once inside a `QuoteSet`
    pub price: Decimal,
    pub liquidity_usd: Decimal,
    pub volume_24h_usd: Decimal,
}

impl Quote {
    pub fn new(
        symbol: &str,
        venue: &str,
        price: Decimal,
        liquidity_usd: Decimal,
        volume_24h_usd: Decimal,
    ) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            venue: venue.to_string(),
            price,
            liquidity_usd,
            volume_24h_usd,
        }
    }
}

/// Symbol -> quotes from distinct venues. Symbols iterate in sorted order,
/// quotes per symbol in insertion order, so detection output is reproducible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QuoteSet {
    quotes: BTreeMap<String, Vec<Quote>>,
}

impl QuoteSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_quotes<I: IntoIterator<Item = Quote>>(quotes: I) -> Self {
        let mut set = Self::new();
        for quote in quotes {
            set.insert(quote);
        }
        set
    }

    /// Returns false if the quote was dropped for a non-positive price.
    pub fn insert(&mut self, mut quote: Quote) -> bool {
        if quote.price <= Decimal::ZERO {
            warn!(
                "Dropping {} quote from {}: non-positive price {}",
                quote.symbol, quote.venue, quote.price
            );
            return false;
        }
        quote.symbol = quote.symbol.to_uppercase();
        self.quotes
            .entry(quote.symbol.clone())
            .or_default()
            .push(quote);
        true
    }

    pub fn get(&self, symbol: &str) -> Option<&[Quote]> {
        self.quotes.get(&symbol.to_uppercase()).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<Quote>)> {
        self.quotes.iter()
    }

    pub fn symbol_count(&self) -> usize {
        self.quotes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty()
    }
}

impl FromIterator<Quote> for QuoteSet {
    fn from_iter<I: IntoIterator<Item = Quote>>(iter: I) -> Self {
        Self::from_quotes(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_insert_normalizes_and_filters() {
        let mut set = QuoteSet::new();
        assert!(set.insert(Quote::new("eth", "uniswap", dec!(3000), dec!(1), dec!(1))));
        assert!(!set.insert(Quote::new("ETH", "curve", dec!(0), dec!(1), dec!(1))));
        assert!(!set.insert(Quote::new("ETH", "curve", dec!(-5), dec!(1), dec!(1))));

        let quotes = set.get("Eth").expect("symbol present");
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].symbol, "ETH");
        assert_eq!(set.symbol_count(), 1);
    }

    #[test]
    fn test_symbols_iterate_sorted() {
        let set: QuoteSet = vec![
            Quote::new("WBTC", "a", dec!(1), dec!(0), dec!(0)),
            Quote::new("ARB", "a", dec!(1), dec!(0), dec!(0)),
            Quote::new("LINK", "a", dec!(1), dec!(0), dec!(0)),
        ]
        .into_iter()
        .collect();
        let symbols: Vec<&str> = set.iter().map(|(s, _)| s.as_str()).collect();
        assert_eq!(symbols, vec!["ARB", "LINK", "WBTC"]);
    }
}
