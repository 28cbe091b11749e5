// src/arbitrage/market_data.rs
use rust_decimal::Decimal;
use std::collections::HashMap;

/// USD reference prices by symbol. Lookups are case-insensitive.
pub trait PriceDataProvider: Send + Sync {
    fn get_current_price(&self, symbol: &str) -> Option<Decimal>;
}

impl PriceDataProvider for HashMap<String, Decimal> {
    fn get_current_price(&self, symbol: &str) -> Option<Decimal> {
        self.get(symbol)
            .or_else(|| self.get(&symbol.to_lowercase()))
            .or_else(|| self.get(&symbol.to_uppercase()))
            .copied()
    }
}

/// Snapshot of USD prices, keyed by lower-cased symbol.
#[derive(Debug, Clone, Default)]
pub struct StaticPriceBook {
    prices: HashMap<String, Decimal>,
}

impl StaticPriceBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, symbol: &str, usd_price: Decimal) -> Self {
        self.set_price(symbol, usd_price);
        self
    }

    pub fn set_price(&mut self, symbol: &str, usd_price: Decimal) {
        self.prices.insert(symbol.to_lowercase(), usd_price);
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

impl PriceDataProvider for StaticPriceBook {
    fn get_current_price(&self, symbol: &str) -> Option<Decimal> {
        self.prices.get(&symbol.to_lowercase()).copied()
    }
}

impl<I: Into<String>> FromIterator<(I, Decimal)> for StaticPriceBook {
    fn from_iter<T: IntoIterator<Item = (I, Decimal)>>(iter: T) -> Self {
        let mut book = Self::new();
        for (symbol, price) in iter {
            book.set_price(&symbol.into(), price);
        }
        book
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_lookup_ignores_case() {
        let book = StaticPriceBook::new().with_price("WETH", dec!(3000));
        assert_eq!(book.get_current_price("weth"), Some(dec!(3000)));
        assert_eq!(book.get_current_price("Weth"), Some(dec!(3000)));
        assert_eq!(book.get_current_price("usdc"), None);

        let mut map = HashMap::new();
        map.insert("usdc".to_string(), dec!(1));
        assert_eq!(map.get_current_price("USDC"), Some(dec!(1)));
    }

    #[test]
    fn test_book_from_pairs() {
        let book: StaticPriceBook = vec![("ETH", dec!(3000)), ("eth", dec!(3100))]
            .into_iter()
            .collect();
        assert_eq!(book.len(), 1);
        assert_eq!(book.get_current_price("ETH"), Some(dec!(3100)));
    }
}
