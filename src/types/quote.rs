use super::PriceClass;
use serde::{Deserialize, Serialize};

/// Two-sided price for one instrument plus session change stats.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: String,
    pub display_name: String,
    pub bid: f64,
    pub ask: f64,
    /// Cumulative absolute change since session start.
    pub change: f64,
    /// Cumulative percentage change since session start.
    pub change_percent: f64,
}

impl Quote {
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        bid: f64,
        ask: f64,
        change: f64,
        change_percent: f64,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            display_name: display_name.into(),
            bid,
            ask,
            change,
            change_percent,
        }
    }

    pub fn spread(&self) -> f64 {
        self.ask - self.bid
    }

    pub fn price_class(&self) -> PriceClass {
        PriceClass::of(&self.symbol)
    }
}

/// The watchlist every session starts from, in display order.
pub fn seed_quotes() -> Vec<Quote> {
    vec![
        Quote::new("BTC", "Bitcoin", 108782.41, 108804.01, -259.61, -0.24),
        Quote::new("XAUUSD", "Gold vs USD", 3448.935, 3450.44, 12.45, 0.36),
        Quote::new("AAPL", "Apple Inc.", 232.64, 232.68, -1.23, -0.52),
        Quote::new("EURUSD", "Euro vs USD", 1.1651, 1.1653, 0.0012, 0.10),
        Quote::new("GBPUSD", "Pound vs USD", 1.3419, 1.3421, -0.0089, -0.66),
        Quote::new("USDJPY", "USD vs Yen", 147.835, 147.845, 0.215, 0.15),
        Quote::new("USTEC", "US Tech 100", 23418.76, 23420.12, 156.34, 0.67),
        Quote::new("USOIL", "US Crude Oil", 63.741, 63.759, -0.891, -1.37),
    ]
}
