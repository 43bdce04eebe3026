//! Quote Simulator
//!
//! Perturbs the watchlist quotes with a bounded random walk. Both sides of a
//! quote move by the same delta, so the spread never changes.

use rand::Rng;

use crate::types::{round_to, seed_quotes, Quote};

/// Fraction of the bid a single tick can move (before the ±0.5 draw).
pub const QUOTE_VOLATILITY: f64 = 0.001;

/// Owns the watchlist and applies random-walk ticks to it.
#[derive(Debug, Clone)]
pub struct QuoteSimulator {
    quotes: Vec<Quote>,
    volatility: f64,
}

impl QuoteSimulator {
    /// Create a simulator over the given quotes, in display order.
    pub fn new(quotes: Vec<Quote>) -> Self {
        Self {
            quotes,
            volatility: QUOTE_VOLATILITY,
        }
    }

    /// Override the volatility factor.
    pub fn with_volatility(mut self, volatility: f64) -> Self {
        self.volatility = volatility;
        self
    }

    /// Quotes in seed order.
    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    /// Look up a quote by symbol.
    pub fn get(&self, symbol: &str) -> Option<&Quote> {
        self.quotes.iter().find(|q| q.symbol == symbol)
    }

    /// Advance every quote by one tick using the thread-local RNG.
    pub fn tick(&mut self) {
        let mut rng = rand::thread_rng();
        self.tick_with(&mut rng);
    }

    /// Advance every quote by one tick drawing from `rng`.
    pub fn tick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let volatility = self.volatility;
        for quote in &mut self.quotes {
            let u: f64 = rng.gen_range(-0.5..0.5);
            let delta = u * volatility * quote.bid;
            apply_delta(quote, delta);
        }
    }
}

impl Default for QuoteSimulator {
    fn default() -> Self {
        Self::new(seed_quotes())
    }
}

/// Shift a quote by `delta`, preserving its spread and accumulating change.
pub fn apply_delta(quote: &mut Quote, delta: f64) {
    let class = quote.price_class();
    let spread = quote.spread();
    let change_percent = delta / quote.bid * 100.0;

    quote.bid = class.round(quote.bid + delta);
    quote.ask = class.round(quote.bid + spread);
    quote.change = class.round(quote.change + delta);
    quote.change_percent = round_to(quote.change_percent + change_percent, 2);
}
