//! Candle Generator
//!
//! Builds a fresh synthetic OHLC series for one instrument. Every call
//! discards the previous series; there is no continuity between calls.

use chrono::{DateTime, Duration, Local, TimeZone};
use rand::Rng;

use crate::types::{Candle, PriceClass};

/// Number of buckets in every generated series.
pub const SERIES_LEN: usize = 31;

/// Width of one bucket in minutes.
pub const BUCKET_MINUTES: i64 = 15;

/// Walk start used for symbols missing from the base price table.
pub const DEFAULT_BASE_PRICE: f64 = 1.165;

const BODY_VOLATILITY: f64 = 0.002;
const WICK_VOLATILITY: f64 = 0.001;

/// Nominal starting price of the chart walk for a symbol.
pub fn base_price(symbol: &str) -> f64 {
    match symbol {
        "BTC" => 108800.0,
        "XAUUSD" => 3450.0,
        "AAPL" => 232.0,
        _ => DEFAULT_BASE_PRICE,
    }
}

/// A generated series together with the instrument it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct CandleSeries {
    pub symbol: String,
    /// Price the walk started from
    pub base_price: f64,
    /// Oldest first.
    pub candles: Vec<Candle>,
}

impl CandleSeries {
    /// Close of the newest bucket, or the base price for an empty series.
    pub fn current_price(&self) -> f64 {
        self.candles
            .last()
            .map(|c| c.close)
            .unwrap_or(self.base_price)
    }
}

/// Stateless generator of synthetic candle series.
#[derive(Debug, Clone, Copy, Default)]
pub struct CandleGenerator;

impl CandleGenerator {
    /// Regenerate the series for `symbol` ending now.
    ///
    /// `anchor` overrides the base price table as the walk's starting price.
    pub fn regenerate(&self, symbol: &str, anchor: Option<f64>) -> CandleSeries {
        let mut rng = rand::thread_rng();
        self.regenerate_with(symbol, anchor, Local::now(), &mut rng)
    }

    /// Regenerate with an explicit clock and randomness source.
    pub fn regenerate_with<Tz, R>(
        &self,
        symbol: &str,
        anchor: Option<f64>,
        now: DateTime<Tz>,
        rng: &mut R,
    ) -> CandleSeries
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
        R: Rng + ?Sized,
    {
        let base = anchor
            .filter(|p| p.is_finite() && *p > 0.0)
            .unwrap_or_else(|| base_price(symbol));
        let class = PriceClass::of(symbol);
        let body = base * BODY_VOLATILITY;
        let wick = base * WICK_VOLATILITY;

        let mut candles = Vec::with_capacity(SERIES_LEN);
        let mut price = base;

        for i in 0..SERIES_LEN {
            let minutes_back = (SERIES_LEN - 1 - i) as i64 * BUCKET_MINUTES;
            let time = now.clone() - Duration::minutes(minutes_back);

            let delta = rng.gen_range(-0.5f64..0.5) * body;
            let open = price;
            let close = price + delta;
            let high = open.max(close) + rng.gen::<f64>() * wick;
            let low = open.min(close) - rng.gen::<f64>() * wick;
            let volume = (rng.gen::<f64>() * 1000.0).floor() as u32 + 100;

            candles.push(Candle {
                time_label: time.format("%I:%M %p").to_string(),
                open: class.round(open),
                high: class.round(high),
                low: class.round(low),
                close: class.round(close),
                volume,
            });

            price = close;
        }

        CandleSeries {
            symbol: symbol.to_string(),
            base_price: base,
            candles,
        }
    }
}
