use serde::{Deserialize, Serialize};

/// Symbols quoted with fewer decimals because of their price magnitude.
pub const HIGH_MAGNITUDE_SYMBOLS: &[&str] = &["BTC", "USTEC"];

/// Display/rounding class of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceClass {
    /// Large-denomination instruments, 2 decimal places.
    HighMagnitude,
    /// Everything else, 5 decimal places.
    Standard,
}

impl PriceClass {
    /// Classify a symbol against the high-magnitude allow-list.
    pub fn of(symbol: &str) -> Self {
        if HIGH_MAGNITUDE_SYMBOLS.contains(&symbol) {
            PriceClass::HighMagnitude
        } else {
            PriceClass::Standard
        }
    }

    /// Number of decimal places for price-like fields.
    pub fn decimals(&self) -> u32 {
        match self {
            PriceClass::HighMagnitude => 2,
            PriceClass::Standard => 5,
        }
    }

    /// Round a price to this class's precision.
    pub fn round(&self, value: f64) -> f64 {
        round_to(value, self.decimals())
    }
}

/// Round half away from zero to a fixed number of decimal places.
///
/// Values that round to zero come back as `0.0`, never `-0.0`.
pub fn round_to(value: f64, decimals: u32) -> f64 {
    let factor = 10f64.powi(decimals as i32);
    (value * factor).round() / factor + 0.0
}
