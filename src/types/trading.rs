//! Trading Types
//!
//! Positions shown in the open-positions panel and the order ticket submitted
//! from the order panel.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{round_to, PriceClass};

// =============================================================================
// Enums
// =============================================================================

/// Order side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderSide {
    Buy,
    Sell,
}

impl std::fmt::Display for OrderSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderSide::Buy => write!(f, "buy"),
            OrderSide::Sell => write!(f, "sell"),
        }
    }
}

impl OrderSide {
    /// Price move in the position's favour: positive means profit.
    pub fn directed_delta(&self, open_price: f64, current_price: f64) -> f64 {
        match self {
            OrderSide::Buy => current_price - open_price,
            OrderSide::Sell => open_price - current_price,
        }
    }
}

/// Order type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderType {
    /// Execute immediately at best available price
    #[default]
    Market,
    /// Execute at specified price or better
    Limit,
}

impl std::fmt::Display for OrderType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderType::Market => write!(f, "market"),
            OrderType::Limit => write!(f, "limit"),
        }
    }
}

// =============================================================================
// Position
// =============================================================================

/// An open trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    /// Caller-assigned, stable for the position's lifetime
    pub id: String,
    pub symbol: String,
    pub side: OrderSide,
    /// Quantity in lots, strictly positive
    pub volume: f64,
    pub open_price: f64,
    /// Mark price, moved every revaluation tick
    pub current_price: f64,
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
    /// Display string, fixed at creation
    pub open_timestamp: String,
}

impl Position {
    /// Create a position marked at its open price.
    pub fn new(
        id: impl Into<String>,
        symbol: impl Into<String>,
        side: OrderSide,
        volume: f64,
        open_price: f64,
        open_timestamp: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            symbol: symbol.into(),
            side,
            volume,
            open_price,
            current_price: open_price,
            profit_loss: 0.0,
            profit_loss_percent: 0.0,
            open_timestamp: open_timestamp.into(),
        }
    }

    /// Mark the position at `price` and recompute the derived P/L fields.
    ///
    /// The mark is stored at the symbol's price precision and P/L is derived
    /// from the stored mark, so `profit_loss` always agrees in sign with the
    /// stored prices.
    pub fn revalue_at(&mut self, price: f64) {
        self.current_price = PriceClass::of(&self.symbol).round(price);
        let delta = self.side.directed_delta(self.open_price, self.current_price);
        self.profit_loss = round_to(delta * self.volume, 2);
        self.profit_loss_percent = round_to(delta / self.open_price * 100.0, 3);
    }
}

/// The demonstration position every session starts with.
pub fn seed_positions() -> Vec<Position> {
    let mut position = Position::new(
        "1",
        "BTC",
        OrderSide::Buy,
        0.01,
        108808.62,
        "Aug 30, 5:40:13 P",
    );
    position.revalue_at(108782.41);
    vec![position]
}

/// Open positions panel contents.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionsSnapshot {
    pub positions: Vec<Position>,
    pub total_profit_loss: f64,
}

// =============================================================================
// Order ticket
// =============================================================================

/// Order panel submission. Only logged, never executed.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderTicket {
    pub symbol: String,
    pub side: OrderSide,
    #[serde(default)]
    pub order_type: OrderType,
    pub quantity: Option<f64>,
    /// Limit price; market orders leave it empty
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
}

/// Acknowledgement returned for a logged order ticket.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderAck {
    pub intent_id: Uuid,
    pub symbol: String,
    pub side: OrderSide,
    pub order_type: OrderType,
    pub quantity: f64,
    /// Price the intent was logged against
    pub reference_price: f64,
    pub logged_at: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_delta() {
        assert_eq!(OrderSide::Buy.directed_delta(100.0, 110.0), 10.0);
        assert_eq!(OrderSide::Sell.directed_delta(100.0, 110.0), -10.0);
    }

    #[test]
    fn test_seed_position_matches_panel() {
        let positions = seed_positions();
        assert_eq!(positions.len(), 1);

        let position = &positions[0];
        assert_eq!(position.id, "1");
        assert_eq!(position.current_price, 108782.41);
        assert_eq!(position.profit_loss, -0.26);
        assert_eq!(position.profit_loss_percent, -0.024);
    }

    #[test]
    fn test_sell_position_profits_when_price_falls() {
        let mut position = Position::new("2", "AAPL", OrderSide::Sell, 10.0, 232.64, "now");
        position.revalue_at(230.64);

        assert_eq!(position.profit_loss, 20.0);
        assert_eq!(position.profit_loss_percent, 0.86);
    }

    #[test]
    fn test_order_ticket_defaults() {
        let ticket: OrderTicket =
            serde_json::from_str(r#"{"symbol":"BTC","side":"buy","quantity":0.5}"#).unwrap();
        assert_eq!(ticket.order_type, OrderType::Market);
        assert_eq!(ticket.quantity, Some(0.5));
        assert!(ticket.price.is_none());
    }
}
