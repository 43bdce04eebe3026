//! Order Desk
//!
//! Accepts order panel tickets, validates them and logs the intent. Nothing
//! is executed and no position is opened.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use super::terminal::{normalize_symbol, Terminal};
use crate::types::{OrderAck, OrderTicket, OrderType};

/// Order ticket rejections.
#[derive(Debug, Error, PartialEq)]
pub enum OrderError {
    #[error("Invalid order: {0}")]
    InvalidOrder(String),

    #[error("No price data available for {0}")]
    NoPriceData(String),
}

/// Validates and logs order tickets against the terminal's prices.
pub struct OrderDesk {
    terminal: Arc<Terminal>,
}

impl OrderDesk {
    pub fn new(terminal: Arc<Terminal>) -> Arc<Self> {
        Arc::new(Self { terminal })
    }

    /// Validate `ticket` and log it as an order intent.
    pub async fn submit(&self, ticket: OrderTicket) -> Result<OrderAck, OrderError> {
        let symbol = normalize_symbol(&ticket.symbol)
            .ok_or_else(|| OrderError::InvalidOrder("symbol is required".to_string()))?;

        let quantity = match ticket.quantity {
            Some(q) if is_positive(q) => q,
            _ => {
                return Err(OrderError::InvalidOrder(
                    "quantity must be greater than zero".to_string(),
                ))
            }
        };

        for (field, value) in [
            ("take profit", ticket.take_profit),
            ("stop loss", ticket.stop_loss),
        ] {
            if let Some(v) = value {
                if !is_positive(v) {
                    return Err(OrderError::InvalidOrder(format!("{} must be positive", field)));
                }
            }
        }

        let reference_price = match ticket.order_type {
            OrderType::Limit => match ticket.price {
                Some(p) if is_positive(p) => p,
                _ => {
                    return Err(OrderError::InvalidOrder(
                        "limit orders require a positive price".to_string(),
                    ))
                }
            },
            OrderType::Market => self
                .terminal
                .reference_price(&symbol)
                .await
                .ok_or_else(|| OrderError::NoPriceData(symbol.clone()))?,
        };

        let ack = OrderAck {
            intent_id: Uuid::new_v4(),
            symbol,
            side: ticket.side,
            order_type: ticket.order_type,
            quantity,
            reference_price,
            logged_at: Utc::now().timestamp_millis(),
        };

        info!(
            intent_id = %ack.intent_id,
            symbol = %ack.symbol,
            side = %ack.side,
            order_type = %ack.order_type,
            quantity,
            reference_price,
            take_profit = ?ticket.take_profit,
            stop_loss = ?ticket.stop_loss,
            "order intent logged"
        );

        Ok(ack)
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
