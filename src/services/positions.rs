//! Position Revaluer
//!
//! Keeps the set of open positions and re-marks them on every tick. The mark
//! walk is independent of the quote simulator.

use rand::Rng;
use tracing::debug;

use crate::types::{round_to, seed_positions, Position, PositionsSnapshot};

/// Fraction of the mark price a single tick can move (before the ±0.5 draw).
pub const MARK_VOLATILITY: f64 = 0.001;

/// Ordered set of open positions.
#[derive(Debug, Clone, Default)]
pub struct PositionBook {
    positions: Vec<Position>,
}

impl PositionBook {
    pub fn new(positions: Vec<Position>) -> Self {
        Self { positions }
    }

    /// Book holding only the demonstration position.
    pub fn seeded() -> Self {
        Self::new(seed_positions())
    }

    /// Open positions in insertion order.
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    pub fn get(&self, id: &str) -> Option<&Position> {
        self.positions.iter().find(|p| p.id == id)
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Add an externally created position, replacing one with the same id.
    pub fn open(&mut self, position: Position) {
        match self.positions.iter_mut().find(|p| p.id == position.id) {
            Some(existing) => *existing = position,
            None => self.positions.push(position),
        }
    }

    /// Remove a position. Returns whether anything was removed; closing an
    /// unknown id is a no-op.
    pub fn close(&mut self, id: &str) -> bool {
        let before = self.positions.len();
        self.positions.retain(|p| p.id != id);
        let removed = self.positions.len() != before;
        if removed {
            debug!(id, "position closed");
        }
        removed
    }

    /// Force the mark price of one position. Returns false if it is not open.
    pub fn revalue_at(&mut self, id: &str, price: f64) -> bool {
        match self.positions.iter_mut().find(|p| p.id == id) {
            Some(position) => {
                position.revalue_at(price);
                true
            }
            None => false,
        }
    }

    /// Re-mark every position using the thread-local RNG.
    pub fn tick(&mut self) {
        let mut rng = rand::thread_rng();
        self.tick_with(&mut rng);
    }

    /// Re-mark every position drawing from `rng`.
    pub fn tick_with<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for position in &mut self.positions {
            let u: f64 = rng.gen_range(-0.5..0.5);
            let delta = u * MARK_VOLATILITY * position.current_price;
            position.revalue_at(position.current_price + delta);
        }
    }

    /// Sum of P/L over the open positions, recomputed on every call.
    pub fn total_profit_loss(&self) -> f64 {
        let total: f64 = self.positions.iter().map(|p| p.profit_loss).sum();
        round_to(total, 2)
    }

    pub fn snapshot(&self) -> PositionsSnapshot {
        PositionsSnapshot {
            positions: self.positions.clone(),
            total_profit_loss: self.total_profit_loss(),
        }
    }
}
