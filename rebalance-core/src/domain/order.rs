//! Trade intents emitted by strategies.
//!
//! An `Order` is immutable once built: strategies create them, execution
//! components consume them. Nothing in this crate fills or amends an order.

use super::window::TradeWindow;
use super::InstrumentId;
use serde::{Deserialize, Serialize};

/// Signed trade direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderDirection {
    Sell,
    Buy,
}

impl OrderDirection {
    /// +1 for buys, -1 for sells.
    pub fn sign(self) -> f64 {
        match self {
            Self::Buy => 1.0,
            Self::Sell => -1.0,
        }
    }
}

/// A single trade intent for one instrument over one trade window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    instrument: InstrumentId,
    amount: f64,
    window: TradeWindow,
    direction: OrderDirection,
    /// Price-rounding factor reported by the venue at synthesis time.
    factor: f64,
}

impl Order {
    pub fn new(
        instrument: InstrumentId,
        amount: f64,
        window: TradeWindow,
        direction: OrderDirection,
        factor: f64,
    ) -> Self {
        Self { instrument, amount, window, direction, factor }
    }

    pub fn sell(instrument: InstrumentId, amount: f64, window: TradeWindow, factor: f64) -> Self {
        Self::new(instrument, amount, window, OrderDirection::Sell, factor)
    }

    pub fn buy(instrument: InstrumentId, amount: f64, window: TradeWindow, factor: f64) -> Self {
        Self::new(instrument, amount, window, OrderDirection::Buy, factor)
    }

    pub fn instrument(&self) -> &str {
        &self.instrument
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn window(&self) -> TradeWindow {
        self.window
    }

    pub fn direction(&self) -> OrderDirection {
        self.direction
    }

    pub fn factor(&self) -> f64 {
        self.factor
    }

    pub fn is_buy(&self) -> bool {
        self.direction == OrderDirection::Buy
    }

    pub fn is_sell(&self) -> bool {
        self.direction == OrderDirection::Sell
    }

    /// Amount with the direction sign applied.
    pub fn signed_amount(&self) -> f64 {
        self.direction.sign() * self.amount
    }
}
