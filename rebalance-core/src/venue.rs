//! Venue (tradability oracle) interface.
//!
//! The venue answers price, tradability and lot-rounding questions for a
//! trade window, decides whether an order is admissible, and prices a deal
//! against a holdings view. It never mutates holdings.

use crate::domain::{Order, TradeWindow};
use crate::ledger::PositionLedger;
use serde::{Deserialize, Serialize};

/// Outcome of settling one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    /// Amount actually dealt.
    pub amount: f64,
    /// Gross trade value (`amount * price`).
    pub value: f64,
    /// Transaction cost.
    pub cost: f64,
    /// Deal price.
    pub price: f64,
}

impl Settlement {
    pub fn empty() -> Self {
        Self { amount: 0.0, value: 0.0, cost: 0.0, price: 0.0 }
    }
}

pub trait Venue {
    /// Whether the instrument can be traded in the window.
    fn is_tradable(&self, instrument: &str, window: TradeWindow) -> bool;

    /// Deal price for the window, if the venue has one.
    fn deal_price(&self, instrument: &str, window: TradeWindow) -> Option<f64>;

    /// Price-rounding (adjustment) factor for the window.
    fn factor(&self, instrument: &str, window: TradeWindow) -> f64;

    /// Round a raw amount down to the venue's tradable unit.
    fn round_to_trade_unit(&self, amount: f64, factor: f64) -> f64;

    /// Whether the order would be accepted.
    fn is_admissible(&self, order: &Order) -> bool;

    /// Price the deal for `order` against `holdings`.
    fn settle(&self, order: &Order, holdings: &dyn PositionLedger) -> Settlement;
}
