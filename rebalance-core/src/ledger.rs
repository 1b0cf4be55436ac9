//! Position ledger interface and the per-call working view over it.
//!
//! The authoritative ledger is owned by the caller. Strategies only read it;
//! when a strategy needs to estimate post-sell cash it records simulated
//! settlements into a `WorkingHoldings`, which borrows the ledger immutably
//! and is dropped at the end of the call.

use std::collections::BTreeMap;

use crate::domain::{InstrumentId, Order};
use crate::venue::Settlement;

/// Read-only access to cash and holdings.
pub trait PositionLedger {
    /// Available cash.
    fn cash(&self) -> f64;

    /// Instruments with a non-zero held amount, sorted by id.
    fn held_instruments(&self) -> Vec<InstrumentId>;

    /// Held amount (0.0 when not held).
    fn held_amount(&self, instrument: &str) -> f64;

    /// Number of periods the instrument has been continuously held.
    fn held_periods(&self, instrument: &str) -> u32;
}

/// Scratch view used while synthesizing orders within one call.
///
/// Holds a running cash total seeded from the ledger, per-instrument amount
/// deltas produced by simulated settlements, and the orders recorded so far.
/// The underlying ledger is never written to.
pub struct WorkingHoldings<'a> {
    base: &'a dyn PositionLedger,
    cash: f64,
    deltas: BTreeMap<InstrumentId, f64>,
    pending: Vec<Order>,
}

impl<'a> WorkingHoldings<'a> {
    pub fn new(base: &'a dyn PositionLedger) -> Self {
        Self {
            base,
            cash: base.cash(),
            deltas: BTreeMap::new(),
            pending: Vec::new(),
        }
    }

    /// Record a simulated settlement of `order`.
    ///
    /// Sells add `value - cost` to the running cash, buys subtract
    /// `value + cost`.
    pub fn record(&mut self, order: &Order, settlement: &Settlement) {
        let delta = self.deltas.entry(order.instrument().to_string()).or_insert(0.0);
        if order.is_sell() {
            *delta -= settlement.amount;
            self.cash += settlement.value - settlement.cost;
        } else {
            *delta += settlement.amount;
            self.cash -= settlement.value + settlement.cost;
        }
        self.pending.push(order.clone());
    }

    /// Orders recorded so far, in recording order.
    pub fn pending(&self) -> &[Order] {
        &self.pending
    }
}

impl PositionLedger for WorkingHoldings<'_> {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn held_instruments(&self) -> Vec<InstrumentId> {
        let mut ids: Vec<InstrumentId> = self
            .base
            .held_instruments()
            .into_iter()
            .chain(self.deltas.keys().cloned())
            .filter(|id| self.held_amount(id) > 0.0)
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }

    fn held_amount(&self, instrument: &str) -> f64 {
        let amount = self.base.held_amount(instrument)
            + self.deltas.get(instrument).copied().unwrap_or(0.0);
        amount.max(0.0)
    }

    fn held_periods(&self, instrument: &str) -> u32 {
        self.base.held_periods(instrument)
    }
}
