//! Cash and holdings with held-period counters.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::domain::{InstrumentId, Order, TradeWindow};
use crate::ledger::PositionLedger;
use crate::venue::{Settlement, Venue};

/// Amounts below this are treated as flat.
const FLAT_EPSILON: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Holding {
    pub amount: f64,
    /// Periods held continuously; zero in the period of purchase.
    pub periods: u32,
}

/// Authoritative ledger for simulated runs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimLedger {
    cash: f64,
    holdings: BTreeMap<InstrumentId, Holding>,
}

impl SimLedger {
    pub fn new(cash: f64) -> Self {
        Self { cash, holdings: BTreeMap::new() }
    }

    pub fn set_holding(&mut self, instrument: impl Into<InstrumentId>, amount: f64, periods: u32) {
        self.holdings.insert(instrument.into(), Holding { amount, periods });
    }

    pub fn holdings(&self) -> &BTreeMap<InstrumentId, Holding> {
        &self.holdings
    }

    /// Apply a settled order. Returns `false` (and changes nothing) when a
    /// buy costs more than the available cash or the settlement is empty.
    pub fn apply(&mut self, order: &Order, settlement: &Settlement) -> bool {
        if settlement.amount <= 0.0 {
            return false;
        }
        let id = order.instrument();
        if order.is_buy() {
            let outlay = settlement.value + settlement.cost;
            if outlay > self.cash + FLAT_EPSILON {
                return false;
            }
            self.cash -= outlay;
            let holding = self
                .holdings
                .entry(id.to_string())
                .or_insert(Holding { amount: 0.0, periods: 0 });
            holding.amount += settlement.amount;
        } else {
            let Some(holding) = self.holdings.get_mut(id) else {
                return false;
            };
            let sold = settlement.amount.min(holding.amount);
            holding.amount -= sold;
            self.cash += sold * settlement.price - settlement.cost;
            if holding.amount <= FLAT_EPSILON {
                self.holdings.remove(id);
            }
        }
        true
    }

    /// Advance the held-period counter of every position by one.
    pub fn end_period(&mut self) {
        for holding in self.holdings.values_mut() {
            holding.periods += 1;
        }
    }

    /// Cash plus holdings marked at the window's deal prices. Instruments
    /// without a price contribute nothing.
    pub fn value(&self, venue: &dyn Venue, window: TradeWindow) -> f64 {
        self.cash
            + self
                .holdings
                .iter()
                .filter_map(|(id, h)| venue.deal_price(id, window).map(|p| h.amount * p))
                .sum::<f64>()
    }
}

impl PositionLedger for SimLedger {
    fn cash(&self) -> f64 {
        self.cash
    }

    fn held_instruments(&self) -> Vec<InstrumentId> {
        self.holdings
            .iter()
            .filter(|(_, h)| h.amount > FLAT_EPSILON)
            .map(|(id, _)| id.clone())
            .collect()
    }

    fn held_amount(&self, instrument: &str) -> f64 {
        self.holdings.get(instrument).map_or(0.0, |h| h.amount)
    }

    fn held_periods(&self, instrument: &str) -> u32 {
        self.holdings.get(instrument).map_or(0, |h| h.periods)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn window() -> TradeWindow {
        TradeWindow::day(NaiveDate::from_ymd_opt(2024, 9, 2).unwrap())
    }

    #[test]
    fn buy_then_sell_round_trip() {
        let mut ledger = SimLedger::new(1_000.0);
        let buy = Order::buy("A".into(), 10.0, window(), 1.0);
        assert!(ledger.apply(&buy, &Settlement { amount: 10.0, value: 500.0, cost: 1.0, price: 50.0 }));
        assert_eq!(ledger.cash(), 499.0);
        assert_eq!(ledger.held_amount("A"), 10.0);
        assert_eq!(ledger.held_periods("A"), 0);

        ledger.end_period();
        assert_eq!(ledger.held_periods("A"), 1);

        let sell = Order::sell("A".into(), 10.0, window(), 1.0);
        assert!(ledger.apply(&sell, &Settlement { amount: 10.0, value: 600.0, cost: 2.0, price: 60.0 }));
        assert_eq!(ledger.cash(), 1_097.0);
        assert!(ledger.held_instruments().is_empty());
        assert_eq!(ledger.held_periods("A"), 0);
    }

    #[test]
    fn unaffordable_buy_is_rejected() {
        let mut ledger = SimLedger::new(100.0);
        let buy = Order::buy("A".into(), 10.0, window(), 1.0);
        assert!(!ledger.apply(&buy, &Settlement { amount: 10.0, value: 500.0, cost: 0.0, price: 50.0 }));
        assert_eq!(ledger.cash(), 100.0);
        assert!(ledger.held_instruments().is_empty());
    }

    #[test]
    fn topping_up_keeps_period_count() {
        let mut ledger = SimLedger::new(1_000.0);
        ledger.set_holding("A", 5.0, 3);
        let buy = Order::buy("A".into(), 5.0, window(), 1.0);
        assert!(ledger.apply(&buy, &Settlement { amount: 5.0, value: 50.0, cost: 0.0, price: 10.0 }));
        assert_eq!(ledger.held_amount("A"), 10.0);
        assert_eq!(ledger.held_periods("A"), 3);
    }
}
