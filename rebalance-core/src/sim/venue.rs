//! Quote-table venue.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::config::VenueConfig;
use crate::domain::{InstrumentId, Order, OrderDirection, TradeWindow};
use crate::ledger::PositionLedger;
use crate::venue::{Settlement, Venue};

/// One instrument's market data for one date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    pub price: f64,
    /// Adjustment factor; amounts are rounded in unadjusted units.
    pub factor: f64,
    /// False when the instrument is suspended or limit-locked.
    pub tradable: bool,
}

impl Quote {
    fn is_usable(&self) -> bool {
        self.tradable && self.price.is_finite() && self.price > 0.0
    }
}

/// Venue backed by a per-instrument, per-date quote table.
///
/// Lookups for a multi-date window use the last quote inside the window.
#[derive(Debug, Clone)]
pub struct SimVenue {
    quotes: BTreeMap<InstrumentId, BTreeMap<NaiveDate, Quote>>,
    config: VenueConfig,
}

impl SimVenue {
    pub fn new(config: VenueConfig) -> Self {
        Self { quotes: BTreeMap::new(), config }
    }

    pub fn config(&self) -> &VenueConfig {
        &self.config
    }

    pub fn insert_quote(&mut self, date: NaiveDate, instrument: impl Into<InstrumentId>, quote: Quote) {
        self.quotes.entry(instrument.into()).or_default().insert(date, quote);
    }

    /// All quoted dates across instruments, sorted.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = self
            .quotes
            .values()
            .flat_map(|by_date| by_date.keys().copied())
            .collect();
        dates.sort();
        dates.dedup();
        dates
    }

    pub fn quote(&self, instrument: &str, window: TradeWindow) -> Option<&Quote> {
        self.quotes
            .get(instrument)?
            .range(window.start..=window.end)
            .next_back()
            .map(|(_, q)| q)
    }

    /// Transaction cost for a deal of `value`.
    pub fn cost(&self, direction: OrderDirection, value: f64) -> f64 {
        if value <= 0.0 {
            return 0.0;
        }
        let rate = match direction {
            OrderDirection::Buy => self.config.open_cost,
            OrderDirection::Sell => self.config.close_cost,
        };
        (value * rate).max(self.config.min_cost)
    }
}

impl Venue for SimVenue {
    fn is_tradable(&self, instrument: &str, window: TradeWindow) -> bool {
        self.quote(instrument, window).is_some_and(Quote::is_usable)
    }

    fn deal_price(&self, instrument: &str, window: TradeWindow) -> Option<f64> {
        self.quote(instrument, window)
            .map(|q| q.price)
            .filter(|p| p.is_finite() && *p > 0.0)
    }

    fn factor(&self, instrument: &str, window: TradeWindow) -> f64 {
        self.quote(instrument, window)
            .map(|q| q.factor)
            .filter(|f| f.is_finite() && *f > 0.0)
            .unwrap_or(1.0)
    }

    fn round_to_trade_unit(&self, amount: f64, factor: f64) -> f64 {
        match self.config.trade_unit {
            Some(unit) if unit > 0.0 && factor > 0.0 => {
                ((amount * factor + 0.1) / unit).floor() * unit / factor
            }
            _ => amount,
        }
    }

    fn is_admissible(&self, order: &Order) -> bool {
        order.amount().is_finite()
            && order.amount() > 0.0
            && self.is_tradable(order.instrument(), order.window())
    }

    fn settle(&self, order: &Order, holdings: &dyn PositionLedger) -> Settlement {
        let Some(price) = self.deal_price(order.instrument(), order.window()) else {
            return Settlement::empty();
        };
        let amount = match order.direction() {
            OrderDirection::Sell => order.amount().min(holdings.held_amount(order.instrument())),
            OrderDirection::Buy => order.amount(),
        };
        let value = amount * price;
        Settlement { amount, value, cost: self.cost(order.direction(), value), price }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimLedger;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 8, day).unwrap()
    }

    fn venue(config: VenueConfig) -> SimVenue {
        let mut v = SimVenue::new(config);
        v.insert_quote(d(1), "A", Quote { price: 10.0, factor: 1.0, tradable: true });
        v.insert_quote(d(2), "A", Quote { price: 12.0, factor: 2.0, tradable: true });
        v.insert_quote(d(2), "S", Quote { price: 5.0, factor: 1.0, tradable: false });
        v
    }

    #[test]
    fn window_uses_last_quote() {
        let v = venue(VenueConfig::default());
        assert_eq!(v.deal_price("A", TradeWindow::new(d(1), d(3))), Some(12.0));
        assert_eq!(v.deal_price("A", TradeWindow::day(d(1))), Some(10.0));
        assert_eq!(v.factor("A", TradeWindow::day(d(2))), 2.0);
        assert!(v.deal_price("A", TradeWindow::day(d(5))).is_none());
        assert_eq!(v.dates(), vec![d(1), d(2)]);
    }

    #[test]
    fn suspended_or_unquoted_is_untradable() {
        let v = venue(VenueConfig::default());
        assert!(v.is_tradable("A", TradeWindow::day(d(1))));
        assert!(!v.is_tradable("S", TradeWindow::day(d(2))));
        assert!(!v.is_tradable("Q", TradeWindow::day(d(2))));
    }

    #[test]
    fn rounds_to_lot_in_unadjusted_units() {
        let v = venue(VenueConfig { trade_unit: Some(100.0), ..VenueConfig::default() });
        assert_eq!(v.round_to_trade_unit(237.5, 1.0), 200.0);
        assert_eq!(v.round_to_trade_unit(99.95, 1.0), 100.0);
        assert_eq!(v.round_to_trade_unit(60.0, 2.0), 50.0);
        let fractional = venue(VenueConfig::default());
        assert_eq!(fractional.round_to_trade_unit(237.5, 1.0), 237.5);
    }

    #[test]
    fn costs_respect_minimum() {
        let v = venue(VenueConfig {
            open_cost: 0.001,
            close_cost: 0.002,
            min_cost: 5.0,
            ..VenueConfig::default()
        });
        assert_eq!(v.cost(OrderDirection::Buy, 1_000.0), 5.0);
        assert_eq!(v.cost(OrderDirection::Sell, 10_000.0), 20.0);
        assert_eq!(v.cost(OrderDirection::Sell, 0.0), 0.0);
    }

    #[test]
    fn sell_settlement_caps_at_held_amount() {
        let v = venue(VenueConfig::default());
        let mut ledger = SimLedger::new(0.0);
        ledger.set_holding("A", 30.0, 2);
        let order = Order::sell("A".into(), 50.0, TradeWindow::day(d(1)), 1.0);
        let s = v.settle(&order, &ledger);
        assert_eq!(s.amount, 30.0);
        assert_eq!(s.value, 300.0);
        assert_eq!(s.price, 10.0);
    }

    #[test]
    fn admissibility() {
        let v = venue(VenueConfig::default());
        let w = TradeWindow::day(d(2));
        assert!(v.is_admissible(&Order::buy("A".into(), 1.0, w, 1.0)));
        assert!(!v.is_admissible(&Order::buy("A".into(), 0.0, w, 1.0)));
        assert!(!v.is_admissible(&Order::sell("S".into(), 1.0, w, 1.0)));
    }
}
