//! Weight-diff order generation for the weight-target family.
//!
//! Given target weights, compute target amounts from the tradable portfolio
//! value and emit the orders that move current holdings onto them.

use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

use crate::domain::{InstrumentId, Order, TargetWeights, TradeWindow};
use crate::ledger::PositionLedger;
use crate::venue::Venue;

/// Converts target weights into orders.
pub trait OrderGenerator: Send + Sync {
    fn diff_to_orders(
        &self,
        holdings: &dyn PositionLedger,
        venue: &dyn Venue,
        risk_degree: f64,
        targets: &TargetWeights,
        pred_window: TradeWindow,
        trade_window: TradeWindow,
    ) -> Vec<Order>;
}

/// Diffs target amounts against holdings at trade-window prices.
///
/// `(1 - risk_degree)` of the total portfolio value is held back as cash.
/// The remaining budget is taken from the tradable part of the portfolio
/// (cash plus tradable positions). Non-tradable positions are left as they
/// are. Sells come before buys; within each side instruments are in id order.
#[derive(Debug, Clone, Copy, Default)]
pub struct WeightDiffOrderGenerator;

impl OrderGenerator for WeightDiffOrderGenerator {
    fn diff_to_orders(
        &self,
        holdings: &dyn PositionLedger,
        venue: &dyn Venue,
        risk_degree: f64,
        targets: &TargetWeights,
        _pred_window: TradeWindow,
        trade_window: TradeWindow,
    ) -> Vec<Order> {
        let price = |id: &str| {
            venue
                .deal_price(id, trade_window)
                .filter(|p| p.is_finite() && *p > 0.0)
        };

        let held = holdings.held_instruments();
        let mut total_value = holdings.cash();
        let mut tradable_value = holdings.cash();
        for id in &held {
            let Some(p) = price(id.as_str()) else { continue };
            let value = holdings.held_amount(id) * p;
            total_value += value;
            if venue.is_tradable(id, trade_window) {
                tradable_value += value;
            }
        }

        let budget = tradable_value - (1.0 - risk_degree) * total_value;
        if budget < 0.0 {
            debug!(budget, "weight diff skipped: reserved cash exceeds tradable value");
            return Vec::new();
        }

        let mut target_amounts: BTreeMap<&str, f64> = BTreeMap::new();
        for (id, weight) in targets.iter() {
            if !venue.is_tradable(id, trade_window) {
                continue;
            }
            let Some(p) = price(id) else { continue };
            let factor = venue.factor(id, trade_window);
            target_amounts.insert(id, venue.round_to_trade_unit(budget * weight / p, factor));
        }

        let universe: BTreeSet<&str> = held
            .iter()
            .map(String::as_str)
            .chain(targets.instruments().map(String::as_str))
            .collect();

        let mut sells = Vec::new();
        let mut buys = Vec::new();
        for id in universe {
            if !venue.is_tradable(id, trade_window) {
                continue;
            }
            let current = holdings.held_amount(id);
            let target = target_amounts.get(id).copied().unwrap_or(0.0);
            let delta = target - current;
            let factor = venue.factor(id, trade_window);
            let instrument: InstrumentId = id.to_string();
            if delta < 0.0 {
                sells.push(Order::sell(instrument, -delta, trade_window, factor));
            } else if delta > 0.0 {
                buys.push(Order::buy(instrument, delta, trade_window, factor));
            }
        }

        sells.extend(buys);
        sells
    }
}
