//! Order synthesizer: turns sell/buy sets into concrete orders.
//!
//! Sells are synthesized first and settled against a `WorkingHoldings` so the
//! cash they free can fund the buys of the same period. Buys split
//! `cash * risk_degree` evenly across the buy set.

use tracing::{debug, warn};

use crate::domain::{InstrumentId, Order, TradeWindow};
use crate::ledger::{PositionLedger, WorkingHoldings};
use crate::venue::Venue;

use super::filter::HoldDurationFilter;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderSynthesizer {
    hold: HoldDurationFilter,
}

impl OrderSynthesizer {
    pub fn new(hold: HoldDurationFilter) -> Self {
        Self { hold }
    }

    /// Build the period's orders: every admissible sell, then every buy.
    pub fn synthesize(
        &self,
        sell: &[InstrumentId],
        buy: &[InstrumentId],
        ledger: &dyn PositionLedger,
        venue: &dyn Venue,
        window: TradeWindow,
        risk_degree: f64,
    ) -> Vec<Order> {
        let mut working = WorkingHoldings::new(ledger);
        self.synthesize_sells(sell, &mut working, venue, window);

        let cash = working.cash();
        let mut orders = working.pending().to_vec();
        drop(working);

        let notional = buy_notional(cash, risk_degree, buy.len());
        orders.extend(self.synthesize_buys(buy, notional, venue, window));
        orders
    }

    fn synthesize_sells(
        &self,
        sell: &[InstrumentId],
        working: &mut WorkingHoldings<'_>,
        venue: &dyn Venue,
        window: TradeWindow,
    ) {
        for id in sell {
            if !venue.is_tradable(id, window) {
                debug!(instrument = %id, "sell skipped: not tradable");
                continue;
            }
            if !self.hold.allows_sale(&*working, id) {
                debug!(
                    instrument = %id,
                    held_periods = working.held_periods(id),
                    hold_thresh = self.hold.hold_thresh(),
                    "sell skipped: below hold threshold"
                );
                continue;
            }
            let order = Order::sell(id.clone(), working.held_amount(id), window, venue.factor(id, window));
            if !venue.is_admissible(&order) {
                debug!(instrument = %id, amount = order.amount(), "sell dropped: rejected by venue");
                continue;
            }
            let settlement = venue.settle(&order, &*working);
            working.record(&order, &settlement);
        }
    }

    fn synthesize_buys(
        &self,
        buy: &[InstrumentId],
        notional: f64,
        venue: &dyn Venue,
        window: TradeWindow,
    ) -> Vec<Order> {
        let mut orders = Vec::with_capacity(buy.len());
        for id in buy {
            if !venue.is_tradable(id, window) {
                debug!(instrument = %id, "buy skipped: not tradable");
                continue;
            }
            let Some(price) = venue.deal_price(id, window).filter(|p| p.is_finite() && *p > 0.0) else {
                warn!(instrument = %id, %window, "buy skipped: no usable deal price");
                continue;
            };
            let factor = venue.factor(id, window);
            let amount = venue.round_to_trade_unit(notional / price, factor);
            orders.push(Order::buy(id.clone(), amount, window, factor));
        }
        orders
    }
}

/// Per-instrument buy notional: `cash * risk_degree / n`, or zero when there
/// is nothing to buy.
pub fn buy_notional(cash: f64, risk_degree: f64, n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        cash * risk_degree / n as f64
    }
}
