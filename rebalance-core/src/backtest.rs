//! Period-by-period backtest driver.
//!
//! For each trade period after the first:
//! 1. Build the `PeriodContext` (trade window, previous-period prediction window)
//! 2. Ask the strategy for orders, with a per-period seeded RNG
//! 3. Execute the orders in sequence against the `SimLedger`
//! 4. Advance held-period counters and mark the ledger to market

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::calendar::TradingCalendar;
use crate::domain::{InstrumentId, Order, OrderDirection, TradeWindow};
use crate::ledger::PositionLedger;
use crate::rng::RngHierarchy;
use crate::scores::ScoreProvider;
use crate::sim::SimLedger;
use crate::strategy::{PeriodContext, Strategy, StrategyError};
use crate::venue::Venue;

/// An order the ledger accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutedTrade {
    pub instrument: InstrumentId,
    pub direction: OrderDirection,
    pub amount: f64,
    pub price: f64,
    pub value: f64,
    pub cost: f64,
}

/// Outcome of one period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodReport {
    pub trade_index: usize,
    pub window: TradeWindow,
    pub orders: Vec<Order>,
    pub executed: Vec<ExecutedTrade>,
    pub rejected: usize,
    pub cash: f64,
    pub value: f64,
    pub positions: usize,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy: String,
    pub seed: u64,
    pub periods: Vec<PeriodReport>,
}

impl BacktestReport {
    pub fn final_value(&self) -> Option<f64> {
        self.periods.last().map(|p| p.value)
    }

    pub fn total_cost(&self) -> f64 {
        self.periods
            .iter()
            .flat_map(|p| p.executed.iter())
            .map(|t| t.cost)
            .sum()
    }

    pub fn order_count(&self) -> usize {
        self.periods.iter().map(|p| p.orders.len()).sum()
    }
}

pub struct Backtester<'a> {
    calendar: &'a TradingCalendar,
    venue: &'a dyn Venue,
    scores: &'a dyn ScoreProvider,
    rng: RngHierarchy,
}

impl<'a> Backtester<'a> {
    pub fn new(
        calendar: &'a TradingCalendar,
        venue: &'a dyn Venue,
        scores: &'a dyn ScoreProvider,
        seed: u64,
    ) -> Self {
        Self { calendar, venue, scores, rng: RngHierarchy::new(seed) }
    }

    /// Run `strategy` over every period of the calendar, mutating `ledger`.
    pub fn run(
        &self,
        strategy: &dyn Strategy,
        ledger: &mut SimLedger,
    ) -> Result<BacktestReport, StrategyError> {
        let mut report = BacktestReport {
            strategy: strategy.name().to_string(),
            seed: self.rng.master_seed(),
            periods: Vec::with_capacity(self.calendar.len()),
        };

        for trade_index in 1..self.calendar.len() {
            let (Some(trade_window), Some(pred_window)) = (
                self.calendar.trade_window(trade_index),
                self.calendar.pred_window(trade_index),
            ) else {
                continue;
            };
            let period = self.run_period(strategy, ledger, trade_index, trade_window, pred_window)?;
            report.periods.push(period);
        }

        Ok(report)
    }

    /// Decide and execute a single period.
    pub fn run_period(
        &self,
        strategy: &dyn Strategy,
        ledger: &mut SimLedger,
        trade_index: usize,
        trade_window: TradeWindow,
        pred_window: TradeWindow,
    ) -> Result<PeriodReport, StrategyError> {
        let ctx = PeriodContext {
            trade_index,
            trade_window,
            pred_window,
            venue: self.venue,
            scores: self.scores,
        };
        let mut rng = self.rng.rng_for(strategy.name(), trade_index as u64);
        let orders = strategy.generate_orders(&ctx, &*ledger, &mut rng)?;

        let mut executed = Vec::with_capacity(orders.len());
        let mut rejected = 0;
        for order in &orders {
            if !self.venue.is_admissible(order) {
                rejected += 1;
                continue;
            }
            let settlement = self.venue.settle(order, &*ledger);
            if ledger.apply(order, &settlement) {
                executed.push(ExecutedTrade {
                    instrument: order.instrument().to_string(),
                    direction: order.direction(),
                    amount: settlement.amount,
                    price: settlement.price,
                    value: settlement.value,
                    cost: settlement.cost,
                });
            } else {
                debug!(instrument = order.instrument(), amount = order.amount(), "order not executed");
                rejected += 1;
            }
        }

        ledger.end_period();
        let value = ledger.value(self.venue, trade_window);
        let positions = ledger.holdings().len();

        info!(
            trade_index,
            window = %trade_window,
            orders = orders.len(),
            executed = executed.len(),
            rejected,
            cash = ledger.cash(),
            value,
            "period complete"
        );

        Ok(PeriodReport {
            trade_index,
            window: trade_window,
            orders,
            executed,
            rejected,
            cash: ledger.cash(),
            value,
            positions,
        })
    }
}
