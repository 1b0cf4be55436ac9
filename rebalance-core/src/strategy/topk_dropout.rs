//! Top-k/drop-n strategy: hold `topk` instruments, replace at most `n_drop`
//! of them per period.

use rand::{Rng, RngCore};

use crate::config::{ConfigError, TopkDropoutConfig};
use crate::domain::{Order, ScoreSnapshot, TradeWindow};
use crate::ledger::PositionLedger;
use crate::venue::Venue;

use super::filter::{HoldDurationFilter, TradabilityFilter};
use super::selection::{Selection, SelectionEngine};
use super::selector::SelectionMode;
use super::synthesizer::OrderSynthesizer;
use super::{PeriodContext, Strategy, StrategyError};

#[derive(Debug, Clone)]
pub struct TopkDropoutStrategy {
    config: TopkDropoutConfig,
    engine: SelectionEngine,
    synthesizer: OrderSynthesizer,
}

impl TopkDropoutStrategy {
    /// Build the strategy, resolving selection methods and validating
    /// parameters. Fails before any period is processed.
    pub fn new(config: TopkDropoutConfig) -> Result<Self, ConfigError> {
        let buy_mode = SelectionMode::for_buy(&config.method_buy)?;
        let sell_mode = SelectionMode::for_sell(&config.method_sell)?;
        config.validate()?;

        let engine = SelectionEngine::new(config.topk, config.n_drop, buy_mode, sell_mode);
        let synthesizer = OrderSynthesizer::new(HoldDurationFilter::new(config.hold_thresh));
        Ok(Self { config, engine, synthesizer })
    }

    pub fn config(&self) -> &TopkDropoutConfig {
        &self.config
    }

    /// Fraction of cash deployed into buys for the given period.
    pub fn risk_degree(&self, _trade_index: usize) -> f64 {
        self.config.risk_degree
    }

    /// Selection step only: sell and buy sets for `ledger` under `scores`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        scores: &ScoreSnapshot,
        ledger: &dyn PositionLedger,
        venue: &dyn Venue,
        trade_window: TradeWindow,
        rng: &mut R,
    ) -> Selection {
        let filter = TradabilityFilter::new(venue, trade_window, self.config.only_tradable);
        self.engine.select(scores, &ledger.held_instruments(), &filter, rng)
    }
}

impl Strategy for TopkDropoutStrategy {
    fn name(&self) -> &str {
        "topk_dropout"
    }

    fn generate_orders(
        &self,
        ctx: &PeriodContext<'_>,
        ledger: &dyn PositionLedger,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Order>, StrategyError> {
        let Some(scores) = ctx.scores.scores(ctx.pred_window).filter(|s| !s.is_empty()) else {
            return Ok(Vec::new());
        };

        let selection = self.select(&scores, ledger, ctx.venue, ctx.trade_window, rng);
        Ok(self.synthesizer.synthesize(
            &selection.sell,
            &selection.buy,
            ledger,
            ctx.venue,
            ctx.trade_window,
            self.risk_degree(ctx.trade_index),
        ))
    }
}
