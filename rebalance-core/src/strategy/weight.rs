//! Weight-target strategies.
//!
//! A `TargetWeightTranslator` decides *what* to hold; an `OrderGenerator`
//! decides *how* to get there. `WeightStrategy` composes the two.

use rand::RngCore;

use crate::domain::{Order, ScoreSnapshot, TargetWeights, TradeWindow};
use crate::ledger::PositionLedger;

use super::order_gen::{OrderGenerator, WeightDiffOrderGenerator};
use super::{PeriodContext, Strategy, StrategyError};

/// Maps a score snapshot and current holdings to target weights.
///
/// Weights exclude cash. Implementors must override `target_weights`; the
/// provided body reports `StrategyError::NotImplemented`.
pub trait TargetWeightTranslator: Send + Sync {
    fn name(&self) -> &str {
        "weight_target"
    }

    fn target_weights(
        &self,
        scores: &ScoreSnapshot,
        holdings: &dyn PositionLedger,
        trade_window: TradeWindow,
    ) -> Result<TargetWeights, StrategyError> {
        let _ = (scores, holdings, trade_window);
        Err(StrategyError::NotImplemented("target_weights"))
    }
}

/// The bare translator with no weighting rule.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnimplementedTranslator;

impl TargetWeightTranslator for UnimplementedTranslator {}

/// Equal weight across the `topk` highest-scored instruments.
#[derive(Debug, Clone, Copy)]
pub struct EqualWeightTopK {
    topk: usize,
}

impl EqualWeightTopK {
    pub fn new(topk: usize) -> Self {
        Self { topk }
    }
}

impl TargetWeightTranslator for EqualWeightTopK {
    fn name(&self) -> &str {
        "equal_weight_topk"
    }

    fn target_weights(
        &self,
        scores: &ScoreSnapshot,
        _holdings: &dyn PositionLedger,
        _trade_window: TradeWindow,
    ) -> Result<TargetWeights, StrategyError> {
        let top: Vec<_> = scores.ranked().into_iter().take(self.topk).collect();
        if top.is_empty() {
            return Ok(TargetWeights::new());
        }
        let weight = 1.0 / top.len() as f64;
        Ok(top.into_iter().map(|id| (id, weight)).collect())
    }
}

/// Translator + order generator.
#[derive(Debug, Clone)]
pub struct WeightStrategy<T, G = WeightDiffOrderGenerator> {
    translator: T,
    generator: G,
    risk_degree: f64,
}

impl<T: TargetWeightTranslator> WeightStrategy<T, WeightDiffOrderGenerator> {
    pub fn new(translator: T, risk_degree: f64) -> Self {
        Self { translator, generator: WeightDiffOrderGenerator, risk_degree }
    }
}

impl<T: TargetWeightTranslator, G: OrderGenerator> WeightStrategy<T, G> {
    pub fn with_generator(translator: T, generator: G, risk_degree: f64) -> Self {
        Self { translator, generator, risk_degree }
    }

    pub fn risk_degree(&self, _trade_index: usize) -> f64 {
        self.risk_degree
    }
}

impl<T: TargetWeightTranslator, G: OrderGenerator> Strategy for WeightStrategy<T, G> {
    fn name(&self) -> &str {
        self.translator.name()
    }

    fn generate_orders(
        &self,
        ctx: &PeriodContext<'_>,
        ledger: &dyn PositionLedger,
        _rng: &mut dyn RngCore,
    ) -> Result<Vec<Order>, StrategyError> {
        let Some(scores) = ctx.scores.scores(ctx.pred_window).filter(|s| !s.is_empty()) else {
            return Ok(Vec::new());
        };

        let targets = self.translator.target_weights(&scores, ledger, ctx.trade_window)?;
        Ok(self.generator.diff_to_orders(
            ledger,
            ctx.venue,
            self.risk_degree(ctx.trade_index),
            &targets,
            ctx.pred_window,
            ctx.trade_window,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::SimLedger;
    use chrono::NaiveDate;

    fn window() -> TradeWindow {
        TradeWindow::day(NaiveDate::from_ymd_opt(2024, 7, 1).unwrap())
    }

    fn scores(pairs: &[(&str, f64)]) -> ScoreSnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn bare_translator_is_not_implemented() {
        let ledger = SimLedger::new(0.0);
        let err = UnimplementedTranslator
            .target_weights(&scores(&[("A", 1.0)]), &ledger, window())
            .unwrap_err();
        assert!(matches!(err, StrategyError::NotImplemented("target_weights")));
    }

    #[test]
    fn equal_weight_over_top_scores() {
        let ledger = SimLedger::new(0.0);
        let w = EqualWeightTopK::new(2)
            .target_weights(&scores(&[("A", 0.1), ("B", 0.9), ("C", 0.5)]), &ledger, window())
            .unwrap();
        assert_eq!(w.len(), 2);
        assert_eq!(w.get("B"), Some(0.5));
        assert_eq!(w.get("C"), Some(0.5));
        assert!(w.get("A").is_none());
    }

    #[test]
    fn equal_weight_with_fewer_scores_than_topk() {
        let ledger = SimLedger::new(0.0);
        let w = EqualWeightTopK::new(10)
            .target_weights(&scores(&[("A", 0.1)]), &ledger, window())
            .unwrap();
        assert_eq!(w.get("A"), Some(1.0));
    }
}
