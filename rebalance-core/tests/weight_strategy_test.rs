//! Integration tests for the weight-target strategy family.

use chrono::NaiveDate;
use rand::rngs::StdRng;
use rand::SeedableRng;

use rebalance_core::config::VenueConfig;
use rebalance_core::domain::{Order, ScoreSnapshot, TargetWeights, TradeWindow};
use rebalance_core::ledger::PositionLedger;
use rebalance_core::scores::ScoreTable;
use rebalance_core::sim::{Quote, SimLedger, SimVenue};
use rebalance_core::strategy::{
    EqualWeightTopK, OrderGenerator, PeriodContext, Strategy, StrategyError,
    TargetWeightTranslator, UnimplementedTranslator, WeightStrategy,
};
use rebalance_core::venue::Venue;

fn pred_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()
}

fn trade_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 4, 2).unwrap()
}

fn table(pairs: &[(&str, f64)]) -> ScoreTable {
    pairs
        .iter()
        .map(|(id, s)| (pred_date(), id.to_string(), *s))
        .collect()
}

fn venue(prices: &[(&str, f64)]) -> SimVenue {
    let mut v = SimVenue::new(VenueConfig::default());
    for (id, price) in prices {
        v.insert_quote(trade_date(), *id, Quote { price: *price, factor: 1.0, tradable: true });
    }
    v
}

fn ctx<'a>(venue: &'a SimVenue, scores: &'a ScoreTable) -> PeriodContext<'a> {
    PeriodContext {
        trade_index: 1,
        trade_window: TradeWindow::day(trade_date()),
        pred_window: TradeWindow::day(pred_date()),
        venue,
        scores,
    }
}

#[test]
fn bare_translator_fails_with_not_implemented() {
    let scores = table(&[("A", 1.0)]);
    let v = venue(&[("A", 10.0)]);
    let ledger = SimLedger::new(1_000.0);
    let strategy = WeightStrategy::new(UnimplementedTranslator, 0.95);

    let err = strategy
        .generate_orders(&ctx(&v, &scores), &ledger, &mut StdRng::seed_from_u64(0))
        .unwrap_err();
    assert!(matches!(err, StrategyError::NotImplemented(_)));
}

#[test]
fn no_scores_means_no_orders_even_for_bare_translator() {
    let scores = ScoreTable::new();
    let v = venue(&[("A", 10.0)]);
    let ledger = SimLedger::new(1_000.0);
    let strategy = WeightStrategy::new(UnimplementedTranslator, 0.95);

    let orders = strategy
        .generate_orders(&ctx(&v, &scores), &ledger, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert!(orders.is_empty());
}

#[test]
fn equal_weight_rotates_into_top_scores() {
    let scores = table(&[("A", 0.9), ("B", 0.8), ("C", 0.1)]);
    let v = venue(&[("A", 10.0), ("B", 20.0), ("C", 5.0)]);
    let mut ledger = SimLedger::new(0.0);
    ledger.set_holding("C", 400.0, 2);
    let strategy = WeightStrategy::new(EqualWeightTopK::new(2), 1.0);

    let orders = strategy
        .generate_orders(&ctx(&v, &scores), &ledger, &mut StdRng::seed_from_u64(0))
        .unwrap();

    assert_eq!(strategy.name(), "equal_weight_topk");
    assert_eq!(orders.len(), 3);
    assert!(orders[0].is_sell());
    assert_eq!(orders[0].instrument(), "C");
    assert_eq!(orders[0].amount(), 400.0);
    // 2000 total value split evenly: A 1000 / 10, B 1000 / 20.
    assert_eq!(orders[1].instrument(), "A");
    assert_eq!(orders[1].amount(), 100.0);
    assert_eq!(orders[2].instrument(), "B");
    assert_eq!(orders[2].amount(), 50.0);
}

#[test]
fn risk_degree_reserves_cash() {
    let scores = table(&[("A", 0.9)]);
    let v = venue(&[("A", 10.0)]);
    let ledger = SimLedger::new(1_000.0);
    let strategy = WeightStrategy::new(EqualWeightTopK::new(1), 0.5);

    let orders = strategy
        .generate_orders(&ctx(&v, &scores), &ledger, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].amount(), 50.0);
}

/// Records what it was asked to do instead of generating orders.
struct RecordingGenerator;

impl OrderGenerator for RecordingGenerator {
    fn diff_to_orders(
        &self,
        _holdings: &dyn PositionLedger,
        _venue: &dyn Venue,
        risk_degree: f64,
        targets: &TargetWeights,
        pred_window: TradeWindow,
        trade_window: TradeWindow,
    ) -> Vec<Order> {
        targets
            .iter()
            .map(|(id, w)| {
                assert!(pred_window.end < trade_window.start);
                Order::buy(id.to_string(), w * risk_degree, trade_window, 1.0)
            })
            .collect()
    }
}

/// Puts all weight on the lowest score.
struct Contrarian;

impl TargetWeightTranslator for Contrarian {
    fn target_weights(
        &self,
        scores: &ScoreSnapshot,
        _holdings: &dyn PositionLedger,
        _trade_window: TradeWindow,
    ) -> Result<TargetWeights, StrategyError> {
        Ok(scores
            .ranked()
            .into_iter()
            .last()
            .map(|id| (id, 1.0))
            .into_iter()
            .collect())
    }
}

#[test]
fn custom_translator_and_generator_compose() {
    let scores = table(&[("A", 0.9), ("B", -0.3)]);
    let v = venue(&[("A", 10.0), ("B", 10.0)]);
    let ledger = SimLedger::new(1_000.0);
    let strategy = WeightStrategy::with_generator(Contrarian, RecordingGenerator, 0.8);

    let orders = strategy
        .generate_orders(&ctx(&v, &scores), &ledger, &mut StdRng::seed_from_u64(0))
        .unwrap();
    assert_eq!(strategy.name(), "weight_target");
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].instrument(), "B");
    assert_eq!(orders[0].amount(), 0.8);
}
