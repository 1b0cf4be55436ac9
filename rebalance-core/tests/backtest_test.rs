//! Multi-period backtests over a small synthetic universe.

use chrono::{Duration, NaiveDate};

use rebalance_core::backtest::Backtester;
use rebalance_core::calendar::TradingCalendar;
use rebalance_core::config::{TopkDropoutConfig, VenueConfig};
use rebalance_core::ledger::PositionLedger;
use rebalance_core::scores::ScoreTable;
use rebalance_core::sim::{Quote, SimLedger, SimVenue};
use rebalance_core::strategy::{EqualWeightTopK, TopkDropoutStrategy, WeightStrategy};

const UNIVERSE: [&str; 6] = ["AAA", "BBB", "CCC", "DDD", "EEE", "FFF"];

fn dates(n: usize) -> Vec<NaiveDate> {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    (0..n).map(|i| start + Duration::days(i as i64)).collect()
}

/// Scores rotate one slot per day so the top names keep changing.
fn fixtures(n: usize, config: VenueConfig) -> (TradingCalendar, SimVenue, ScoreTable) {
    let days = dates(n);
    let mut venue = SimVenue::new(config);
    let mut scores = ScoreTable::new();
    for (t, date) in days.iter().enumerate() {
        for (i, id) in UNIVERSE.iter().enumerate() {
            let price = 10.0 + i as f64 + t as f64 * 0.5;
            venue.insert_quote(*date, *id, Quote { price, factor: 1.0, tradable: true });
            let rank = (i + t) % UNIVERSE.len();
            scores.insert(*date, *id, rank as f64);
        }
    }
    (TradingCalendar::daily(days), venue, scores)
}

#[test]
fn topk_dropout_keeps_book_near_topk() {
    let (calendar, venue, scores) = fixtures(10, VenueConfig::default());
    let strategy = TopkDropoutStrategy::new(TopkDropoutConfig::new(3, 1)).unwrap();
    let mut ledger = SimLedger::new(100_000.0);

    let report = Backtester::new(&calendar, &venue, &scores, 42)
        .run(&strategy, &mut ledger)
        .unwrap();

    assert_eq!(report.periods.len(), 9);
    assert_eq!(report.strategy, "topk_dropout");
    for period in &report.periods {
        assert!(period.positions <= 3);
        let sells = period.orders.iter().filter(|o| o.is_sell()).count();
        assert!(sells <= 1);
    }
    // The first period buys the whole book.
    assert_eq!(report.periods[0].positions, 3);
    assert!(ledger.cash() >= 0.0);
    assert!(report.final_value().unwrap() > 0.0);
}

#[test]
fn costs_are_accounted() {
    let config = VenueConfig { open_cost: 0.001, close_cost: 0.002, min_cost: 1.0, ..VenueConfig::default() };
    let (calendar, venue, scores) = fixtures(6, config);
    let strategy = TopkDropoutStrategy::new(TopkDropoutConfig::new(2, 1)).unwrap();
    let mut ledger = SimLedger::new(10_000.0);

    let report = Backtester::new(&calendar, &venue, &scores, 1)
        .run(&strategy, &mut ledger)
        .unwrap();
    assert!(report.total_cost() > 0.0);
    assert!(report.order_count() > 0);
}

#[test]
fn same_seed_same_run_for_random_modes() {
    let (calendar, venue, scores) = fixtures(8, VenueConfig::default());
    let mut cfg = TopkDropoutConfig::new(3, 2);
    cfg.method_buy = "random".into();
    cfg.method_sell = "random".into();
    let strategy = TopkDropoutStrategy::new(cfg).unwrap();

    let run = |seed| {
        let mut ledger = SimLedger::new(50_000.0);
        let report = Backtester::new(&calendar, &venue, &scores, seed)
            .run(&strategy, &mut ledger)
            .unwrap();
        report
            .periods
            .into_iter()
            .map(|p| p.orders)
            .collect::<Vec<_>>()
    };

    assert_eq!(run(5), run(5));
}

#[test]
fn held_periods_advance_each_period() {
    let (calendar, venue, scores) = fixtures(4, VenueConfig::default());
    let strategy = TopkDropoutStrategy::new(TopkDropoutConfig::new(6, 0)).unwrap();
    let mut ledger = SimLedger::new(60_000.0);

    Backtester::new(&calendar, &venue, &scores, 0)
        .run(&strategy, &mut ledger)
        .unwrap();

    // Bought in period 1, then held through periods 1-3.
    for id in UNIVERSE {
        assert_eq!(ledger.held_periods(id), 3);
    }
}

#[test]
fn weight_strategy_runs_in_backtester() {
    let (calendar, venue, scores) = fixtures(5, VenueConfig::default());
    let strategy = WeightStrategy::new(EqualWeightTopK::new(2), 0.95);
    let mut ledger = SimLedger::new(10_000.0);

    let report = Backtester::new(&calendar, &venue, &scores, 0)
        .run(&strategy, &mut ledger)
        .unwrap();
    assert_eq!(report.periods.len(), 4);
    assert!(report.periods.iter().all(|p| p.positions <= 2));
}
