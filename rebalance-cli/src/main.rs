//! Rebalance CLI: single-period decisions and calendar backtests.
//!
//! Commands:
//! - `decide`: compute one period's orders from CSV scores, quotes and holdings
//! - `backtest`: run a strategy over every period of the quote calendar

mod loader;

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rebalance_core::backtest::{BacktestReport, Backtester};
use rebalance_core::calendar::TradingCalendar;
use rebalance_core::config::RebalanceConfig;
use rebalance_core::rng::RngHierarchy;
use rebalance_core::sim::SimLedger;
use rebalance_core::strategy::{
    EqualWeightTopK, PeriodContext, Strategy, TopkDropoutStrategy, WeightStrategy,
};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rebalance", about = "Periodic top-k portfolio rebalancing")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyKind {
    /// Hold the top-k instruments, replacing at most n_drop per period.
    TopkDropout,
    /// Equal weights over the top-k instruments, rebalanced every period.
    EqualWeight,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the orders for a single trade date and print them as JSON.
    Decide {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Scores CSV (date,instrument,score).
        #[arg(long)]
        scores: PathBuf,

        /// Quotes CSV (date,instrument,price,factor,tradable).
        #[arg(long)]
        quotes: PathBuf,

        /// Holdings CSV (instrument,amount,periods). Omit for an empty book.
        #[arg(long)]
        holdings: Option<PathBuf>,

        /// Available cash. Defaults to the configured initial cash.
        #[arg(long)]
        cash: Option<f64>,

        /// Trade date (YYYY-MM-DD).
        #[arg(long)]
        date: String,

        #[arg(long, value_enum, default_value = "topk-dropout")]
        strategy: StrategyKind,
    },
    /// Run a backtest over every quoted date and write the report as JSON.
    Backtest {
        /// Path to a TOML config file.
        #[arg(long)]
        config: PathBuf,

        /// Scores CSV (date,instrument,score).
        #[arg(long)]
        scores: PathBuf,

        /// Quotes CSV (date,instrument,price,factor,tradable).
        #[arg(long)]
        quotes: PathBuf,

        /// Report path. Printed to stdout when omitted.
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value = "topk-dropout")]
        strategy: StrategyKind,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Decide {
            config,
            scores,
            quotes,
            holdings,
            cash,
            date,
            strategy,
        } => run_decide(&config, &scores, &quotes, holdings.as_deref(), cash, &date, strategy),
        Commands::Backtest {
            config,
            scores,
            quotes,
            output,
            strategy,
        } => run_backtest_cmd(&config, &scores, &quotes, output.as_deref(), strategy),
    }
}

fn load_config(path: &Path) -> Result<RebalanceConfig> {
    RebalanceConfig::from_file(path).with_context(|| format!("failed to load {}", path.display()))
}

fn build_strategy(kind: StrategyKind, config: &RebalanceConfig) -> Result<Box<dyn Strategy>> {
    let strategy: Box<dyn Strategy> = match kind {
        StrategyKind::TopkDropout => Box::new(
            TopkDropoutStrategy::new(config.strategy.clone()).context("invalid strategy config")?,
        ),
        StrategyKind::EqualWeight => {
            config.strategy.validate().context("invalid strategy config")?;
            Box::new(WeightStrategy::new(
                EqualWeightTopK::new(config.strategy.topk),
                config.strategy.risk_degree,
            ))
        }
    };
    Ok(strategy)
}

fn run_decide(
    config_path: &Path,
    scores_path: &Path,
    quotes_path: &Path,
    holdings_path: Option<&Path>,
    cash: Option<f64>,
    date: &str,
    kind: StrategyKind,
) -> Result<()> {
    let config = load_config(config_path)?;
    let date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .with_context(|| format!("invalid date '{date}'"))?;
    let strategy = build_strategy(kind, &config)?;

    let scores = loader::load_scores(scores_path)?;
    let venue = loader::load_quotes(quotes_path, config.venue.clone())?;
    let cash = cash.unwrap_or(config.backtest.initial_cash);
    let ledger = match holdings_path {
        Some(path) => loader::load_holdings(path, cash)?,
        None => SimLedger::new(cash),
    };

    // Score dates and quote dates together define the periods.
    let mut dates = venue.dates();
    dates.extend(scores.dates().copied());
    let calendar = TradingCalendar::new(dates, config.backtest.step);

    let Some(trade_index) = calendar.period_of(date) else {
        bail!("{date} is not a trading date in the inputs");
    };
    let (Some(trade_window), Some(pred_window)) =
        (calendar.trade_window(trade_index), calendar.pred_window(trade_index))
    else {
        bail!("{date} has no preceding period to take scores from");
    };

    let ctx = PeriodContext {
        trade_index,
        trade_window,
        pred_window,
        venue: &venue,
        scores: &scores,
    };
    let mut rng = RngHierarchy::new(config.backtest.seed).rng_for(strategy.name(), trade_index as u64);
    let orders = strategy.generate_orders(&ctx, &ledger, &mut rng)?;

    info!(
        strategy = strategy.name(),
        %trade_window,
        %pred_window,
        orders = orders.len(),
        "decision complete"
    );
    println!("{}", serde_json::to_string_pretty(&orders)?);
    Ok(())
}

fn run_backtest_cmd(
    config_path: &Path,
    scores_path: &Path,
    quotes_path: &Path,
    output: Option<&Path>,
    kind: StrategyKind,
) -> Result<()> {
    let config = load_config(config_path)?;
    let strategy = build_strategy(kind, &config)?;

    let scores = loader::load_scores(scores_path)?;
    let venue = loader::load_quotes(quotes_path, config.venue.clone())?;
    let calendar = TradingCalendar::new(venue.dates(), config.backtest.step);
    if calendar.len() < 2 {
        bail!("need at least two periods of quotes, found {}", calendar.len());
    }

    let mut ledger = SimLedger::new(config.backtest.initial_cash);
    let backtester = Backtester::new(&calendar, &venue, &scores, config.backtest.seed);
    let report = backtester.run(strategy.as_ref(), &mut ledger)?;

    print_summary(&report, config.backtest.initial_cash);

    let json = serde_json::to_string_pretty(&report)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("failed to write {}", path.display()))?;
            info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn print_summary(report: &BacktestReport, initial_cash: f64) {
    let final_value = report.final_value().unwrap_or(initial_cash);
    let ret = if initial_cash > 0.0 {
        (final_value / initial_cash - 1.0) * 100.0
    } else {
        0.0
    };
    eprintln!("=== Backtest: {} (seed {}) ===", report.strategy, report.seed);
    eprintln!("Periods:       {}", report.periods.len());
    eprintln!("Orders:        {}", report.order_count());
    eprintln!("Total cost:    {:.2}", report.total_cost());
    eprintln!("Final value:   {final_value:.2}");
    eprintln!("Return:        {ret:.2}%");
}
