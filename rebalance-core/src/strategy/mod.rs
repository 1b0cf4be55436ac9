//! Strategies: turn a period's scores and the caller's holdings into orders.
//!
//! Two families:
//! - `TopkDropoutStrategy`: rank-based top-k/drop-n replacement with
//!   cash-aware order synthesis.
//! - `WeightStrategy`: a `TargetWeightTranslator` picks target weights and an
//!   `OrderGenerator` diffs them against holdings.
//!
//! # Architecture invariant
//! Strategies never mutate the ledger they are given. The returned order list
//! is the only channel for intended state change, and it lists every sell
//! before any buy.

pub mod filter;
pub mod order_gen;
pub mod selection;
pub mod selector;
pub mod synthesizer;
pub mod topk_dropout;
pub mod weight;

pub use filter::{HoldDurationFilter, TradabilityFilter};
pub use order_gen::{OrderGenerator, WeightDiffOrderGenerator};
pub use selection::{Selection, SelectionEngine};
pub use selector::SelectionMode;
pub use synthesizer::OrderSynthesizer;
pub use topk_dropout::TopkDropoutStrategy;
pub use weight::{EqualWeightTopK, TargetWeightTranslator, UnimplementedTranslator, WeightStrategy};

use rand::RngCore;
use thiserror::Error;

use crate::config::ConfigError;
use crate::domain::{Order, TradeWindow};
use crate::ledger::PositionLedger;
use crate::scores::ScoreProvider;
use crate::venue::Venue;

/// Errors surfaced by a strategy call.
#[derive(Debug, Error)]
pub enum StrategyError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0} is not implemented for this strategy")]
    NotImplemented(&'static str),
}

/// Everything a strategy sees about the period it is deciding for.
#[derive(Clone, Copy)]
pub struct PeriodContext<'a> {
    pub trade_index: usize,
    /// Window the orders will trade in.
    pub trade_window: TradeWindow,
    /// Window the scores were predicted for (the previous period).
    pub pred_window: TradeWindow,
    pub venue: &'a dyn Venue,
    pub scores: &'a dyn ScoreProvider,
}

/// A per-period decision engine.
pub trait Strategy: Send + Sync {
    /// Human-readable name (e.g., "topk_dropout").
    fn name(&self) -> &str;

    /// Produce this period's orders.
    ///
    /// Randomized selection draws from `rng`; callers seed it for
    /// reproducible runs. A period without scores yields an empty list.
    fn generate_orders(
        &self,
        ctx: &PeriodContext<'_>,
        ledger: &dyn PositionLedger,
        rng: &mut dyn RngCore,
    ) -> Result<Vec<Order>, StrategyError>;
}
