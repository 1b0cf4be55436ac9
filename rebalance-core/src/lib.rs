//! Rebalance Core: periodic portfolio-rebalancing decision engine.
//!
//! Given a period's score snapshot and the caller's holdings, strategies in
//! this crate decide what to sell and buy and emit an ordered list of trade
//! intents (sells first). Execution and the authoritative ledger stay with
//! the caller.
//!
//! - Domain types (orders, windows, score snapshots, target weights)
//! - Collaborator traits: `Venue`, `PositionLedger`, `ScoreProvider`
//! - Top-k/drop-n selection and cash-aware order synthesis
//! - Weight-target strategies with a pluggable order generator
//! - Simulated venue/ledger, trading calendar and a backtest driver

pub mod backtest;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod ledger;
pub mod rng;
pub mod scores;
pub mod sim;
pub mod strategy;
pub mod venue;
