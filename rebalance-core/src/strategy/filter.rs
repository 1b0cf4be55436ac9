//! Filter policy: tradability and hold-duration predicates.
//!
//! `TradabilityFilter` applies only when `only_tradable` is enabled; when it
//! is disabled every helper degrades to plain slicing of the input. The order
//! synthesizer still refuses to place orders for non-tradable instruments
//! either way.

use crate::domain::{InstrumentId, TradeWindow};
use crate::ledger::PositionLedger;
use crate::venue::Venue;

/// Tradability-aware list helpers for one trade window.
#[derive(Clone, Copy)]
pub struct TradabilityFilter<'a> {
    venue: &'a dyn Venue,
    window: TradeWindow,
    enforced: bool,
}

impl<'a> TradabilityFilter<'a> {
    pub fn new(venue: &'a dyn Venue, window: TradeWindow, enforced: bool) -> Self {
        Self { venue, window, enforced }
    }

    pub fn is_enforced(&self) -> bool {
        self.enforced
    }

    /// Whether the instrument passes the filter.
    pub fn admits(&self, instrument: &str) -> bool {
        !self.enforced || self.venue.is_tradable(instrument, self.window)
    }

    /// First `n` admitted instruments, in input order.
    ///
    /// Stops querying the venue once `n` instruments are found.
    pub fn first_n(&self, ranked: &[InstrumentId], n: usize) -> Vec<InstrumentId> {
        ranked
            .iter()
            .filter(|id| self.admits(id))
            .take(n)
            .cloned()
            .collect()
    }

    /// Last `n` admitted instruments, in input order.
    pub fn last_n(&self, ranked: &[InstrumentId], n: usize) -> Vec<InstrumentId> {
        let mut out: Vec<InstrumentId> = ranked
            .iter()
            .rev()
            .filter(|id| self.admits(id))
            .take(n)
            .cloned()
            .collect();
        out.reverse();
        out
    }

    /// All admitted instruments, in input order.
    pub fn filter(&self, ids: &[InstrumentId]) -> Vec<InstrumentId> {
        ids.iter().filter(|id| self.admits(id)).cloned().collect()
    }
}

/// Minimum continuous holding before an instrument may be sold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldDurationFilter {
    hold_thresh: u32,
}

impl HoldDurationFilter {
    pub fn new(hold_thresh: u32) -> Self {
        Self { hold_thresh }
    }

    pub fn hold_thresh(&self) -> u32 {
        self.hold_thresh
    }

    pub fn allows_sale(&self, holdings: &dyn PositionLedger, instrument: &str) -> bool {
        holdings.held_periods(instrument) >= self.hold_thresh
    }
}
