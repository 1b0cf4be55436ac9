//! Selection engine: the top-k/drop-n ranking step.
//!
//! Per period:
//! 1. Rank held instruments by score (`held_ranked`).
//! 2. Pick up to `n_drop + topk - |held|` non-held candidates.
//! 3. Rank held ∪ candidates together.
//! 4. Pick up to `n_drop` held instruments to sell.
//! 5. Keep the first `|sell| + topk - |held|` candidates as the buy set.
//!
//! The combined ranking in step 3 keeps the engine from selling a held
//! instrument that outranks the candidate that would replace it.

use rand::Rng;
use std::collections::BTreeSet;
use tracing::debug;

use crate::domain::{InstrumentId, ScoreSnapshot};

use super::filter::TradabilityFilter;
use super::selector::{sample_or_all, SelectionMode};

/// Sell and buy sets for one period, plus the intermediate rankings.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    /// Held instruments, highest score first.
    pub held_ranked: Vec<InstrumentId>,
    /// Non-held candidates before truncation.
    pub candidates: Vec<InstrumentId>,
    /// Instruments to sell; always a subset of `held_ranked`.
    pub sell: Vec<InstrumentId>,
    /// Instruments to buy; a prefix of `candidates`.
    pub buy: Vec<InstrumentId>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionEngine {
    topk: usize,
    n_drop: usize,
    buy_mode: SelectionMode,
    sell_mode: SelectionMode,
}

impl SelectionEngine {
    pub fn new(topk: usize, n_drop: usize, buy_mode: SelectionMode, sell_mode: SelectionMode) -> Self {
        Self { topk, n_drop, buy_mode, sell_mode }
    }

    pub fn topk(&self) -> usize {
        self.topk
    }

    pub fn n_drop(&self) -> usize {
        self.n_drop
    }

    /// Run steps 1-5 over `held`.
    pub fn select<R: Rng + ?Sized>(
        &self,
        scores: &ScoreSnapshot,
        held: &[InstrumentId],
        filter: &TradabilityFilter<'_>,
        rng: &mut R,
    ) -> Selection {
        let held_ranked = scores.rank(held);
        let held_set: BTreeSet<&str> = held_ranked.iter().map(String::as_str).collect();

        let wanted = (self.n_drop + self.topk).saturating_sub(held_ranked.len());
        let candidates = self.pick_candidates(scores, &held_set, wanted, filter, rng);

        let combined = scores.rank(held_ranked.iter().chain(candidates.iter()));
        let sell = self.pick_sells(&held_ranked, &combined, filter, rng);

        let buy_len = (sell.len() + self.topk).saturating_sub(held_ranked.len());
        let buy: Vec<InstrumentId> = candidates.iter().take(buy_len).cloned().collect();

        debug!(
            held = held_ranked.len(),
            candidates = candidates.len(),
            sell = sell.len(),
            buy = buy.len(),
            "top-k/drop-n selection"
        );

        Selection { held_ranked, candidates, sell, buy }
    }

    fn pick_candidates<R: Rng + ?Sized>(
        &self,
        scores: &ScoreSnapshot,
        held: &BTreeSet<&str>,
        wanted: usize,
        filter: &TradabilityFilter<'_>,
        rng: &mut R,
    ) -> Vec<InstrumentId> {
        match self.buy_mode {
            SelectionMode::RankStrict => {
                let not_held: Vec<InstrumentId> = scores
                    .ranked()
                    .into_iter()
                    .filter(|id| !held.contains(id.as_str()))
                    .collect();
                filter.first_n(&not_held, wanted)
            }
            SelectionMode::UniformRandom => {
                let pool: Vec<InstrumentId> = filter
                    .first_n(&scores.ranked(), self.topk)
                    .into_iter()
                    .filter(|id| !held.contains(id.as_str()))
                    .collect();
                sample_or_all(pool, wanted, rng)
            }
        }
    }

    fn pick_sells<R: Rng + ?Sized>(
        &self,
        held_ranked: &[InstrumentId],
        combined: &[InstrumentId],
        filter: &TradabilityFilter<'_>,
        rng: &mut R,
    ) -> Vec<InstrumentId> {
        match self.sell_mode {
            SelectionMode::RankStrict => {
                let bottom: BTreeSet<InstrumentId> =
                    filter.last_n(combined, self.n_drop).into_iter().collect();
                held_ranked
                    .iter()
                    .filter(|id| bottom.contains(*id))
                    .cloned()
                    .collect()
            }
            SelectionMode::UniformRandom => {
                if held_ranked.is_empty() {
                    return Vec::new();
                }
                sample_or_all(filter.filter(held_ranked), self.n_drop, rng)
            }
        }
    }
}
