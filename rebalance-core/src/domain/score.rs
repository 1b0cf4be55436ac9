//! Per-period predictive scores and the deterministic ranking over them.

use super::InstrumentId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Mapping from instrument to score for one prediction window.
///
/// Ranking is always descending by score. Ties break on instrument id
/// (ascending) so repeated calls over identical inputs produce identical
/// orderings. Instruments without a score, or with a NaN score, rank after
/// every scored instrument.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreSnapshot {
    scores: BTreeMap<InstrumentId, f64>,
}

impl ScoreSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instrument: impl Into<InstrumentId>, score: f64) {
        self.scores.insert(instrument.into(), score);
    }

    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.scores.get(instrument).copied().filter(|s| !s.is_nan())
    }

    pub fn contains(&self, instrument: &str) -> bool {
        self.scores.contains_key(instrument)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.scores.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Rank the given instruments by score, highest first.
    pub fn rank<'a, I>(&self, instruments: I) -> Vec<InstrumentId>
    where
        I: IntoIterator<Item = &'a InstrumentId>,
    {
        let mut keyed: Vec<(Option<f64>, &InstrumentId)> = instruments
            .into_iter()
            .map(|id| (self.get(id), id))
            .collect();
        keyed.sort_by(|a, b| rank_order(a.0, b.0).then_with(|| a.1.cmp(b.1)));
        keyed.dedup_by(|a, b| a.1 == b.1);
        keyed.into_iter().map(|(_, id)| id.clone()).collect()
    }

    /// Rank every instrument in the snapshot, highest first.
    pub fn ranked(&self) -> Vec<InstrumentId> {
        self.rank(self.scores.keys())
    }
}

impl FromIterator<(InstrumentId, f64)> for ScoreSnapshot {
    fn from_iter<T: IntoIterator<Item = (InstrumentId, f64)>>(iter: T) -> Self {
        Self { scores: iter.into_iter().collect() }
    }
}

/// Descending by score, missing scores last.
fn rank_order(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(pairs: &[(&str, f64)]) -> ScoreSnapshot {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn ranked_is_descending() {
        let s = snapshot(&[("A", 0.1), ("B", 0.9), ("C", 0.5)]);
        assert_eq!(s.ranked(), vec!["B", "C", "A"]);
    }

    #[test]
    fn ties_break_on_instrument_id() {
        let s = snapshot(&[("Z", 1.0), ("M", 1.0), ("A", 1.0), ("Q", 2.0)]);
        assert_eq!(s.ranked(), vec!["Q", "A", "M", "Z"]);
    }

    #[test]
    fn unscored_and_nan_rank_last() {
        let s = snapshot(&[("A", 0.3), ("B", f64::NAN), ("C", -5.0)]);
        let ids: Vec<InstrumentId> = vec!["X".into(), "B".into(), "A".into(), "C".into()];
        assert_eq!(s.rank(&ids), vec!["A", "C", "B", "X"]);
    }

    #[test]
    fn rank_drops_duplicates() {
        let s = snapshot(&[("A", 1.0), ("B", 2.0)]);
        let ids: Vec<InstrumentId> = vec!["A".into(), "B".into(), "A".into()];
        assert_eq!(s.rank(&ids), vec!["B", "A"]);
    }

    #[test]
    fn ranking_is_stable_across_calls() {
        let s = snapshot(&[("A", 1.0), ("B", 1.0), ("C", 1.0)]);
        assert_eq!(s.ranked(), s.ranked());
    }
}
