//! Score providers.
//!
//! A provider returns the score snapshot for a prediction window, or `None`
//! when there is no signal for that window.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::domain::{InstrumentId, ScoreSnapshot, TradeWindow};

pub trait ScoreProvider {
    fn scores(&self, window: TradeWindow) -> Option<ScoreSnapshot>;
}

/// In-memory score table keyed by date.
///
/// For a window spanning several dates, the snapshot of the last date inside
/// the window that has any scores is returned.
#[derive(Debug, Clone, Default)]
pub struct ScoreTable {
    by_date: BTreeMap<NaiveDate, ScoreSnapshot>,
}

impl ScoreTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, date: NaiveDate, instrument: impl Into<InstrumentId>, score: f64) {
        self.by_date.entry(date).or_default().insert(instrument, score);
    }

    pub fn insert_snapshot(&mut self, date: NaiveDate, snapshot: ScoreSnapshot) {
        self.by_date.insert(date, snapshot);
    }

    pub fn dates(&self) -> impl Iterator<Item = &NaiveDate> {
        self.by_date.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.by_date.is_empty()
    }
}

impl ScoreProvider for ScoreTable {
    fn scores(&self, window: TradeWindow) -> Option<ScoreSnapshot> {
        self.by_date
            .range(window.start..=window.end)
            .rev()
            .find(|(_, snapshot)| !snapshot.is_empty())
            .map(|(_, snapshot)| snapshot.clone())
    }
}

impl FromIterator<(NaiveDate, InstrumentId, f64)> for ScoreTable {
    fn from_iter<T: IntoIterator<Item = (NaiveDate, InstrumentId, f64)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (date, instrument, score) in iter {
            table.insert(date, instrument, score);
        }
        table
    }
}
