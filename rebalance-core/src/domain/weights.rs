use super::InstrumentId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Desired fractional weight per instrument. Cash is not part of the map.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetWeights {
    weights: BTreeMap<InstrumentId, f64>,
}

impl TargetWeights {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, instrument: impl Into<InstrumentId>, weight: f64) {
        self.weights.insert(instrument.into(), weight);
    }

    pub fn get(&self, instrument: &str) -> Option<f64> {
        self.weights.get(instrument).copied()
    }

    pub fn len(&self) -> usize {
        self.weights.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.weights.values().sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.weights.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn instruments(&self) -> impl Iterator<Item = &InstrumentId> {
        self.weights.keys()
    }
}

impl FromIterator<(InstrumentId, f64)> for TargetWeights {
    fn from_iter<T: IntoIterator<Item = (InstrumentId, f64)>>(iter: T) -> Self {
        Self { weights: iter.into_iter().collect() }
    }
}
