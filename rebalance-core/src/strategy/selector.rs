//! Selection policies shared by the buy and sell sides.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::domain::InstrumentId;

/// How a side of the top-k/drop-n selection picks instruments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SelectionMode {
    /// Follow the score ranking (`top` for buys, `bottom` for sells).
    RankStrict,
    /// Uniform sample without replacement (`random`).
    UniformRandom,
}

impl SelectionMode {
    /// Resolve a `method_buy` value.
    pub fn for_buy(method: &str) -> Result<Self, ConfigError> {
        match method {
            "top" => Ok(Self::RankStrict),
            "random" => Ok(Self::UniformRandom),
            other => Err(ConfigError::UnsupportedBuyMethod(other.to_string())),
        }
    }

    /// Resolve a `method_sell` value.
    pub fn for_sell(method: &str) -> Result<Self, ConfigError> {
        match method {
            "bottom" => Ok(Self::RankStrict),
            "random" => Ok(Self::UniformRandom),
            other => Err(ConfigError::UnsupportedSellMethod(other.to_string())),
        }
    }
}

/// Draw `n` instruments from `pool` without replacement.
///
/// When the pool holds fewer than `n` instruments the whole pool is returned
/// in its original order.
pub fn sample_or_all<R: Rng + ?Sized>(
    pool: Vec<InstrumentId>,
    n: usize,
    rng: &mut R,
) -> Vec<InstrumentId> {
    if n > pool.len() {
        return pool;
    }
    rand::seq::index::sample(rng, pool.len(), n)
        .into_iter()
        .map(|i| pool[i].clone())
        .collect()
}
