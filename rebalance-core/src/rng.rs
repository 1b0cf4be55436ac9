//! Deterministic RNG hierarchy.
//!
//! A master seed generates deterministic sub-seeds for each
//! `(strategy, trade_index)` pair. Sub-seeds are derived via BLAKE3 hashing,
//! so a period's randomized selection does not depend on how many draws
//! earlier periods consumed.

use rand::rngs::StdRng;
use rand::SeedableRng;

/// Deterministic RNG hierarchy.
#[derive(Debug, Clone)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive a deterministic sub-seed for a specific (strategy, trade_index).
    pub fn sub_seed(&self, strategy: &str, trade_index: u64) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(strategy.as_bytes());
        hasher.update(&trade_index.to_le_bytes());
        let hash = hasher.finalize();
        let mut head = [0u8; 8];
        head.copy_from_slice(&hash.as_bytes()[..8]);
        u64::from_le_bytes(head)
    }

    /// Create a seeded StdRng for one strategy call.
    pub fn rng_for(&self, strategy: &str, trade_index: u64) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed(strategy, trade_index))
    }
}
