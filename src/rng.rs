// src/rng.rs
//! Seeds and Random Streams for Monte Carlo Paths
//!
//! # Design
//!
//! Every simulated path owns a private pseudo-random stream:
//! 1. **Seed table**: one `u64` per path, drawn sequentially from a single
//!    engine before any path is simulated
//! 2. **Path stream**: a `StdRng` seeded from that path's entry, so the path
//!    is fully reproducible given its seed
//! 3. **Normal draws**: `StandardNormal` samples from the path stream
//!
//! The production table is seeded from the operating system's entropy
//! source and is therefore different on every run. `SeedTable::seeded` and
//! `SeedTable::from_seeds` build reproducible tables for testing and for
//! comparing strategies over identical inputs.

use crate::error::{SdeError, SdeResult};
use rand::rngs::{OsRng, StdRng};
use rand::{Rng, RngCore, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use std::ops::Index;
use tracing::debug;

/// Immutable table of per-path seeds
///
/// Built once before simulation and then shared read-only by every worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedTable {
    seeds: Vec<u64>,
}

impl SeedTable {
    /// Draw `count` seeds from an engine seeded by the OS entropy source
    ///
    /// # Errors
    ///
    /// Returns `SdeError::RandomGenerationError` if the entropy source
    /// cannot be read.
    pub fn from_entropy(count: usize) -> SdeResult<Self> {
        let engine = StdRng::from_rng(OsRng).map_err(|e| SdeError::RandomGenerationError {
            reason: format!("entropy source unavailable: {}", e),
        })?;
        debug!(count, "seed table drawn from entropy");
        Ok(Self::draw(engine, count))
    }

    /// Draw `count` seeds from an engine seeded with `base_seed`
    pub fn seeded(count: usize, base_seed: u64) -> Self {
        debug!(count, base_seed, "seed table drawn from fixed base seed");
        Self::draw(StdRng::seed_from_u64(base_seed), count)
    }

    /// Wrap an explicit list of seeds
    pub fn from_seeds(seeds: Vec<u64>) -> Self {
        Self { seeds }
    }

    fn draw(mut engine: StdRng, count: usize) -> Self {
        let seeds = (0..count).map(|_| engine.next_u64()).collect();
        Self { seeds }
    }

    pub fn len(&self) -> usize {
        self.seeds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.seeds.is_empty()
    }

    pub fn as_slice(&self) -> &[u64] {
        &self.seeds
    }
}

impl Index<usize> for SeedTable {
    type Output = u64;

    fn index(&self, i: usize) -> &u64 {
        &self.seeds[i]
    }
}

/// Generate the production seed table: one entropy-seeded seed per path
pub fn generate_seeds(count: usize) -> SdeResult<SeedTable> {
    SeedTable::from_entropy(count)
}

/// Private random stream for the path identified by `seed`
pub fn path_rng(seed: u64) -> StdRng {
    StdRng::seed_from_u64(seed)
}

pub fn get_normal_draw<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    StandardNormal.sample(rng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_table_has_requested_length() {
        let table = generate_seeds(1_000).expect("entropy available");
        assert_eq!(table.len(), 1_000);
        assert!(!table.is_empty());
    }

    #[test]
    fn test_entropy_tables_differ_between_calls() {
        let a = generate_seeds(16).expect("entropy available");
        let b = generate_seeds(16).expect("entropy available");
        assert_ne!(a, b);
    }

    #[test]
    fn test_seeded_table_reproducibility() {
        let a = SeedTable::seeded(100, 42);
        let b = SeedTable::seeded(100, 42);
        assert_eq!(a, b);
        assert_ne!(a, SeedTable::seeded(100, 43));
    }

    #[test]
    fn test_seeded_entries_are_distinct() {
        let table = SeedTable::seeded(10_000, 7);
        let mut sorted = table.as_slice().to_vec();
        sorted.sort_unstable();
        sorted.dedup();
        assert_eq!(sorted.len(), 10_000);
    }

    #[test]
    fn test_from_seeds_preserves_order() {
        let table = SeedTable::from_seeds(vec![5, 3, 9]);
        assert_eq!(table.as_slice(), &[5, 3, 9]);
        assert_eq!(table[1], 3);
    }

    #[test]
    fn test_path_rng_reproducibility() {
        let mut rng1 = path_rng(12345);
        let mut rng2 = path_rng(12345);

        for _ in 0..100 {
            assert_eq!(get_normal_draw(&mut rng1), get_normal_draw(&mut rng2));
        }
    }

    #[test]
    fn test_normal_distribution() {
        let mut rng = path_rng(42);

        let samples: Vec<f64> = (0..10000).map(|_| get_normal_draw(&mut rng)).collect();

        let mean = samples.iter().sum::<f64>() / samples.len() as f64;
        let variance =
            samples.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / samples.len() as f64;

        assert!(mean.abs() < 0.05, "Mean should be close to 0, got {}", mean);
        assert!(
            (variance - 1.0).abs() < 0.05,
            "Variance should be close to 1, got {}",
            variance
        );
    }
}
