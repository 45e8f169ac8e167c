//! Random seeds for newly created agents.

use std::ops::Range;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeds handed to the service always fall in this range.
pub const SEED_RANGE: Range<u64> = 0..1_000_000;

/// Source of agent seeds used when the caller does not pick one.
pub trait SeedSource: Send + Sync {
    /// Returns a value in [`SEED_RANGE`].
    fn next_seed(&self) -> u64;
}

/// Thread-local RNG. Used by default.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadRngSeeds;

impl SeedSource for ThreadRngSeeds {
    fn next_seed(&self) -> u64 {
        rand::thread_rng().gen_range(SEED_RANGE)
    }
}

/// Reproducible sequence of seeds from a fixed RNG seed.
#[derive(Debug)]
pub struct StdRngSeeds {
    rng: Mutex<StdRng>,
}

impl StdRngSeeds {
    pub fn new(rng_seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(rng_seed)),
        }
    }
}

impl SeedSource for StdRngSeeds {
    fn next_seed(&self) -> u64 {
        let mut rng = self.rng.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        rng.gen_range(SEED_RANGE)
    }
}

/// Always yields the same seed.
#[derive(Debug, Clone, Copy)]
pub struct FixedSeed(u64);

impl FixedSeed {
    pub fn new(seed: u64) -> Self {
        Self(seed % SEED_RANGE.end)
    }
}

impl SeedSource for FixedSeed {
    fn next_seed(&self) -> u64 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_rng_stays_in_range() {
        let seeds = ThreadRngSeeds;
        for _ in 0..1_000 {
            assert!(SEED_RANGE.contains(&seeds.next_seed()));
        }
    }

    #[test]
    fn std_rng_is_reproducible() {
        let a = StdRngSeeds::new(1337);
        let b = StdRngSeeds::new(1337);
        let first: Vec<u64> = (0..16).map(|_| a.next_seed()).collect();
        let second: Vec<u64> = (0..16).map(|_| b.next_seed()).collect();
        assert_eq!(first, second);
        assert!(first.iter().all(|s| SEED_RANGE.contains(s)));
    }

    #[test]
    fn fixed_seed_is_reduced_into_range() {
        assert_eq!(FixedSeed::new(42).next_seed(), 42);
        assert_eq!(FixedSeed::new(1_000_007).next_seed(), 7);
    }
}
