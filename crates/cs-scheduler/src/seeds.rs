//! Up-front derivation of per-trial seeds.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Derive one seed per trial from the master seed.
///
/// The whole sequence is drawn before any trial starts, so the mapping
/// from trial index to seed depends only on the master seed and the
/// trial count. How the trials are later spread over workers cannot
/// change it.
pub fn derive_seeds(master_seed: u64, num_trials: usize) -> Vec<u64> {
    let mut rng = StdRng::seed_from_u64(master_seed);
    (0..num_trials).map(|_| rng.random()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_master_seed_gives_the_same_sequence() {
        assert_eq!(derive_seeds(42, 16), derive_seeds(42, 16));
    }

    #[test]
    fn test_different_master_seeds_diverge() {
        assert_ne!(derive_seeds(42, 16), derive_seeds(43, 16));
    }

    #[test]
    fn test_shorter_runs_are_prefixes_of_longer_ones() {
        let long = derive_seeds(7, 20);
        let short = derive_seeds(7, 5);
        assert_eq!(short, long[..5]);
    }

    #[test]
    fn test_zero_trials_gives_an_empty_sequence() {
        assert!(derive_seeds(1, 0).is_empty());
    }
}
