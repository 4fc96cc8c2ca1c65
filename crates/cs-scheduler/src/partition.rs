//! Static round-robin assignment of trials to workers.

use serde::{Deserialize, Serialize};

use cs_types::{config_error, internal_error, CsResult};

/// Splits trial indices `0..num_trials` over workers ranked `1..=num_workers`.
///
/// Worker `r` owns `{r - 1, r - 1 + W, r - 1 + 2W, ...}` below the trial
/// count, where `W` is the worker count. The assignment is a pure
/// function of the two counts, so reruns with the same counts land
/// every trial on the same worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialPartition {
    num_trials: usize,
    num_workers: usize,
}

impl TrialPartition {
    pub fn new(num_trials: usize, num_workers: usize) -> CsResult<Self> {
        if num_trials == 0 {
            return Err(config_error!("trial count must be at least 1"));
        }
        if num_workers == 0 {
            return Err(config_error!("worker count must be at least 1"));
        }
        Ok(Self {
            num_trials,
            num_workers,
        })
    }

    pub fn num_trials(&self) -> usize {
        self.num_trials
    }

    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Trial indices owned by the 1-based worker `rank`.
    pub fn assigned(&self, rank: usize) -> Vec<usize> {
        assert!(
            rank >= 1 && rank <= self.num_workers,
            "rank {rank} outside 1..={}",
            self.num_workers
        );
        ((rank - 1)..self.num_trials)
            .step_by(self.num_workers)
            .collect()
    }

    /// The worker rank that owns `trial`.
    pub fn worker_for(&self, trial: usize) -> usize {
        trial % self.num_workers + 1
    }

    /// Checks that the per-worker assignments cover every trial exactly
    /// once. A failure here is a bug in the partition itself.
    pub fn verify(&self) -> CsResult<()> {
        let mut seen = vec![false; self.num_trials];
        for rank in 1..=self.num_workers {
            for trial in self.assigned(rank) {
                if seen[trial] {
                    return Err(internal_error!(
                        "trial {trial} assigned to more than one worker"
                    ));
                }
                seen[trial] = true;
            }
        }
        if let Some(missing) = seen.iter().position(|covered| !covered) {
            return Err(internal_error!("trial {missing} assigned to no worker"));
        }
        Ok(())
    }
}
