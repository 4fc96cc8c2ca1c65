//! Neighborhood structures for the swarm.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// How particles see each other's personal bests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Topology {
    /// Every particle follows the single best personal best in the swarm.
    GlobalBest,
    /// Particles sit on a ring and follow the best within `span` steps
    /// either way, themselves included.
    RingLocal { span: usize },
    /// Ring with immediate neighbors only. Kept as its own variant so the
    /// settings name survives round trips.
    Standard,
}

impl Topology {
    /// Ring span, or `None` for the fully-connected case.
    pub fn span(&self) -> Option<usize> {
        match self {
            Topology::GlobalBest => None,
            Topology::RingLocal { span } => Some(*span),
            Topology::Standard => Some(1),
        }
    }

    /// Index of the neighborhood best for each particle, given the current
    /// personal-best fitness values (lower is better). In the fully
    /// connected case ties go to the lowest index; on a ring a particle
    /// keeps itself unless a neighbor is strictly better. NaN entries
    /// never win because `total_cmp` orders positive NaN above every real.
    pub fn best_indices(&self, pbest_fitness: &[f64]) -> Vec<usize> {
        let n = pbest_fitness.len();
        match self.span() {
            None => {
                let mut leader = 0;
                for (i, f) in pbest_fitness.iter().enumerate().skip(1) {
                    if f.total_cmp(&pbest_fitness[leader]) == Ordering::Less {
                        leader = i;
                    }
                }
                vec![leader; n]
            }
            Some(span) => (0..n)
                .map(|i| {
                    let mut leader = i;
                    for offset in -(span as isize)..=(span as isize) {
                        let j = (i as isize + offset).rem_euclid(n as isize) as usize;
                        if pbest_fitness[j].total_cmp(&pbest_fitness[leader]) == Ordering::Less {
                            leader = j;
                        }
                    }
                    leader
                })
                .collect(),
        }
    }
}
