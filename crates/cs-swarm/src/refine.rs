//! Derivative-free local refinement of the swarm's best point.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

const ALPHA: f64 = 1.0;
const GAMMA: f64 = 2.0;
const RHO: f64 = 0.5;
const SIGMA: f64 = 0.5;

/// Result of a refinement pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefineOutcome {
    pub position: Vec<f64>,
    pub fitness: f64,
    pub func_evals: u64,
}

/// Nelder-Mead simplex search restricted to the unit hypercube.
///
/// Candidate points outside the cube are clipped back onto it before
/// evaluation, so the objective is never probed out of bounds. The
/// returned point is the start point unless the search found something
/// strictly better.
#[derive(Debug, Clone, Copy)]
pub struct SimplexRefiner {
    max_iters: usize,
    initial_step: f64,
}

impl SimplexRefiner {
    pub fn new(max_iters: usize, initial_step: f64) -> Self {
        Self {
            max_iters,
            initial_step,
        }
    }

    pub fn refine<F>(&self, start: &[f64], start_fitness: f64, mut objective: F) -> RefineOutcome
    where
        F: FnMut(&[f64]) -> f64,
    {
        let dim = start.len();
        if self.max_iters == 0 || dim == 0 {
            return RefineOutcome {
                position: start.to_vec(),
                fitness: start_fitness,
                func_evals: 0,
            };
        }

        let mut func_evals: u64 = 0;
        let mut eval = |position: &[f64]| {
            func_evals += 1;
            objective(position)
        };

        // Simplex of dim + 1 vertices, seeded from the start point. The
        // start's fitness is already known, so only the stepped vertices
        // cost an evaluation. Steps flip direction when they would leave
        // the cube.
        let mut simplex: Vec<(Vec<f64>, f64)> = Vec::with_capacity(dim + 1);
        simplex.push((start.to_vec(), start_fitness));
        for d in 0..dim {
            let mut vertex = start.to_vec();
            vertex[d] = if vertex[d] + self.initial_step <= 1.0 {
                vertex[d] + self.initial_step
            } else {
                (vertex[d] - self.initial_step).max(0.0)
            };
            let fitness = eval(&vertex);
            simplex.push((vertex, fitness));
        }

        for _ in 0..self.max_iters {
            simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
            let best_fitness = simplex[0].1;
            let second_worst = simplex[dim - 1].1;

            // Centroid of everything but the worst vertex.
            let mut centroid = vec![0.0; dim];
            for (vertex, _) in &simplex[..dim] {
                for d in 0..dim {
                    centroid[d] += vertex[d];
                }
            }
            for c in &mut centroid {
                *c /= dim as f64;
            }

            let worst = simplex[dim].0.clone();
            let mut reflected: Vec<f64> = centroid
                .iter()
                .zip(&worst)
                .map(|(c, w)| c + ALPHA * (c - w))
                .collect();
            clamp_unit(&mut reflected);
            let reflected_fitness = eval(&reflected);

            if reflected_fitness.total_cmp(&best_fitness) == Ordering::Less {
                let mut expanded: Vec<f64> = centroid
                    .iter()
                    .zip(&reflected)
                    .map(|(c, r)| c + GAMMA * (r - c))
                    .collect();
                clamp_unit(&mut expanded);
                let expanded_fitness = eval(&expanded);
                simplex[dim] = if expanded_fitness.total_cmp(&reflected_fitness) == Ordering::Less {
                    (expanded, expanded_fitness)
                } else {
                    (reflected, reflected_fitness)
                };
            } else if reflected_fitness.total_cmp(&second_worst) == Ordering::Less {
                simplex[dim] = (reflected, reflected_fitness);
            } else {
                let mut contracted: Vec<f64> = centroid
                    .iter()
                    .zip(&worst)
                    .map(|(c, w)| c + RHO * (w - c))
                    .collect();
                clamp_unit(&mut contracted);
                let contracted_fitness = eval(&contracted);
                if contracted_fitness.total_cmp(&simplex[dim].1) == Ordering::Less {
                    simplex[dim] = (contracted, contracted_fitness);
                } else {
                    // Shrink everything toward the current best.
                    let best = simplex[0].0.clone();
                    for (vertex, fitness) in &mut simplex[1..] {
                        for d in 0..dim {
                            vertex[d] = best[d] + SIGMA * (vertex[d] - best[d]);
                        }
                        clamp_unit(vertex);
                        *fitness = eval(vertex);
                    }
                }
            }
        }

        simplex.sort_by(|a, b| a.1.total_cmp(&b.1));
        let (position, fitness) = simplex.swap_remove(0);
        if fitness.total_cmp(&start_fitness) == Ordering::Less {
            RefineOutcome {
                position,
                fitness,
                func_evals,
            }
        } else {
            RefineOutcome {
                position: start.to_vec(),
                fitness: start_fitness,
                func_evals,
            }
        }
    }
}

fn clamp_unit(position: &mut [f64]) {
    for x in position {
        *x = x.clamp(0.0, 1.0);
    }
}
