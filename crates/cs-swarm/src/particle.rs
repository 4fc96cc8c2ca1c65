//! A single swarm member in standardized coordinates.

use std::cmp::Ordering;

use rand::Rng;
use serde::{Deserialize, Serialize};

/// Position, velocity, and best-so-far bookkeeping for one particle.
///
/// All coordinates live in the unit hypercube; the caller maps to
/// physical coordinates before evaluating fitness. Fitness is
/// minimized. Personal bests start as NaN and the first observation
/// always replaces them, so a run whose objective only ever returns
/// NaN still reports NaN instead of a fabricated value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub position: Vec<f64>,
    pub velocity: Vec<f64>,
    pub pbest_position: Vec<f64>,
    pub nbest_position: Vec<f64>,
    pub pbest_fitness: f64,
    pub nbest_fitness: f64,
    pub fitness: f64,
    pub inertia: f64,
    pub func_evals: u64,
}

impl Particle {
    /// Uniform position in `[0, 1]^dim`, uniform velocity in
    /// `[-max_velocity, max_velocity]` per dimension.
    pub fn init<R: Rng>(dim: usize, max_velocity: f64, rng: &mut R) -> Self {
        let position: Vec<f64> = (0..dim).map(|_| rng.random::<f64>()).collect();
        let velocity = (0..dim)
            .map(|_| rng.random_range(-max_velocity..=max_velocity))
            .collect();
        Self {
            pbest_position: position.clone(),
            nbest_position: position.clone(),
            position,
            velocity,
            pbest_fitness: f64::NAN,
            nbest_fitness: f64::NAN,
            fitness: f64::NAN,
            inertia: 0.0,
            func_evals: 0,
        }
    }

    /// Record a fitness evaluation at the current position, updating the
    /// personal best when it improves on it.
    pub fn observe(&mut self, fitness: f64) {
        self.fitness = fitness;
        self.func_evals += 1;
        if self.func_evals == 1 || fitness.total_cmp(&self.pbest_fitness) == Ordering::Less {
            self.pbest_fitness = fitness;
            self.pbest_position.copy_from_slice(&self.position);
        }
    }

    /// Standard velocity update with per-dimension random coefficients,
    /// clamped to `[-max_velocity, max_velocity]`.
    pub fn update_velocity<R: Rng>(
        &mut self,
        w: f64,
        c1: f64,
        c2: f64,
        max_velocity: f64,
        rng: &mut R,
    ) {
        self.inertia = w;
        for d in 0..self.velocity.len() {
            let r1 = rng.random::<f64>();
            let r2 = rng.random::<f64>();
            let v = w * self.velocity[d]
                + c1 * r1 * (self.pbest_position[d] - self.position[d])
                + c2 * r2 * (self.nbest_position[d] - self.position[d]);
            self.velocity[d] = v.clamp(-max_velocity, max_velocity);
        }
    }

    /// Step the position by the current velocity. A component leaving the
    /// unit interval is clipped to the boundary and its velocity zeroed.
    pub fn advance(&mut self) {
        for d in 0..self.position.len() {
            let x = self.position[d] + self.velocity[d];
            if x < 0.0 {
                self.position[d] = 0.0;
                self.velocity[d] = 0.0;
            } else if x > 1.0 {
                self.position[d] = 1.0;
                self.velocity[d] = 0.0;
            } else {
                self.position[d] = x;
            }
        }
    }

    pub fn set_neighborhood_best(&mut self, position: &[f64], fitness: f64) {
        self.nbest_position.copy_from_slice(position);
        self.nbest_fitness = fitness;
    }
}
