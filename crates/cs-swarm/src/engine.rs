//! The particle-swarm optimization loop.

use std::cmp::Ordering;
use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use cs_types::{CsResult, SearchBounds};

use crate::config::SwarmConfig;
use crate::dump::ParticleDump;
use crate::objective::FitnessEvaluator;
use crate::observer::{ProgressObserver, ProgressReport};
use crate::particle::Particle;
use crate::refine::SimplexRefiner;
use crate::topology::Topology;

/// What a finished run hands back.
///
/// `best_position` is standardized; map through the bounds to recover
/// physical coordinates. `total_func_evals` counts every objective
/// call, including any spent on local refinement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwarmOutcome {
    pub best_position: Vec<f64>,
    pub best_fitness: f64,
    pub total_iterations: u64,
    pub total_func_evals: u64,
    pub run_time: Duration,
}

/// One seeded swarm over one search box. The run is fully determined
/// by the configuration, the bounds, and the seed.
pub struct SwarmEngine {
    config: SwarmConfig,
    bounds: SearchBounds,
    rng: StdRng,
}

impl SwarmEngine {
    pub fn new(config: SwarmConfig, bounds: SearchBounds, seed: u64) -> CsResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            bounds,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn bounds(&self) -> &SearchBounds {
        &self.bounds
    }

    /// Run the swarm to its iteration limit, then optionally refine the
    /// best point. Termination is by iteration count alone; fitness
    /// values never shorten or extend a run.
    pub fn run(
        &mut self,
        objective: &dyn FitnessEvaluator,
        observer: &mut dyn ProgressObserver,
        dump: Option<&ParticleDump>,
    ) -> CsResult<SwarmOutcome> {
        let started = Instant::now();
        let dim = self.bounds.dim();

        let mut particles: Vec<Particle> = (0..self.config.popsize)
            .map(|_| Particle::init(dim, self.config.max_velocity, &mut self.rng))
            .collect();
        for particle in &mut particles {
            let fitness = objective.evaluate(&self.bounds.to_physical(&particle.position));
            particle.observe(fitness);
        }
        refresh_neighborhood(self.config.topology, &mut particles);
        if let Some(dump) = dump {
            dump.snapshot(0, &particles)?;
        }

        for k in 0..self.config.max_steps {
            let w = self.config.inertia_weight(k);
            for particle in &mut particles {
                particle.update_velocity(
                    w,
                    self.config.c1,
                    self.config.c2,
                    self.config.max_velocity,
                    &mut self.rng,
                );
                particle.advance();
                let fitness = objective.evaluate(&self.bounds.to_physical(&particle.position));
                particle.observe(fitness);
            }
            // Neighborhood bests stay frozen during an iteration and are
            // recomputed exactly once, after every personal best has
            // been updated.
            refresh_neighborhood(self.config.topology, &mut particles);

            if self.config.report_interval > 0 && (k + 1) % self.config.report_interval == 0 {
                let (leader, best_fitness) = best_personal(&particles);
                observer.report(&ProgressReport {
                    iteration: (k + 1) as u64,
                    best_fitness,
                    best_position: particles[leader].pbest_position.clone(),
                    func_evals: total_evals(&particles),
                });
            }
            if let Some(dump) = dump {
                dump.snapshot(k + 1, &particles)?;
            }
        }

        let (leader, mut best_fitness) = best_personal(&particles);
        let mut best_position = particles[leader].pbest_position.clone();
        let mut refine_evals = 0;
        if self.config.refine_iters > 0 {
            let refiner = SimplexRefiner::new(self.config.refine_iters, self.config.refine_step);
            let refined = refiner.refine(&best_position, best_fitness, |position: &[f64]| {
                objective.evaluate(&self.bounds.to_physical(position))
            });
            refine_evals = refined.func_evals;
            best_position = refined.position;
            best_fitness = refined.fitness;
        }

        let outcome = SwarmOutcome {
            best_position,
            best_fitness,
            total_iterations: self.config.max_steps as u64,
            total_func_evals: total_evals(&particles) + refine_evals,
            run_time: started.elapsed(),
        };
        debug!(
            best_fitness = outcome.best_fitness,
            total_func_evals = outcome.total_func_evals,
            "swarm run complete"
        );
        Ok(outcome)
    }
}

fn refresh_neighborhood(topology: Topology, particles: &mut [Particle]) {
    let pbest: Vec<f64> = particles.iter().map(|p| p.pbest_fitness).collect();
    let leaders = topology.best_indices(&pbest);
    for (i, j) in leaders.into_iter().enumerate() {
        let position = particles[j].pbest_position.clone();
        let fitness = particles[j].pbest_fitness;
        particles[i].set_neighborhood_best(&position, fitness);
    }
}

/// Index and fitness of the lowest personal best. NaN bests lose to
/// real ones under the total order.
fn best_personal(particles: &[Particle]) -> (usize, f64) {
    let mut leader = 0;
    for (i, particle) in particles.iter().enumerate().skip(1) {
        if particle
            .pbest_fitness
            .total_cmp(&particles[leader].pbest_fitness)
            == Ordering::Less
        {
            leader = i;
        }
    }
    (leader, particles[leader].pbest_fitness)
}

fn total_evals(particles: &[Particle]) -> u64 {
    particles.iter().map(|p| p.func_evals).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::objective::{Rastrigin, Rosenbrock, Sphere};
    use crate::observer::{CollectingObserver, NullObserver};
    use tempfile::tempdir;

    fn unit_bounds(dim: usize) -> SearchBounds {
        SearchBounds::from_intervals(&vec![(-1.0, 1.0); dim]).unwrap()
    }

    fn small_config() -> SwarmConfig {
        SwarmConfig::default()
            .with_popsize(12)
            .with_max_steps(30)
            .with_refinement(0, 0.01)
    }

    #[test]
    fn test_evaluation_accounting_is_exact() {
        let config = SwarmConfig::default().with_refinement(0, 0.01);
        let mut engine = SwarmEngine::new(config, unit_bounds(2), 11).unwrap();
        let outcome = engine.run(&Sphere, &mut NullObserver, None).unwrap();
        // 40 particles, one initial evaluation plus one per iteration.
        assert_eq!(outcome.total_iterations, 250);
        assert_eq!(outcome.total_func_evals, 40 * 251);
    }

    #[test]
    fn test_identical_seeds_give_identical_outcomes() {
        let bounds = SearchBounds::from_intervals(&[(-5.12, 5.12); 3]).unwrap();
        let config = small_config().with_refinement(4, 0.02);

        let mut first = SwarmEngine::new(config.clone(), bounds.clone(), 99).unwrap();
        let mut second = SwarmEngine::new(config, bounds, 99).unwrap();
        let a = first.run(&Rastrigin, &mut NullObserver, None).unwrap();
        let b = second.run(&Rastrigin, &mut NullObserver, None).unwrap();

        assert_eq!(a.best_position, b.best_position);
        assert_eq!(a.best_fitness, b.best_fitness);
        assert_eq!(a.total_func_evals, b.total_func_evals);
    }

    #[test]
    fn test_objective_only_sees_points_inside_the_bounds() {
        let bounds = SearchBounds::from_intervals(&[(-3.0, 3.0), (2.0, 7.0)]).unwrap();
        let checked = |position: &[f64]| {
            assert!((-3.0..=3.0).contains(&position[0]), "x out of bounds");
            assert!((2.0..=7.0).contains(&position[1]), "y out of bounds");
            (position[0] - 1.0).powi(2) + (position[1] - 5.0).powi(2)
        };
        let config = small_config().with_refinement(6, 0.02);
        let mut engine = SwarmEngine::new(config, bounds, 3).unwrap();
        let outcome = engine.run(&checked, &mut NullObserver, None).unwrap();
        assert!(outcome.best_fitness.is_finite());
    }

    #[test]
    fn test_reported_best_never_worsens() {
        let config = small_config().with_report_interval(1);
        let mut engine = SwarmEngine::new(config, unit_bounds(2), 21).unwrap();
        let mut observer = CollectingObserver::default();
        engine.run(&Sphere, &mut observer, None).unwrap();

        assert_eq!(observer.reports.len(), 30);
        for pair in observer.reports.windows(2) {
            assert!(pair[1].best_fitness <= pair[0].best_fitness);
        }
    }

    #[test]
    fn test_reports_follow_the_interval() {
        let config = small_config().with_max_steps(20).with_report_interval(5);
        let mut engine = SwarmEngine::new(config, unit_bounds(2), 21).unwrap();
        let mut observer = CollectingObserver::default();
        engine.run(&Sphere, &mut observer, None).unwrap();

        let iterations: Vec<u64> = observer.reports.iter().map(|r| r.iteration).collect();
        assert_eq!(iterations, vec![5, 10, 15, 20]);
    }

    #[test]
    fn test_nan_objective_still_terminates_on_schedule() {
        let config = small_config().with_popsize(8).with_max_steps(10);
        let mut engine = SwarmEngine::new(config, unit_bounds(2), 4).unwrap();
        let outcome = engine
            .run(&|_: &[f64]| f64::NAN, &mut NullObserver, None)
            .unwrap();
        assert!(outcome.best_fitness.is_nan());
        assert_eq!(outcome.total_iterations, 10);
        assert_eq!(outcome.total_func_evals, 8 * 11);
    }

    #[test]
    fn test_refinement_never_regresses_the_swarm_best() {
        let bounds = SearchBounds::from_intervals(&[(-2.0, 2.0), (-2.0, 2.0)]).unwrap();

        let mut plain = SwarmEngine::new(small_config(), bounds.clone(), 17).unwrap();
        let unrefined = plain.run(&Rosenbrock, &mut NullObserver, None).unwrap();

        let refined_config = small_config().with_refinement(8, 0.02);
        let mut with_refine = SwarmEngine::new(refined_config, bounds, 17).unwrap();
        let refined = with_refine.run(&Rosenbrock, &mut NullObserver, None).unwrap();

        assert!(refined.best_fitness <= unrefined.best_fitness);
        assert!(refined.total_func_evals > unrefined.total_func_evals);
    }

    #[test]
    fn test_every_topology_completes() {
        for topology in [
            Topology::GlobalBest,
            Topology::RingLocal { span: 2 },
            Topology::Standard,
        ] {
            let config = small_config().with_topology(topology);
            let mut engine = SwarmEngine::new(config, unit_bounds(2), 8).unwrap();
            let outcome = engine.run(&Sphere, &mut NullObserver, None).unwrap();
            assert!(outcome.best_fitness.is_finite());
            assert!(outcome.best_fitness >= 0.0);
        }
    }

    #[test]
    fn test_dump_records_every_iteration_and_the_initial_state() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dump.txt");
        let dump = ParticleDump::create(&path).unwrap();

        let config = small_config().with_popsize(5).with_max_steps(3);
        let mut engine = SwarmEngine::new(config, unit_bounds(2), 13).unwrap();
        engine.run(&Sphere, &mut NullObserver, Some(&dump)).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        // 5 particles over the initial state plus 3 iterations.
        assert_eq!(text.lines().count(), 5 * 4);
    }
}
