//! # cs-swarm
//!
//! Particle-swarm optimization core for chirpswarm.
//!
//! Provides the seeded swarm engine over standardized coordinates,
//! neighborhood topologies, progress reporting, bounded Nelder-Mead
//! refinement of the final best, and plain-text particle dumps.

mod config;
mod dump;
mod engine;
mod objective;
mod observer;
mod particle;
mod refine;
mod topology;

pub use config::SwarmConfig;
pub use dump::ParticleDump;
pub use engine::{SwarmEngine, SwarmOutcome};
pub use objective::{FitnessEvaluator, Rastrigin, Rosenbrock, Sphere};
pub use observer::{
    ChannelObserver, CollectingObserver, NullObserver, ProgressObserver, ProgressReport,
};
pub use particle::Particle;
pub use refine::{RefineOutcome, SimplexRefiner};
pub use topology::Topology;
