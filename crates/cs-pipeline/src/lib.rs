//! # cs-pipeline
//!
//! End-to-end inspiral parameter estimation for chirpswarm.
//!
//! Maps the four-dimensional coalescence space onto the swarm engine,
//! evaluates a network detection statistic per candidate, and drives
//! the scheduler so every trial's best lands in the results file.

mod driver;
mod runner;
mod space;
mod statistic;

pub use driver::{run, RunArgs};
pub use runner::TrialRunner;
pub use space::{CoalescenceParams, CoalescenceSpace};
pub use statistic::{NetworkStatistic, StatisticObjective, TestSourceStatistic};
