//! # cs-scheduler
//!
//! Deterministic trial scheduling for chirpswarm.
//!
//! Derives every per-trial seed up front from one master seed, spreads
//! trials over workers round-robin, runs them on scoped threads behind
//! a rendezvous channel, and appends each result to an on-disk sink in
//! completion order.

mod partition;
mod protocol;
mod seeds;
mod sink;

pub use partition::TrialPartition;
pub use protocol::{run_trials, TrialAssignment, TrialExecutor};
pub use seeds::derive_seeds;
pub use sink::ResultSink;
