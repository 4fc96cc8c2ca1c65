//! Progress reporting hooks for long swarm runs.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Snapshot of the swarm's best at a reporting point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProgressReport {
    /// 1-based iteration the report was taken after.
    pub iteration: u64,
    pub best_fitness: f64,
    pub best_position: Vec<f64>,
    pub func_evals: u64,
}

/// Receives reports synchronously from inside the optimization loop.
pub trait ProgressObserver {
    fn report(&mut self, report: &ProgressReport);
}

/// Discards every report.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn report(&mut self, _report: &ProgressReport) {}
}

/// Forwards reports over a channel without ever blocking the
/// optimization loop. Reports the receiver cannot take are dropped.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<ProgressReport>,
}

impl ChannelObserver {
    pub fn new(tx: Sender<ProgressReport>) -> Self {
        Self { tx }
    }
}

impl ProgressObserver for ChannelObserver {
    fn report(&mut self, report: &ProgressReport) {
        if self.tx.try_send(report.clone()).is_err() {
            debug!(
                iteration = report.iteration,
                "progress receiver unavailable, dropping report"
            );
        }
    }
}

/// Buffers every report in memory, mainly for tests.
#[derive(Debug, Clone, Default)]
pub struct CollectingObserver {
    pub reports: Vec<ProgressReport>,
}

impl ProgressObserver for CollectingObserver {
    fn report(&mut self, report: &ProgressReport) {
        self.reports.push(report.clone());
    }
}
