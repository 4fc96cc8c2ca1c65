//! Master/worker execution of independent trials.
//!
//! Workers execute their statically assigned trials and hand each
//! result to the coordinator over a rendezvous channel, so a worker
//! never runs more than one trial ahead of the coordinator's appends.
//! The coordinator writes records in completion order and tears the
//! run down only after every expected result has arrived or the
//! channel has died.

use crossbeam_channel::{bounded, Receiver, Sender};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

use cs_types::{
    config_error, internal_error, resource_error, CsResult, ResultRecord, RunStatus,
    TransportError, WireRecord,
};

use crate::partition::TrialPartition;
use crate::sink::ResultSink;

/// One unit of work: the trial index and the seed it must run with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrialAssignment {
    pub index: usize,
    pub seed: u64,
}

/// Runs a single trial to completion.
///
/// Implementations are shared across worker threads, hence `Send + Sync`.
pub trait TrialExecutor: Send + Sync {
    fn execute(&self, trial: &TrialAssignment) -> CsResult<ResultRecord>;
}

/// Execute every trial in the partition and append each result to the
/// sink as it completes.
///
/// Workers run on scoped threads. A worker that fails or panics stops
/// sending; once every sender is gone the coordinator's receive fails
/// and the run aborts with a transport error carrying the completed
/// count, rather than hanging on results that will never arrive.
pub fn run_trials(
    executor: &dyn TrialExecutor,
    partition: &TrialPartition,
    seeds: &[u64],
    sink: &ResultSink,
) -> CsResult<RunStatus> {
    if seeds.len() != partition.num_trials() {
        return Err(config_error!(
            "seed count {} does not match trial count {}",
            seeds.len(),
            partition.num_trials()
        ));
    }
    partition.verify()?;

    let mut status = RunStatus::new(partition.num_trials());
    status.mark_running();
    info!(
        trials = partition.num_trials(),
        workers = partition.num_workers(),
        "starting trial run"
    );

    let outcome = std::thread::scope(|scope| -> CsResult<()> {
        let (tx, rx) = bounded::<WireRecord>(0);
        let mut handles = Vec::with_capacity(partition.num_workers());
        for rank in 1..=partition.num_workers() {
            let assigned = partition.assigned(rank);
            let tx = tx.clone();
            let handle = std::thread::Builder::new()
                .name(format!("cs-worker-{rank}"))
                .spawn_scoped(scope, move || {
                    worker_loop(rank, executor, seeds, assigned, tx)
                })
                .map_err(|err| resource_error!("cannot spawn worker {rank}: {err}"))?;
            handles.push(handle);
        }
        drop(tx);

        let collected = collect_results(&rx, partition, sink, &mut status);

        // Unblock any worker still mid-send, then join them all before
        // reporting, so the error path cannot leave threads behind.
        drop(rx);
        let mut panicked = false;
        for handle in handles {
            if handle.join().is_err() {
                panicked = true;
            }
        }
        if panicked {
            error!("worker thread panicked");
        }
        match collected {
            Ok(()) if panicked => Err(internal_error!("worker thread panicked")),
            other => other,
        }
    });

    match outcome {
        Ok(()) => {
            status.mark_completed();
            info!(completed = status.trials_completed, "trial run complete");
            Ok(status)
        }
        Err(err) => {
            status.mark_failed(err.to_string());
            error!(error = %err, "trial run failed");
            Err(err)
        }
    }
}

fn collect_results(
    rx: &Receiver<WireRecord>,
    partition: &TrialPartition,
    sink: &ResultSink,
    status: &mut RunStatus,
) -> CsResult<()> {
    for _ in 0..partition.num_trials() {
        let wire = rx.recv().map_err(|_| TransportError::Disconnected {
            completed: status.trials_completed,
            expected: partition.num_trials(),
        })?;
        let record = ResultRecord::from_wire(&wire);
        sink.append(&record)?;
        info!(
            statistic = record.network_statistic,
            func_evals = record.total_func_evals,
            "trial result recorded"
        );
        status.record_completed(&record);
    }
    Ok(())
}

fn worker_loop(
    rank: usize,
    executor: &dyn TrialExecutor,
    seeds: &[u64],
    assigned: Vec<usize>,
    tx: Sender<WireRecord>,
) {
    for index in assigned {
        let trial = TrialAssignment {
            index,
            seed: seeds[index],
        };
        debug!(rank, trial = index, "executing trial");
        let record = match executor.execute(&trial) {
            Ok(record) => record,
            Err(err) => {
                error!(rank, trial = index, error = %err, "trial failed, worker stopping");
                return;
            }
        };
        if tx.send(record.to_wire()).is_err() {
            warn!(rank, trial = index, "coordinator stopped receiving, worker stopping");
            return;
        }
    }
    debug!(rank, "worker drained its assignment");
}
