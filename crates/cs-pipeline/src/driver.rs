//! Wires settings, the trial schedule, and the swarm into one run.

use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use cs_scheduler::{derive_seeds, run_trials, ResultSink, TrialPartition};
use cs_swarm::SwarmConfig;
use cs_types::{config_error, CsResult, DetectorMapping, GeneralSettings, RunStatus, SettingsFile};

use crate::runner::TrialRunner;
use crate::space::CoalescenceSpace;
use crate::statistic::TestSourceStatistic;

/// Everything the command line provides.
#[derive(Debug, Clone)]
pub struct RunArgs {
    pub general_settings: PathBuf,
    pub detector_mapping: PathBuf,
    pub optimizer_settings: PathBuf,
    pub num_trials: usize,
    pub results_file: PathBuf,
}

/// Run `num_trials` independent swarms and append every result to the
/// results file. All configuration is rejected before the first worker
/// is spawned.
pub fn run(args: &RunArgs) -> CsResult<RunStatus> {
    if args.num_trials == 0 {
        return Err(config_error!("trial count must be at least 1"));
    }

    let general = GeneralSettings::load(&args.general_settings)?;
    let mapping = DetectorMapping::load(&args.detector_mapping)?;
    let optimizer = SettingsFile::open(&args.optimizer_settings)?;
    let config = SwarmConfig::from_settings(&optimizer)?;
    let dump_prefix = optimizer.get("debug_dump_prefix").map(PathBuf::from);

    info!(
        detectors = ?mapping.detectors(),
        f_low = general.f_low,
        f_high = general.f_high,
        "detector network configured"
    );

    // Workers beyond the trial count would only idle.
    let workers = general
        .num_workers
        .unwrap_or_else(default_workers)
        .min(args.num_trials);
    let partition = TrialPartition::new(args.num_trials, workers)?;
    let seeds = derive_seeds(general.pso_alpha_seed, args.num_trials);
    info!(
        master_seed = general.pso_alpha_seed,
        trials = args.num_trials,
        workers,
        "trial schedule prepared"
    );

    let space = CoalescenceSpace::from_settings(&general)?;
    let statistic = Arc::new(TestSourceStatistic::from_settings(&general));
    let mut runner = TrialRunner::new(space, config, statistic);
    if let Some(prefix) = dump_prefix {
        runner = runner.with_dump_prefix(prefix);
    }
    let sink = ResultSink::new(&args.results_file);

    let status = run_trials(&runner, &partition, &seeds, &sink)?;
    if let Some(best) = &status.best {
        info!(
            statistic = best.network_statistic,
            right_ascension = best.right_ascension,
            declination = best.declination,
            "best candidate across trials"
        );
    }
    Ok(status)
}

fn default_workers() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get().saturating_sub(1))
        .unwrap_or(1)
        .max(1)
}
