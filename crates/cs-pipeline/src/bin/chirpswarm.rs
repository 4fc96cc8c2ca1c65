use std::path::PathBuf;

use anyhow::Context;

use cs_pipeline::RunArgs;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    if args.len() != 6 {
        eprintln!(
            "usage: {} <general settings file> <detector mapping file> \
             <optimizer settings file> <num trials> <results file>",
            args.first().map(String::as_str).unwrap_or("chirpswarm")
        );
        std::process::exit(2);
    }

    let num_trials: usize = args[4]
        .parse()
        .with_context(|| format!("invalid trial count: {}", args[4]))?;

    let run_args = RunArgs {
        general_settings: PathBuf::from(&args[1]),
        detector_mapping: PathBuf::from(&args[2]),
        optimizer_settings: PathBuf::from(&args[3]),
        num_trials,
        results_file: PathBuf::from(&args[5]),
    };

    let status = cs_pipeline::run(&run_args).context("trial run failed")?;
    if let Some(best) = &status.best {
        println!("{}", best.to_line());
    }
    Ok(())
}
