//! regsweep CLI - run a registration parameter sweep from a descriptor file

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use regsweep::descriptor::ExperimentDescriptor;
use regsweep::driver::{LogProgress, ProcessExecutor};
use regsweep::sweep::SweepOptions;

/// Automatic experimenter for 3D registration
#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Filename of the experiment descriptor (JSON)
    descriptor: PathBuf,

    /// Set output filename (overriding the one in the descriptor file)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Directory for the per-invocation report files (default: system temp dir)
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Also write a JSON ledger of every invocation to this path
    #[arg(long)]
    ledger: Option<PathBuf>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("regsweep=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match try_main(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn try_main(args: Args) -> anyhow::Result<()> {
    let descriptor = ExperimentDescriptor::load(&args.descriptor)?;
    let output = args
        .output
        .unwrap_or_else(|| descriptor.output().to_path_buf());

    let tic = Instant::now();
    println!("## Evaluating '{}'...", descriptor.name());

    let report_dir = args.report_dir.unwrap_or_else(std::env::temp_dir);
    let options = SweepOptions::new(&report_dir);
    info!(run_id = options.id(), report_dir = %report_dir.display(), "starting sweep");
    let outcome = regsweep::evaluate(&descriptor, &output, options, ProcessExecutor, LogProgress)?;

    for cell in outcome.ledger.cell_summaries() {
        if cell.incomplete > 0 {
            info!(
                parameter = %cell.parameter,
                value = %cell.value,
                completed = cell.completed,
                incomplete = cell.incomplete,
                "cell had incomplete invocations"
            );
        }
    }
    if let Some(path) = &args.ledger {
        outcome
            .ledger
            .write_json(path)
            .with_context(|| format!("writing ledger to {}", path.display()))?;
    }

    println!("## Finish.");
    println!(
        "Experiment completed in {:.2} seconds",
        tic.elapsed().as_secs_f64()
    );
    Ok(())
}
