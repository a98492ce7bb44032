//! Sweep orchestration
//!
//! ```text
//! for parameter with values:            -> one ParameterSeries
//!     for value in parameter.values:    -> one ValueSeries
//!         for dataset:                  -> one invocation
//!             synthesize -> run -> read report -> pose error + timings
//! ```
//!
//! Invocations run strictly one after another. Each gets its own report
//! path, derived from the run id and the invocation index, and the report is
//! removed once it has been read.
//!
//! A report that cannot be read stops the sweep. A report with
//! `completed = false` adds nothing to the plots; it is only visible in the
//! [`RunLedger`].

mod result;

pub use result::{ParameterSeries, SweepResult, TimingAggregate, ValueSeries};

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::command::Invocation;
use crate::descriptor::ExperimentDescriptor;
use crate::driver::{Driver, Executor, Progress};
use crate::pose::{PoseError, Transform};
use crate::report::AlgorithmReport;
use crate::tracking::{InvocationRecord, RunLedger};
use crate::{Error, Result};

const RUN_ID_CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const RUN_ID_LEN: usize = 6;

/// Where and under which name a sweep writes its per-invocation reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SweepOptions {
    report_dir: PathBuf,
    run_id: String,
}

impl SweepOptions {
    /// Options writing reports to `report_dir` under a fresh random run id.
    #[must_use]
    pub fn new(report_dir: impl Into<PathBuf>) -> Self {
        Self {
            report_dir: report_dir.into(),
            run_id: generate_run_id(),
        }
    }

    /// Replace the run id.
    #[must_use]
    pub fn run_id(mut self, run_id: impl Into<String>) -> Self {
        self.run_id = run_id.into();
        self
    }

    /// Get the run id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.run_id
    }

    /// Get the report directory.
    #[must_use]
    pub fn report_dir(&self) -> &Path {
        &self.report_dir
    }

    /// Report path handed to invocation `index`.
    #[must_use]
    pub fn report_path(&self, index: usize) -> PathBuf {
        self.report_dir
            .join(format!("report_{}_{index}.json", self.run_id))
    }
}

impl Default for SweepOptions {
    fn default() -> Self {
        Self::new(std::env::temp_dir())
    }
}

/// Random six-character uppercase alphanumeric token.
#[must_use]
pub fn generate_run_id() -> String {
    let mut rng = rand::thread_rng();
    (0..RUN_ID_LEN)
        .map(|_| char::from(RUN_ID_CHARSET[rng.gen_range(0..RUN_ID_CHARSET.len())]))
        .collect()
}

/// What a finished sweep hands back.
#[derive(Debug, Clone)]
pub struct SweepOutcome {
    /// Plot data
    pub result: SweepResult,
    /// Every invocation, including incomplete ones
    pub ledger: RunLedger,
}

/// Runs the parameter sweep described by an [`ExperimentDescriptor`].
#[derive(Debug)]
pub struct Sweep<'a> {
    descriptor: &'a ExperimentDescriptor,
    options: SweepOptions,
}

impl<'a> Sweep<'a> {
    /// Prepare a sweep.
    #[must_use]
    pub const fn new(descriptor: &'a ExperimentDescriptor, options: SweepOptions) -> Self {
        Self {
            descriptor,
            options,
        }
    }

    /// Get the options.
    #[must_use]
    pub const fn options(&self) -> &SweepOptions {
        &self.options
    }

    /// Run every invocation and collect the results.
    ///
    /// # Errors
    ///
    /// - [`Error::ReportUnavailable`] when an invocation leaves no readable
    ///   report; no further invocation runs.
    /// - [`Error::GroundTruth`], [`Error::MatrixShape`] or
    ///   [`Error::InvalidNumber`] for malformed inputs of a completed run.
    /// - Any error returned by the executor.
    pub fn run<E: Executor, P: Progress>(&self, executor: E, progress: P) -> Result<SweepOutcome> {
        let descriptor = self.descriptor;
        let mut driver = Driver::new(executor, progress, descriptor.invocation_count());
        let mut ledger = RunLedger::new(self.options.id(), descriptor.name());
        let mut result = SweepResult::new(descriptor.dataset_variable());
        let mut index = 0;

        for parameter in descriptor.sweep_targets() {
            info!(
                parameter = parameter.name(),
                values = parameter.swept_values().len(),
                "sweeping parameter"
            );
            let mut series = ParameterSeries::new(parameter.name(), parameter.flag());

            for value in parameter.swept_values() {
                let mut cell = ValueSeries::new(value.as_str());

                for (dataset_index, dataset) in descriptor.datasets().iter().enumerate() {
                    let sigma = dataset.sigma()?;
                    let report_path = self.options.report_path(index);
                    let invocation =
                        Invocation::synthesize(descriptor, dataset, parameter, value, &report_path)?;
                    let command = invocation.to_string();

                    let mut record = InvocationRecord::builder(index, parameter.flag(), value.as_str())
                        .dataset(dataset_index, sigma)
                        .command(command.as_str())
                        .build();
                    record.start();
                    debug!(index, %command, "running invocation");
                    if let Err(err) = driver.run(&invocation) {
                        remove_report(&report_path);
                        return Err(err);
                    }
                    let report = AlgorithmReport::read(&report_path);
                    remove_report(&report_path);
                    let report = report.map_err(|source| Error::ReportUnavailable {
                        command,
                        path: report_path.clone(),
                        source: Box::new(source),
                    })?;

                    if report.is_completed() {
                        let ground_truth = Transform::load(dataset.ground_truth())?;
                        let error = PoseError::between(&report.transformation()?, &ground_truth);
                        cell.push(sigma, error);
                        for entry in report.timing() {
                            result.timings_mut().record(entry.tag(), entry.seconds()?);
                        }
                        record.finish_completed(error);
                    } else {
                        debug!(index, "report not completed, skipping");
                        record.finish_incomplete();
                    }
                    ledger.push(record);
                    index += 1;
                }
                series.push(cell);
            }
            result.push_parameter(series);
        }

        info!(
            invocations = driver.done(),
            incomplete = ledger.incomplete_count(),
            "sweep finished"
        );
        Ok(SweepOutcome { result, ledger })
    }
}

/// Best-effort removal; a missing file is fine.
fn remove_report(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => warn!(path = %path.display(), %err, "could not remove report"),
    }
}
