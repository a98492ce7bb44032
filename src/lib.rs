//! # regsweep: Parameter Sweeps for 3D Registration Algorithms
//!
//! regsweep drives an external point-cloud registration program through a
//! declarative parameter sweep, measures how far each estimated pose is from
//! ground truth, and renders the errors and timings into an HTML or LaTeX
//! report.
//!
//! ## Pipeline
//!
//! ```text
//! descriptor.json ─> Sweep ─┬─> Invocation ─> Driver ─> report.json
//!                           │                               │
//!                           │        PoseError <────────────┤
//!                           │        TimingAggregate <──────┘
//!                           └─> SweepResult ─> Document ─> out.html / out.tex
//! ```
//!
//! ## Example
//!
//! ```rust,no_run
//! use regsweep::descriptor::ExperimentDescriptor;
//! use regsweep::driver::{LogProgress, ProcessExecutor};
//! use regsweep::sweep::SweepOptions;
//!
//! let descriptor = ExperimentDescriptor::load("descriptor.json")?;
//! let outcome = regsweep::evaluate(
//!     &descriptor,
//!     descriptor.output(),
//!     SweepOptions::default(),
//!     ProcessExecutor,
//!     LogProgress,
//! )?;
//! println!("{} invocations", outcome.ledger.records().len());
//! # Ok::<(), regsweep::Error>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod command;
pub mod descriptor;
pub mod driver;
pub mod error;
pub mod pose;
pub mod render;
pub mod report;
pub mod sweep;
pub mod tracking;

pub use error::{Error, Result};

use std::path::Path;

use tracing::info;

use descriptor::ExperimentDescriptor;
use driver::{Executor, Progress};
use render::{render_to_file, OutputFormat};
use sweep::{Sweep, SweepOptions, SweepOutcome};

/// Run the whole experiment and write the report to `output`.
///
/// The output format is checked before anything runs, so an unsupported
/// extension never costs an invocation.
///
/// # Errors
///
/// Returns [`Error::UnsupportedOutput`] for an unknown extension, any error
/// of [`Sweep::run`], and [`Error::Io`] if the report cannot be written.
pub fn evaluate<E: Executor, P: Progress>(
    descriptor: &ExperimentDescriptor,
    output: &Path,
    options: SweepOptions,
    executor: E,
    progress: P,
) -> Result<SweepOutcome> {
    let format = OutputFormat::infer(output)?;
    let outcome = Sweep::new(descriptor, options).run(executor, progress)?;
    let document = outcome.result.to_document(descriptor.name());
    render_to_file(&document, output, format)?;
    info!(output = %output.display(), ?format, "report written");
    Ok(outcome)
}
