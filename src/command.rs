//! Command synthesis for one sweep invocation
//!
//! Argument order is fixed:
//!
//! ```text
//! <exe> [additional flags] -p <P> -q <Q> <tested flag> <value>
//!       [<other flag> <nominal>]... <report flag> <report path>
//! ```
//!
//! Additional flags are split with shell quoting rules; every other flag and
//! value is passed through untouched.

use std::ffi::OsString;
use std::fmt;
use std::path::Path;

use crate::descriptor::{Dataset, ExperimentDescriptor, Parameter};
use crate::Result;

/// A fully resolved program invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<OsString>,
}

impl Invocation {
    /// Build the invocation testing `value` of `tested` on `dataset`.
    ///
    /// Every other parameter of the descriptor (matched by flag) is held at
    /// its nominal value, in descriptor order.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::AdditionalFlags`] if the descriptor's additional
    /// flags leave a quote open.
    pub fn synthesize(
        descriptor: &ExperimentDescriptor,
        dataset: &Dataset,
        tested: &Parameter,
        value: &str,
        report_path: &Path,
    ) -> Result<Self> {
        let mut args: Vec<OsString> = descriptor
            .additional_args()?
            .into_iter()
            .map(OsString::from)
            .collect();

        args.push("-p".into());
        args.push(dataset.p().into());
        args.push("-q".into());
        args.push(dataset.q().into());

        args.push(tested.flag().into());
        args.push(value.into());

        for other in descriptor
            .parameters()
            .iter()
            .filter(|p| p.flag() != tested.flag())
        {
            args.push(other.flag().into());
            args.push(other.nominal().into());
        }

        args.push(descriptor.report_flag().into());
        args.push(report_path.into());

        Ok(Self {
            program: descriptor.exe().to_string(),
            args,
        })
    }

    /// Get the program to run.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Get the argument vector (without the program).
    #[must_use]
    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Value following the first occurrence of `flag`, if any.
    #[must_use]
    pub fn flag_value(&self, flag: &str) -> Option<&OsString> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg.to_string_lossy())?;
        }
        Ok(())
    }
}
