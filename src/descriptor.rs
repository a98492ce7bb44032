//! Experiment descriptor - declarative description of a parameter sweep
//!
//! ## Schema Overview
//!
//! ```text
//! ExperimentDescriptor (1) ──< Parameter (N)   [flag, nominal, values]
//!                          └──< Dataset (M)    [P, Q, T, sigma]
//! ```
//!
//! Every parameter with at least one value is swept against every dataset,
//! giving `sum(values) x M` invocations. Parameters with no values only
//! contribute their nominal value.
//!
//! ## Usage
//!
//! ```rust
//! use regsweep::descriptor::{Dataset, ExperimentDescriptor, Parameter};
//!
//! let descriptor = ExperimentDescriptor::builder("FGR noise study", "./FastGlobalRegistration")
//!     .report_flag("--report")
//!     .dataset_variable("Noise sigma")
//!     .parameter(Parameter::new("Max iterations", "--max-iter", "64").values(["16", "64"]))
//!     .parameter(Parameter::new("Tuple scale", "--tuple-scale", "0.95"))
//!     .dataset(Dataset::new("p0.ply", "q0.ply", "gt0.txt", "0.0"))
//!     .dataset(Dataset::new("p1.ply", "q1.ply", "gt1.txt", "0.01"))
//!     .build();
//!
//! assert_eq!(descriptor.invocation_count(), 4);
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One tunable flag of the algorithm under test.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Parameter {
    name: String,
    flag: String,
    nominal: String,
    #[serde(default)]
    values: Vec<String>,
}

impl Parameter {
    /// Create a parameter with no swept values.
    ///
    /// # Arguments
    ///
    /// * `name` - Label used in plot titles
    /// * `flag` - Command-line flag of the algorithm
    /// * `nominal` - Value used while another parameter is under test
    #[must_use]
    pub fn new(name: impl Into<String>, flag: impl Into<String>, nominal: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            flag: flag.into(),
            nominal: nominal.into(),
            values: Vec::new(),
        }
    }

    /// Set the values swept for this parameter.
    #[must_use]
    pub fn values<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.values = values.into_iter().map(Into::into).collect();
        self
    }

    /// Get the parameter label.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the command-line flag.
    #[must_use]
    pub fn flag(&self) -> &str {
        &self.flag
    }

    /// Get the nominal value.
    #[must_use]
    pub fn nominal(&self) -> &str {
        &self.nominal
    }

    /// Get the swept values (may be empty).
    #[must_use]
    pub fn swept_values(&self) -> &[String] {
        &self.values
    }

    /// Whether this parameter drives its own sweep.
    #[must_use]
    pub fn is_sweep_target(&self) -> bool {
        !self.values.is_empty()
    }
}

/// A registration problem with known ground truth.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Dataset {
    #[serde(rename = "P")]
    p: PathBuf,
    #[serde(rename = "Q")]
    q: PathBuf,
    #[serde(rename = "T")]
    ground_truth: PathBuf,
    sigma: String,
}

impl Dataset {
    /// Create a dataset entry.
    ///
    /// `sigma` is kept as text, as in the descriptor file, and parsed on use.
    #[must_use]
    pub fn new(
        p: impl Into<PathBuf>,
        q: impl Into<PathBuf>,
        ground_truth: impl Into<PathBuf>,
        sigma: impl Into<String>,
    ) -> Self {
        Self {
            p: p.into(),
            q: q.into(),
            ground_truth: ground_truth.into(),
            sigma: sigma.into(),
        }
    }

    /// Path of the first point cloud.
    #[must_use]
    pub fn p(&self) -> &Path {
        &self.p
    }

    /// Path of the second point cloud.
    #[must_use]
    pub fn q(&self) -> &Path {
        &self.q
    }

    /// Path of the ground-truth 4x4 transform.
    #[must_use]
    pub fn ground_truth(&self) -> &Path {
        &self.ground_truth
    }

    /// The X-axis coordinate of this dataset.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] if `sigma` is not a float.
    pub fn sigma(&self) -> Result<f64> {
        self.sigma
            .trim()
            .parse()
            .map_err(|_| Error::InvalidNumber {
                context: "dataset sigma".to_string(),
                value: self.sigma.clone(),
            })
    }
}

/// Declarative description of one parameter sweep.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperimentDescriptor {
    name: String,
    exe: String,
    #[serde(default)]
    additional_flags: String,
    report_flag: String,
    dataset_variable: String,
    parameters: Vec<Parameter>,
    dataset: Vec<Dataset>,
    output: PathBuf,
}

impl ExperimentDescriptor {
    /// Create a builder with the required name and executable.
    #[must_use]
    pub fn builder(name: impl Into<String>, exe: impl Into<String>) -> ExperimentDescriptorBuilder {
        ExperimentDescriptorBuilder::new(name, exe)
    }

    /// Load a descriptor from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Descriptor`] if the file cannot be read or does not
    /// match the descriptor schema.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let data = fs::read_to_string(path).map_err(|e| Error::descriptor(path, e))?;
        let descriptor: Self =
            serde_json::from_str(&data).map_err(|e| Error::descriptor(path, e))?;
        descriptor
            .additional_args()
            .map_err(|e| Error::descriptor(path, e))?;
        Ok(descriptor)
    }

    /// Get the experiment name (report title).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the algorithm executable.
    #[must_use]
    pub fn exe(&self) -> &str {
        &self.exe
    }

    /// Get the flags appended verbatim to every invocation.
    #[must_use]
    pub fn additional_flags(&self) -> &str {
        &self.additional_flags
    }

    /// Split the additional flags into arguments with shell quoting rules.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AdditionalFlags`] if a quote is left open.
    pub fn additional_args(&self) -> Result<Vec<String>> {
        shlex::split(&self.additional_flags)
            .ok_or_else(|| Error::AdditionalFlags(self.additional_flags.clone()))
    }

    /// Get the flag the algorithm uses to accept a report path.
    #[must_use]
    pub fn report_flag(&self) -> &str {
        &self.report_flag
    }

    /// Get the X-axis label of every error plot.
    #[must_use]
    pub fn dataset_variable(&self) -> &str {
        &self.dataset_variable
    }

    /// Get all parameters in descriptor order.
    #[must_use]
    pub fn parameters(&self) -> &[Parameter] {
        &self.parameters
    }

    /// Get all datasets in descriptor order.
    #[must_use]
    pub fn datasets(&self) -> &[Dataset] {
        &self.dataset
    }

    /// Get the default output document path.
    #[must_use]
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Parameters that drive their own sweep, in descriptor order.
    pub fn sweep_targets(&self) -> impl Iterator<Item = &Parameter> {
        self.parameters.iter().filter(|p| p.is_sweep_target())
    }

    /// Number of invocations the sweep will run.
    ///
    /// Counted over every parameter's values; parameters without values add
    /// nothing, so this equals the number of invocations actually run.
    #[must_use]
    pub fn invocation_count(&self) -> usize {
        let values: usize = self.parameters.iter().map(|p| p.values.len()).sum();
        values * self.dataset.len()
    }
}

/// Builder for `ExperimentDescriptor`.
#[derive(Debug)]
pub struct ExperimentDescriptorBuilder {
    descriptor: ExperimentDescriptor,
}

impl ExperimentDescriptorBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(name: impl Into<String>, exe: impl Into<String>) -> Self {
        Self {
            descriptor: ExperimentDescriptor {
                name: name.into(),
                exe: exe.into(),
                additional_flags: String::new(),
                report_flag: "--report".to_string(),
                dataset_variable: "sigma".to_string(),
                parameters: Vec::new(),
                dataset: Vec::new(),
                output: PathBuf::from("report.html"),
            },
        }
    }

    /// Set flags appended verbatim to every invocation.
    #[must_use]
    pub fn additional_flags(mut self, flags: impl Into<String>) -> Self {
        self.descriptor.additional_flags = flags.into();
        self
    }

    /// Set the report-path flag.
    #[must_use]
    pub fn report_flag(mut self, flag: impl Into<String>) -> Self {
        self.descriptor.report_flag = flag.into();
        self
    }

    /// Set the X-axis label.
    #[must_use]
    pub fn dataset_variable(mut self, label: impl Into<String>) -> Self {
        self.descriptor.dataset_variable = label.into();
        self
    }

    /// Append a parameter.
    #[must_use]
    pub fn parameter(mut self, parameter: Parameter) -> Self {
        self.descriptor.parameters.push(parameter);
        self
    }

    /// Append a dataset.
    #[must_use]
    pub fn dataset(mut self, dataset: Dataset) -> Self {
        self.descriptor.dataset.push(dataset);
        self
    }

    /// Set the default output document path.
    #[must_use]
    pub fn output(mut self, output: impl Into<PathBuf>) -> Self {
        self.descriptor.output = output.into();
        self
    }

    /// Build the `ExperimentDescriptor`.
    #[must_use]
    pub fn build(self) -> ExperimentDescriptor {
        self.descriptor
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTOR_JSON: &str = r#"{
        "name": "FGR",
        "exe": "./fgr",
        "additional_flags": "--verbose 0",
        "report_flag": "-j",
        "dataset_variable": "Noise",
        "parameters": [
            {"name": "Max iter", "flag": "-i", "nominal": "64", "values": ["16", "64"]},
            {"name": "Scale", "flag": "-s", "nominal": "0.9", "values": []}
        ],
        "dataset": [
            {"P": "a.ply", "Q": "b.ply", "T": "t.txt", "sigma": "0.01"}
        ],
        "output": "out.html"
    }"#;

    #[test]
    fn test_descriptor_from_json() {
        let desc: ExperimentDescriptor = serde_json::from_str(DESCRIPTOR_JSON).unwrap();
        assert_eq!(desc.name(), "FGR");
        assert_eq!(desc.additional_flags(), "--verbose 0");
        assert_eq!(desc.report_flag(), "-j");
        assert_eq!(desc.parameters().len(), 2);
        assert_eq!(desc.datasets()[0].p(), Path::new("a.ply"));
        assert!((desc.datasets()[0].sigma().unwrap() - 0.01).abs() < f64::EPSILON);
        assert_eq!(desc.output(), Path::new("out.html"));
    }

    #[test]
    fn test_missing_optional_fields_default() {
        let json = DESCRIPTOR_JSON
            .replace(r#""additional_flags": "--verbose 0","#, "")
            .replace(r#", "values": []"#, "");
        let desc: ExperimentDescriptor = serde_json::from_str(&json).unwrap();
        assert_eq!(desc.additional_flags(), "");
        assert!(desc.parameters()[1].swept_values().is_empty());
    }

    #[test]
    fn test_sweep_targets_skip_empty_parameters() {
        let desc: ExperimentDescriptor = serde_json::from_str(DESCRIPTOR_JSON).unwrap();
        let targets: Vec<&str> = desc.sweep_targets().map(Parameter::flag).collect();
        assert_eq!(targets, vec!["-i"]);
        assert_eq!(desc.invocation_count(), 2);
    }

    #[test]
    fn test_invalid_sigma() {
        let dataset = Dataset::new("a", "b", "c", "high");
        assert!(matches!(dataset.sigma(), Err(Error::InvalidNumber { .. })));
    }

    #[test]
    fn test_demo_descriptor_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("demos/descriptor.json");
        let desc = ExperimentDescriptor::load(path).unwrap();
        assert_eq!(desc.sweep_targets().count(), 2);
        assert_eq!(desc.invocation_count(), 15);
    }

    #[test]
    fn test_additional_args_respect_quotes() {
        let desc = ExperimentDescriptor::builder("q", "./fgr")
            .additional_flags(r#"--label "two words" --tag 'a b'"#)
            .build();
        assert_eq!(
            desc.additional_args().unwrap(),
            vec!["--label", "two words", "--tag", "a b"]
        );
    }

    #[test]
    fn test_load_rejects_unbalanced_quotes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("descriptor.json");
        let json = DESCRIPTOR_JSON.replace("--verbose 0", r#"--label \"open"#);
        fs::write(&path, json).unwrap();

        match ExperimentDescriptor::load(&path).unwrap_err() {
            Error::Descriptor { source, .. } => {
                assert!(matches!(*source, Error::AdditionalFlags(_)));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
