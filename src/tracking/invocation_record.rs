//! Invocation Record - one execution of the algorithm under test

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::pose::PoseError;

/// Status of an invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvocationStatus {
    /// Synthesized but not started.
    Pending,
    /// Algorithm process is running.
    Running,
    /// Report said `completed = true`; the pose error was recorded.
    Completed,
    /// Report said `completed = false`; nothing was plotted.
    Incomplete,
}

/// Record of a single invocation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvocationRecord {
    index: usize,
    parameter: String,
    value: String,
    dataset_index: usize,
    sigma: f64,
    command: String,
    status: InvocationStatus,
    started_at: Option<DateTime<Utc>>,
    ended_at: Option<DateTime<Utc>>,
    error: Option<PoseError>,
}

impl InvocationRecord {
    /// Create a builder for the invocation testing `value` of `parameter`.
    ///
    /// # Arguments
    ///
    /// * `index` - Zero-based position in the sweep
    /// * `parameter` - Flag of the parameter under test
    /// * `value` - Tested value
    #[must_use]
    pub fn builder(
        index: usize,
        parameter: impl Into<String>,
        value: impl Into<String>,
    ) -> InvocationRecordBuilder {
        InvocationRecordBuilder::new(index, parameter, value)
    }

    /// Get the position in the sweep.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// Get the flag of the parameter under test.
    #[must_use]
    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    /// Get the tested value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Get the dataset position in the descriptor.
    #[must_use]
    pub const fn dataset_index(&self) -> usize {
        self.dataset_index
    }

    /// Get the dataset X-axis coordinate.
    #[must_use]
    pub const fn sigma(&self) -> f64 {
        self.sigma
    }

    /// Get the command line that was run.
    #[must_use]
    pub fn command(&self) -> &str {
        &self.command
    }

    /// Get the current status.
    #[must_use]
    pub const fn status(&self) -> InvocationStatus {
        self.status
    }

    /// Get the start timestamp, if started.
    #[must_use]
    pub const fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    /// Get the end timestamp, if finished.
    #[must_use]
    pub const fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.ended_at
    }

    /// Get the pose error of a completed invocation.
    #[must_use]
    pub const fn error(&self) -> Option<PoseError> {
        self.error
    }

    /// Transition from Pending to Running.
    pub fn start(&mut self) {
        self.status = InvocationStatus::Running;
        self.started_at = Some(Utc::now());
    }

    /// Finish with a usable estimate.
    pub fn finish_completed(&mut self, error: PoseError) {
        self.status = InvocationStatus::Completed;
        self.error = Some(error);
        self.ended_at = Some(Utc::now());
    }

    /// Finish without a usable estimate.
    pub fn finish_incomplete(&mut self) {
        self.status = InvocationStatus::Incomplete;
        self.ended_at = Some(Utc::now());
    }
}

/// Builder for `InvocationRecord`.
#[derive(Debug)]
pub struct InvocationRecordBuilder {
    index: usize,
    parameter: String,
    value: String,
    dataset_index: usize,
    sigma: f64,
    command: String,
}

impl InvocationRecordBuilder {
    /// Create a new builder with required fields.
    #[must_use]
    pub fn new(index: usize, parameter: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            index,
            parameter: parameter.into(),
            value: value.into(),
            dataset_index: 0,
            sigma: 0.0,
            command: String::new(),
        }
    }

    /// Set the dataset position and its X-axis coordinate.
    #[must_use]
    pub const fn dataset(mut self, dataset_index: usize, sigma: f64) -> Self {
        self.dataset_index = dataset_index;
        self.sigma = sigma;
        self
    }

    /// Set the command line.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = command.into();
        self
    }

    /// Build the `InvocationRecord` in Pending status.
    #[must_use]
    pub fn build(self) -> InvocationRecord {
        InvocationRecord {
            index: self.index,
            parameter: self.parameter,
            value: self.value,
            dataset_index: self.dataset_index,
            sigma: self.sigma,
            command: self.command,
            status: InvocationStatus::Pending,
            started_at: None,
            ended_at: None,
            error: None,
        }
    }
}
