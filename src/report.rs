//! Algorithm report - the JSON document the algorithm under test writes
//!
//! ```text
//! {
//!   "completed": true,
//!   "transformation": [[..4..], [..4..], [..4..], [..4..]],
//!   "timing": [{"tag": "icp", "time": "0.5"}, ...]
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::pose::Transform;
use crate::{Error, Result};

/// A timing value as written by the algorithm.
///
/// Reports usually carry a numeric string; bare JSON numbers are accepted too.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TimeValue {
    /// `"time": "0.5"`
    Text(String),
    /// `"time": 0.5`
    Number(f64),
}

/// Duration of one named phase of the algorithm.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingEntry {
    tag: String,
    time: TimeValue,
}

impl TimingEntry {
    /// Create a timing entry from its textual form.
    #[must_use]
    pub fn new(tag: impl Into<String>, time: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            time: TimeValue::Text(time.into()),
        }
    }

    /// Get the phase tag.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Get the duration in seconds.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidNumber`] if the text is not a float.
    pub fn seconds(&self) -> Result<f64> {
        match &self.time {
            TimeValue::Number(value) => Ok(*value),
            TimeValue::Text(text) => text.trim().parse().map_err(|_| Error::InvalidNumber {
                context: format!("timing '{}'", self.tag),
                value: text.clone(),
            }),
        }
    }
}

/// Self-reported result of one invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlgorithmReport {
    completed: bool,
    #[serde(default)]
    transformation: Vec<Vec<f64>>,
    #[serde(default)]
    timing: Vec<TimingEntry>,
}

impl AlgorithmReport {
    /// Create a completed report.
    #[must_use]
    pub fn completed(transform: &Transform, timing: Vec<TimingEntry>) -> Self {
        let m = transform.matrix();
        Self {
            completed: true,
            transformation: (0..4).map(|i| (0..4).map(|j| m[(i, j)]).collect()).collect(),
            timing,
        }
    }

    /// Create a report for a run that gave up.
    #[must_use]
    pub const fn incomplete() -> Self {
        Self {
            completed: false,
            transformation: Vec::new(),
            timing: Vec::new(),
        }
    }

    /// Read a report file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file is missing or unreadable and
    /// [`Error::Json`] if it is not a report.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&data)?)
    }

    /// Write the report as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] or [`Error::Json`] on failure.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Whether the algorithm finished and its estimate is usable.
    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// The estimated transform.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MatrixShape`] if the matrix is not 4x4.
    pub fn transformation(&self) -> Result<Transform> {
        Transform::from_rows(&self.transformation, "report transformation")
    }

    /// Per-phase timings in report order.
    #[must_use]
    pub fn timing(&self) -> &[TimingEntry] {
        &self.timing
    }
}
