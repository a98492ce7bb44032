//! Error types for regsweep
//!
//! Every variant names the failing artifact so the message alone tells the
//! operator which file or command to look at.

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

/// regsweep error types
#[derive(Error, Debug)]
pub enum Error {
    /// The algorithm under test did not leave a readable report behind.
    ///
    /// Fatal: the sweep stops at the first occurrence.
    #[error("\"{command}\" did not produce any result (report {}: {source})", path.display())]
    ReportUnavailable {
        /// Command line of the invocation that failed
        command: String,
        /// Report path that was expected to exist
        path: PathBuf,
        /// Underlying read/parse failure
        #[source]
        source: Box<Self>,
    },

    /// Output file extension is neither HTML nor LaTeX
    #[error("Output extension not supported: {0}")]
    UnsupportedOutput(String),

    /// A matrix did not have the expected 4x4 shape
    #[error("{context}: expected a 4x4 matrix, found {rows} row(s) x {cols} column(s)")]
    MatrixShape {
        /// What was being parsed (report transform, ground truth file, ...)
        context: String,
        /// Number of rows found
        rows: usize,
        /// Number of columns found in the first offending row
        cols: usize,
    },

    /// Ground truth file could not be read or parsed
    #[error("Ground truth {}: {source}", path.display())]
    GroundTruth {
        /// Ground truth path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Self>,
    },

    /// Additional flags could not be split into arguments (unbalanced quotes)
    #[error("Additional flags have unbalanced quoting: {0}")]
    AdditionalFlags(String),

    /// A textual field could not be parsed as a number
    #[error("{context}: '{value}' is not a number")]
    InvalidNumber {
        /// Field being parsed
        context: String,
        /// Offending text
        value: String,
    },

    /// Descriptor file could not be loaded
    #[error("Descriptor {}: {source}", path.display())]
    Descriptor {
        /// Descriptor path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: Box<Self>,
    },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Wrap a descriptor load failure with the descriptor path.
    pub(crate) fn descriptor(path: impl Into<PathBuf>, source: impl Into<Self>) -> Self {
        Self::Descriptor {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }

    /// Wrap a ground truth failure with the ground truth path.
    pub(crate) fn ground_truth(path: impl Into<PathBuf>, source: impl Into<Self>) -> Self {
        Self::GroundTruth {
            path: path.into(),
            source: Box::new(source.into()),
        }
    }
}
