//! Run Ledger - every invocation of one sweep, in execution order

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{InvocationRecord, InvocationStatus};
use crate::Result;

/// Completed/incomplete tally for one (parameter, value) cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSummary {
    /// Flag of the parameter under test
    pub parameter: String,
    /// Tested value
    pub value: String,
    /// Invocations whose report said `completed = true`
    pub completed: usize,
    /// Invocations whose report said `completed = false`
    pub incomplete: usize,
}

/// Ordered log of a sweep's invocations.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunLedger {
    run_id: String,
    experiment: String,
    created_at: DateTime<Utc>,
    records: Vec<InvocationRecord>,
}

impl RunLedger {
    /// Create an empty ledger for a run.
    #[must_use]
    pub fn new(run_id: impl Into<String>, experiment: impl Into<String>) -> Self {
        Self {
            run_id: run_id.into(),
            experiment: experiment.into(),
            created_at: Utc::now(),
            records: Vec::new(),
        }
    }

    /// Get the run identifier.
    #[must_use]
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// Get the experiment name.
    #[must_use]
    pub fn experiment(&self) -> &str {
        &self.experiment
    }

    /// Get the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Check if no invocation was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Append a finished invocation.
    pub fn push(&mut self, record: InvocationRecord) {
        self.records.push(record);
    }

    /// All records in execution order.
    #[must_use]
    pub fn records(&self) -> &[InvocationRecord] {
        &self.records
    }

    /// Number of invocations whose report said `completed = false`.
    #[must_use]
    pub fn incomplete_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.status() == InvocationStatus::Incomplete)
            .count()
    }

    /// Per-cell tallies, in the order cells were first run.
    #[must_use]
    pub fn cell_summaries(&self) -> Vec<CellSummary> {
        let mut cells: Vec<CellSummary> = Vec::new();
        for record in &self.records {
            let idx = cells
                .iter()
                .position(|c| c.parameter == record.parameter() && c.value == record.value())
                .unwrap_or_else(|| {
                    cells.push(CellSummary {
                        parameter: record.parameter().to_string(),
                        value: record.value().to_string(),
                        completed: 0,
                        incomplete: 0,
                    });
                    cells.len() - 1
                });
            match record.status() {
                InvocationStatus::Completed => cells[idx].completed += 1,
                InvocationStatus::Incomplete => cells[idx].incomplete += 1,
                InvocationStatus::Pending | InvocationStatus::Running => {}
            }
        }
        cells
    }

    /// Write the ledger as pretty JSON.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Io`] or [`crate::Error::Json`] on failure.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::PoseError;

    fn finished(index: usize, value: &str, completed: bool) -> InvocationRecord {
        let mut record = InvocationRecord::builder(index, "-i", value).build();
        record.start();
        if completed {
            record.finish_completed(PoseError {
                rotation: 0.0,
                translation: 0.0,
            });
        } else {
            record.finish_incomplete();
        }
        record
    }

    #[test]
    fn test_ledger_default() {
        let ledger = RunLedger::new("run-1", "exp");
        assert!(ledger.is_empty());
        assert_eq!(ledger.incomplete_count(), 0);
        assert!(ledger.cell_summaries().is_empty());
    }

    #[test]
    fn test_cell_summaries_keep_first_seen_order() {
        let mut ledger = RunLedger::new("run-1", "exp");
        ledger.push(finished(0, "16", true));
        ledger.push(finished(1, "16", false));
        ledger.push(finished(2, "64", true));
        ledger.push(finished(3, "64", true));

        let cells = ledger.cell_summaries();
        assert_eq!(cells.len(), 2);
        assert_eq!((cells[0].value.as_str(), cells[0].completed, cells[0].incomplete), ("16", 1, 1));
        assert_eq!((cells[1].value.as_str(), cells[1].completed, cells[1].incomplete), ("64", 2, 0));
        assert_eq!(ledger.incomplete_count(), 1);
    }

    #[test]
    fn test_write_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ledger.json");
        let mut ledger = RunLedger::new("run-1", "exp");
        ledger.push(finished(0, "16", true));
        ledger.write_json(&path).unwrap();

        let back: RunLedger = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.run_id(), "run-1");
        assert_eq!(back.records().len(), 1);
    }
}
