//! Invocation tracking for a sweep run
//!
//! ## Schema Overview
//!
//! ```text
//! RunLedger (1) ──< InvocationRecord (N)
//!                       │
//!                       ├── cell: (parameter flag, value)
//!                       └── outcome: Completed(PoseError) | Incomplete
//! ```
//!
//! The ledger is a diagnostic side channel: it sees every invocation,
//! including the ones whose report said `completed = false` and which
//! therefore never reach a plot.
//!
//! ## Usage
//!
//! ```rust
//! use regsweep::tracking::{InvocationRecord, InvocationStatus, RunLedger};
//!
//! let mut ledger = RunLedger::new("run-ABC123", "FGR noise study");
//!
//! let mut record = InvocationRecord::builder(0, "--max-iter", "16")
//!     .dataset(0, 0.01)
//!     .command("./fgr -p a.ply -q b.ply --max-iter 16")
//!     .build();
//! record.start();
//! record.finish_incomplete();
//! ledger.push(record);
//!
//! assert_eq!(ledger.incomplete_count(), 1);
//! assert_eq!(ledger.records()[0].status(), InvocationStatus::Incomplete);
//! ```

mod invocation_record;
mod ledger;

pub use invocation_record::{InvocationRecord, InvocationRecordBuilder, InvocationStatus};
pub use ledger::{CellSummary, RunLedger};
