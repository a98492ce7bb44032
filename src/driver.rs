//! Execution driver - runs invocations one at a time and reports progress
//!
//! The driver never looks at exit codes. Whether an invocation worked is
//! decided afterwards from the report it left behind.

use std::process::{Command, Stdio};

use tracing::debug;

use crate::command::Invocation;
use crate::Result;

/// Something that can run an invocation to completion.
///
/// Closures `FnMut(&Invocation) -> Result<()>` implement this, which is how
/// tests stand in for the algorithm under test.
pub trait Executor {
    /// Run the invocation and wait for it to finish.
    ///
    /// # Errors
    ///
    /// Implementations may fail; [`ProcessExecutor`] never does.
    fn execute(&mut self, invocation: &Invocation) -> Result<()>;
}

impl<F> Executor for F
where
    F: FnMut(&Invocation) -> Result<()>,
{
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        self(invocation)
    }
}

/// Runs the algorithm as a child process with all standard streams closed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessExecutor;

impl Executor for ProcessExecutor {
    fn execute(&mut self, invocation: &Invocation) -> Result<()> {
        let status = Command::new(invocation.program())
            .args(invocation.args())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        // A program that cannot even start leaves no report; that is where
        // the failure gets reported.
        match status {
            Ok(status) => debug!(%invocation, ?status, "invocation finished"),
            Err(err) => debug!(%invocation, %err, "invocation could not be spawned"),
        }
        Ok(())
    }
}

/// Receives one tick per finished invocation.
pub trait Progress {
    /// Called after each invocation with the running count and the total.
    fn advance(&mut self, done: usize, total: usize);
}

/// Discards progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn advance(&mut self, _done: usize, _total: usize) {}
}

/// Logs `[done/total]` at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogProgress;

impl Progress for LogProgress {
    fn advance(&mut self, done: usize, total: usize) {
        tracing::info!("[{done}/{total}] invocations finished");
    }
}

/// Sequential driver: execute, then tick progress.
#[derive(Debug)]
pub struct Driver<E, P> {
    executor: E,
    progress: P,
    done: usize,
    total: usize,
}

impl<E: Executor, P: Progress> Driver<E, P> {
    /// Create a driver expecting `total` invocations.
    #[must_use]
    pub const fn new(executor: E, progress: P, total: usize) -> Self {
        Self {
            executor,
            progress,
            done: 0,
            total,
        }
    }

    /// Run one invocation and advance the counter.
    ///
    /// # Errors
    ///
    /// Propagates executor failures; progress is not advanced in that case.
    pub fn run(&mut self, invocation: &Invocation) -> Result<()> {
        self.executor.execute(invocation)?;
        self.done += 1;
        self.progress.advance(self.done, self.total);
        Ok(())
    }

    /// Invocations run so far.
    #[must_use]
    pub const fn done(&self) -> usize {
        self.done
    }

    /// Expected number of invocations.
    #[must_use]
    pub const fn total(&self) -> usize {
        self.total
    }
}
