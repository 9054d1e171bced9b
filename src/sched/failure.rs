// src/sched/failure.rs

//! Shared failure ledger for parallel execution.
//!
//! Contract: set-once visibility of "a failure has occurred" plus an
//! append-only list of failure records. Workers consult the signal before
//! starting new work; the parallel scheduler drains the records at the end
//! of the group to print failure logs.

use std::path::PathBuf;
use std::sync::Mutex;

use crate::report::TaskId;

/// One recorded failure: where its log lives (if anywhere) and what happened.
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub log_file: Option<PathBuf>,
    pub task_id: TaskId,
    pub task_name: String,
    pub message: String,
}

#[derive(Debug, Default)]
struct LedgerState {
    failed: bool,
    records: Vec<FailureRecord>,
}

/// Mutex-guarded failure state shared by all workers of one parallel group.
#[derive(Debug, Default)]
pub struct FailureLedger {
    inner: Mutex<LedgerState>,
}

impl FailureLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// True once any worker has recorded a failure.
    pub fn has_failure(&self) -> bool {
        self.inner.lock().expect("failure ledger lock poisoned").failed
    }

    /// Set the failure signal and append the record. The signal never
    /// resets within a run.
    pub fn record(&self, record: FailureRecord) {
        let mut inner = self.inner.lock().expect("failure ledger lock poisoned");
        inner.failed = true;
        inner.records.push(record);
    }

    pub fn is_empty(&self) -> bool {
        self.inner
            .lock()
            .expect("failure ledger lock poisoned")
            .records
            .is_empty()
    }

    /// Snapshot of the recorded failures, in recording order.
    pub fn records(&self) -> Vec<FailureRecord> {
        self.inner
            .lock()
            .expect("failure ledger lock poisoned")
            .records
            .clone()
    }
}
