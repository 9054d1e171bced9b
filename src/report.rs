// src/report.rs

//! Per-run task results.
//!
//! A task has no entry in the [`RunReport`] until it has actually been
//! scheduled. Absence of a result is an observable contract: callers use it
//! to verify that a mode correctly prevented tasks from running.

use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

pub type TaskId = u64;

/// Final state of one scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskStatus {
    Pass,
    Fail,
    Skip,
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskStatus::Pass => write!(f, "Pass"),
            TaskStatus::Fail => write!(f, "Fail"),
            TaskStatus::Skip => write!(f, "Skip"),
        }
    }
}

/// Result record produced by the task driver, joined to its task by id.
#[derive(Debug, Clone)]
pub struct TaskResult {
    pub task_id: TaskId,
    /// `"[id] name"`, also the metrics key.
    pub display_name: String,
    pub status: TaskStatus,
    pub duration: Duration,
    pub message: String,
    /// Wall time of the timeout fallback command, when one ran.
    pub cleanup_duration: Option<Duration>,
    /// Per-task log file (parallel strategy only).
    pub log_file: Option<PathBuf>,
}

/// Concurrency-safe map from task id to result, shared across workers.
#[derive(Debug, Default)]
pub struct RunReport {
    inner: Mutex<HashMap<TaskId, TaskResult>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, result: TaskResult) {
        let mut inner = self.inner.lock().expect("run report lock poisoned");
        inner.insert(result.task_id, result);
    }

    pub fn result_for(&self, id: TaskId) -> Option<TaskResult> {
        let inner = self.inner.lock().expect("run report lock poisoned");
        inner.get(&id).cloned()
    }

    pub fn status_of(&self, id: TaskId) -> Option<TaskStatus> {
        self.result_for(id).map(|r| r.status)
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("run report lock poisoned");
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
