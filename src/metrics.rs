// src/metrics.rs

//! Concurrency-safe ledger of per-task duration and status, printed as a
//! summary table at the end of a run.

use std::sync::Mutex;
use std::time::Duration;

use indexmap::IndexMap;

use crate::report::TaskStatus;

#[derive(Debug, Clone)]
pub struct TaskMetric {
    pub duration: Duration,
    pub status: TaskStatus,
    pub cleanup_duration: Option<Duration>,
}

/// Insertion-ordered map from task display name to its metric. Mutated under
/// a mutex by whichever worker finishes a task; read once at the end of the
/// run to print the summary.
#[derive(Debug, Default)]
pub struct Metrics {
    inner: Mutex<IndexMap<String, TaskMetric>>,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one task's duration and status. Entries are never removed
    /// during a run; recording the same name twice replaces the metric but
    /// keeps the original position.
    pub fn record(
        &self,
        name: &str,
        duration: Duration,
        status: TaskStatus,
        cleanup_duration: Option<Duration>,
    ) {
        let mut inner = self.inner.lock().expect("metrics lock poisoned");
        inner.insert(
            name.to_string(),
            TaskMetric {
                duration,
                status,
                cleanup_duration,
            },
        );
    }

    /// Print the fixed-width summary table to stdout.
    ///
    /// Logging goes to stderr, so the table stays readable even when the run
    /// is verbose.
    pub fn print_summary(&self) {
        let inner = self.inner.lock().expect("metrics lock poisoned");

        println!("{:=^70}", " Tasks Summary ");
        println!("{:^44}| {:^15}| {:^4}", "Task", "Duration", "Status");
        println!("{:=^70}", "");

        for (name, metric) in inner.iter() {
            print_row(name, metric.duration, &metric.status.to_string());

            if let Some(cleanup) = metric.cleanup_duration {
                print_row(&format!("{name} cleanup"), cleanup, "-");
            }
        }

        println!("{:=^70}", "");
    }

    pub fn len(&self) -> usize {
        let inner = self.inner.lock().expect("metrics lock poisoned");
        inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Recorded status for a display name, if any. Mostly used by tests.
    pub fn status_of(&self, name: &str) -> Option<TaskStatus> {
        let inner = self.inner.lock().expect("metrics lock poisoned");
        inner.get(name).map(|m| m.status)
    }
}

fn print_row(name: &str, duration: Duration, status: &str) {
    let (minutes, seconds) = minutes_and_seconds(duration);
    println!("{name:<44}| {minutes:>3} min {seconds:>2} sec |  {status:<8}");
}

fn minutes_and_seconds(duration: Duration) -> (u64, u64) {
    let total = duration.as_secs();
    (total / 60, total % 60)
}
