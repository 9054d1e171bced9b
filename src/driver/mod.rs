// src/driver/mod.rs

//! Per-task process driver.
//!
//! [`TaskDriver`] owns the lifecycle of one task: spawn through the shell,
//! timeout-bound wait, process-tree termination, optional fallback command,
//! and production of the final [`TaskResult`]. Execution errors never escape
//! `execute`; they become `Fail` results.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result, bail};
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::plan::TaskSpec;
use crate::report::{TaskResult, TaskStatus};
use crate::sched::{FailureLedger, FailureRecord};
use crate::types::{Mode, Strategy};

pub mod proc_tree;

pub use proc_tree::kill_process_tree;

/// Drives one task to completion.
///
/// The strategy is assigned at scheduling time: sequential tasks inherit the
/// caller's stdout/stderr, parallel tasks redirect combined output to a
/// per-task log file under the run's log directory.
pub struct TaskDriver {
    task: TaskSpec,
    strategy: Strategy,
    mode: Mode,
    log_file: PathBuf,
    ledger: Option<Arc<FailureLedger>>,
}

impl TaskDriver {
    pub fn new(task: &TaskSpec, strategy: Strategy, mode: Mode, log_dir: &Path) -> Self {
        let log_file = log_dir.join(log_file_name(&task.name));
        Self {
            task: task.clone(),
            strategy,
            mode,
            log_file,
            ledger: None,
        }
    }

    /// Attach the shared failure ledger (parallel execution only). A driver
    /// with a ledger consults it before starting and records its own
    /// failures into it.
    pub fn with_ledger(mut self, ledger: Arc<FailureLedger>) -> Self {
        self.ledger = Some(ledger);
        self
    }

    /// Run the task and produce its result. Never panics, never errors:
    /// anything that goes wrong in the spawn/wait path is a `Fail` result
    /// with the error text as the message.
    pub async fn execute(&self) -> TaskResult {
        // A task is skipped only here: a sibling already failed and the mode
        // says not to start new work.
        if self.mode != Mode::WaitAll {
            if let Some(ledger) = &self.ledger {
                if ledger.has_failure() {
                    debug!(
                        task_id = self.task.id,
                        task = %self.task.name,
                        "failure already recorded; skipping task"
                    );
                    return self.skipped_result();
                }
            }
        }

        let started = Instant::now();
        let mut cleanup_duration = None;

        match self.run_to_completion(&mut cleanup_duration).await {
            Ok(()) => TaskResult {
                task_id: self.task.id,
                display_name: self.task.display_name(),
                status: TaskStatus::Pass,
                duration: started.elapsed(),
                message: format!("{} execution completed.", self.task.display_name()),
                cleanup_duration,
                log_file: self.parallel_log_file(),
            },
            Err(err) => {
                info!(task_id = self.task.id, task = %self.task.name, "{err:#}");

                if self.strategy == Strategy::Parallel {
                    self.append_error_to_log(&err);
                }

                if let Some(ledger) = &self.ledger {
                    ledger.record(FailureRecord {
                        log_file: self.parallel_log_file(),
                        task_id: self.task.id,
                        task_name: self.task.name.clone(),
                        message: err.to_string(),
                    });
                }

                TaskResult {
                    task_id: self.task.id,
                    display_name: self.task.display_name(),
                    status: TaskStatus::Fail,
                    duration: started.elapsed(),
                    message: err.to_string(),
                    cleanup_duration,
                    log_file: self.parallel_log_file(),
                }
            }
        }
    }

    async fn run_to_completion(&self, cleanup_duration: &mut Option<Duration>) -> Result<()> {
        info!(
            task_id = self.task.id,
            cmd = %self.task.command,
            "Executing {}...",
            self.task.name
        );

        let mut child = self.spawn()?;

        match timeout(self.task.timeout, child.wait()).await {
            Ok(status_res) => {
                let status = status_res
                    .with_context(|| format!("waiting for process of task '{}'", self.task.name))?;

                if !status.success() {
                    bail!(
                        "Failure(s) occurred in running command \"{}\"",
                        self.task.command
                    );
                }
                Ok(())
            }
            Err(_elapsed) => {
                let timeout_secs = self.task.timeout.as_secs();
                error!(
                    task_id = self.task.id,
                    task = %self.task.name,
                    timeout_secs,
                    "task timed out"
                );

                // Kill grandchildren first, then the direct child. Both are
                // best effort; a process that exited in between is fine.
                if let Some(pid) = child.id() {
                    let killed = kill_process_tree(pid);
                    debug!(task_id = self.task.id, killed, "terminated descendant processes");
                }
                if let Err(err) = child.kill().await {
                    warn!(
                        task_id = self.task.id,
                        error = %err,
                        "failed to kill timed-out task process"
                    );
                }

                *cleanup_duration = self.run_command_on_timeout().await;

                bail!(
                    "Task {} timed out after {} seconds",
                    self.task.name,
                    timeout_secs
                );
            }
        }
    }

    fn spawn(&self) -> Result<tokio::process::Child> {
        let mut cmd = shell_command(&self.task.command);

        match self.strategy {
            Strategy::Sequential => {
                cmd.stdout(Stdio::inherit()).stderr(Stdio::inherit());
            }
            Strategy::Parallel => {
                let log = std::fs::File::create(&self.log_file)
                    .with_context(|| format!("creating log file {:?}", self.log_file))?;
                let log_err = log
                    .try_clone()
                    .with_context(|| format!("cloning log handle {:?}", self.log_file))?;
                cmd.stdout(Stdio::from(log)).stderr(Stdio::from(log_err));
            }
        }

        cmd.kill_on_drop(true);

        cmd.spawn()
            .with_context(|| format!("spawning process for task '{}'", self.task.name))
    }

    /// Run the declared fallback command synchronously after a timeout.
    ///
    /// Its success or failure is logged independently and does not change
    /// the timed-out task's status. Returns the fallback's wall time.
    async fn run_command_on_timeout(&self) -> Option<Duration> {
        let Some(fallback) = &self.task.run_command_on_timeout else {
            info!(
                task = %self.task.name,
                "no RunCommandOnTimeout specified for task"
            );
            return None;
        };

        info!(task = %self.task.name, cmd = %fallback, "running command on timeout");
        let started = Instant::now();

        let mut cmd = shell_command(fallback);
        cmd.kill_on_drop(true);

        match cmd.status().await {
            Ok(status) if status.success() => {
                info!(cmd = %fallback, "timeout command executed successfully");
            }
            Ok(status) => {
                error!(
                    cmd = %fallback,
                    exit_code = status.code().unwrap_or(-1),
                    "timeout command failed"
                );
            }
            Err(err) => {
                error!(cmd = %fallback, error = %err, "failed to run timeout command");
            }
        }

        Some(started.elapsed())
    }

    fn skipped_result(&self) -> TaskResult {
        TaskResult {
            task_id: self.task.id,
            display_name: self.task.display_name(),
            status: TaskStatus::Skip,
            duration: Duration::ZERO,
            message: format!("{} skipped.", self.task.display_name()),
            cleanup_duration: None,
            log_file: self.parallel_log_file(),
        }
    }

    fn parallel_log_file(&self) -> Option<PathBuf> {
        match self.strategy {
            Strategy::Parallel => Some(self.log_file.clone()),
            Strategy::Sequential => None,
        }
    }

    /// Append the failure context to the task's log file so the parallel
    /// scheduler can print it later. IO problems here are logged, not fatal.
    fn append_error_to_log(&self, err: &anyhow::Error) {
        use std::io::Write;

        let result = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_file)
            .and_then(|mut log| writeln!(log, "{err:?}"));

        if let Err(io_err) = result {
            warn!(
                task = %self.task.name,
                log_file = ?self.log_file,
                error = %io_err,
                "could not append error to task log file"
            );
        }
    }
}

/// Build a shell command appropriate for the platform.
fn shell_command(command: &str) -> Command {
    if cfg!(windows) {
        let mut c = Command::new("cmd");
        c.arg("/C").arg(command);
        c
    } else {
        let mut c = Command::new("sh");
        c.arg("-c").arg(command);
        c
    }
}

/// Log file name for a task: spaces become underscores, `_log` suffix.
pub fn log_file_name(task_name: &str) -> String {
    format!("{}_log", task_name.replace(' ', "_"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_name_replaces_spaces() {
        assert_eq!(log_file_name("unit tests"), "unit_tests_log");
        assert_eq!(log_file_name("lint"), "lint_log");
    }
}
