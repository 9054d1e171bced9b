// src/sched/parallel.rs

//! Parallel scheduler: all tasks of the group are submitted up front to a
//! bounded worker pool sized to half the available processing units
//! (minimum 1), so tasks run concurrently without oversubscribing the host.
//!
//! Completion handling happens in whatever order workers finish. What makes
//! `waitcurrent` and `failfast` different is the shared [`FailureLedger`]:
//! under both modes a worker that observes a recorded failure skips instead
//! of spawning (see the driver), but `failfast` additionally aborts the pool
//! so that queued work never starts and in-flight child processes are
//! killed. The abort is best effort, not a guarantee.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, error, info, warn};

use crate::RunContext;
use crate::driver::TaskDriver;
use crate::plan::TaskSpec;
use crate::report::{TaskResult, TaskStatus};
use crate::sched::{FailureLedger, print_failure_logs};
use crate::types::{Mode, Strategy};

/// Number of concurrent workers for one parallel group.
pub fn worker_pool_size() -> usize {
    (num_cpus::get() / 2).max(1)
}

/// Run the group's tasks concurrently. Returns true when the failure ledger
/// stayed empty.
pub async fn run(tasks: &[TaskSpec], mode: Mode, ctx: &RunContext) -> bool {
    let permits = Arc::new(Semaphore::new(worker_pool_size()));
    let ledger = Arc::new(FailureLedger::new());

    let mut pool: JoinSet<TaskResult> = JoinSet::new();

    for task in tasks {
        let driver = TaskDriver::new(task, Strategy::Parallel, mode, &ctx.log_dir)
            .with_ledger(Arc::clone(&ledger));
        let permits = Arc::clone(&permits);

        pool.spawn(async move {
            // The semaphore is never closed while the pool is draining; an
            // error here means the group was aborted underneath us.
            let _permit = match permits.acquire_owned().await {
                Ok(permit) => Some(permit),
                Err(_) => {
                    warn!("worker pool semaphore closed early; running unbounded");
                    None
                }
            };

            driver.execute().await
        });
    }

    // Completion callback: runs once per finished task, in completion order.
    let mut aborted = false;
    while let Some(joined) = pool.join_next().await {
        let result = match joined {
            Ok(result) => result,
            Err(err) if err.is_cancelled() => {
                // Aborted before it produced a result; it keeps none.
                continue;
            }
            Err(err) => {
                error!(error = %err, "parallel worker panicked");
                continue;
            }
        };

        ctx.metrics.record(
            &result.display_name,
            result.duration,
            result.status,
            result.cleanup_duration,
        );

        let status = result.status;
        let message = result.message.clone();
        ctx.report.record(result);

        match status {
            TaskStatus::Pass => info!("{message}"),
            TaskStatus::Skip => debug!("{message}"),
            TaskStatus::Fail => {
                if mode == Mode::FailFast && !aborted {
                    debug!("failfast mode: aborting the worker pool");
                    // Dropped workers kill their child processes via
                    // kill_on_drop; queued workers never start.
                    pool.abort_all();
                    aborted = true;
                }
            }
        }
    }

    if ledger.is_empty() {
        true
    } else {
        error!("Logs from the failed task(s) are as follows:");
        print_failure_logs(&ledger.records());
        false
    }
}
