// src/sched/sequential.rs

//! Sequential scheduler: tasks run one after another in plan order, with
//! their output attached to the console.
//!
//! On the first failure, the failure log is printed immediately; unless the
//! mode is `waitall`, the remaining tasks of the group are not driven at all
//! (they keep no result — an observable contract).

use tracing::{debug, info};

use crate::RunContext;
use crate::driver::TaskDriver;
use crate::plan::TaskSpec;
use crate::report::TaskStatus;
use crate::sched::{FailureRecord, print_failure_logs};
use crate::types::{Mode, Strategy};

/// Drive the tasks in list order. Returns true when all of them passed.
pub async fn run(tasks: &[TaskSpec], mode: Mode, ctx: &RunContext) -> bool {
    let mut success = true;

    for task in tasks {
        let driver = TaskDriver::new(task, Strategy::Sequential, mode, &ctx.log_dir);
        let result = driver.execute().await;

        ctx.metrics.record(
            &result.display_name,
            result.duration,
            result.status,
            result.cleanup_duration,
        );

        let status = result.status;
        let message = result.message.clone();
        let log_file = result.log_file.clone();
        ctx.report.record(result);

        match status {
            TaskStatus::Pass => info!("{message}"),
            TaskStatus::Skip => debug!("{message}"),
            TaskStatus::Fail => {
                // Sequential tasks inherit stdio, so there is at most the
                // message to surface; the log file exists only in theory.
                print_failure_logs(&[FailureRecord {
                    log_file,
                    task_id: task.id,
                    task_name: task.name.clone(),
                    message,
                }]);

                success = false;

                if mode != Mode::WaitAll {
                    return false;
                }
            }
        }
    }

    success
}
