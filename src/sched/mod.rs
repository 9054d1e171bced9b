// src/sched/mod.rs

//! Group schedulers.
//!
//! - [`sequential`] drives a group's tasks one at a time, in plan order.
//! - [`parallel`] fans a group's tasks out to a bounded worker pool.
//! - [`failure`] holds the shared ledger parallel workers coordinate on.
//!
//! Both schedulers return a single boolean: true when every task of the
//! group passed. How failures propagate within the group is decided by the
//! effective [`Mode`].

use std::io::BufRead;

use tracing::error;

use crate::RunContext;
use crate::plan::GroupPlan;
use crate::types::{Mode, Strategy};

pub mod failure;
pub mod parallel;
pub mod sequential;

pub use failure::{FailureLedger, FailureRecord};

/// Run one group with its strategy under the given effective mode.
pub async fn run_group(group: &GroupPlan, mode: Mode, ctx: &RunContext) -> bool {
    match group.strategy {
        Strategy::Sequential => sequential::run(&group.tasks, mode, ctx).await,
        Strategy::Parallel => parallel::run(&group.tasks, mode, ctx).await,
    }
}

/// Print the full log of every recorded failure to the console, followed by
/// a one-line summary per failure.
pub(crate) fn print_failure_logs(records: &[FailureRecord]) {
    for record in records {
        error!(
            "######################### Failure log for {} ########################",
            record.task_name
        );

        if let Some(path) = &record.log_file {
            if path.is_file() {
                match std::fs::File::open(path) {
                    Ok(file) => {
                        for line in std::io::BufReader::new(file).lines() {
                            match line {
                                Ok(line) => error!("{}", line.trim_end()),
                                Err(_) => break,
                            }
                        }
                    }
                    Err(err) => {
                        error!(log_file = ?path, error = %err, "could not open failure log");
                    }
                }
            }
        }

        error!(
            "[{}] {} failed: {}",
            record.task_id, record.task_name, record.message
        );
    }
}
